use std::time::Duration;

const USER_AGENT: &str = "valuer/1.0";

/// Builds the HTTP client used by the providers.
///
/// Without `timeout_secs` the transport default applies, i.e. no deadline.
pub fn build_client(timeout_secs: Option<u64>) -> reqwest::Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
    if let Some(secs) = timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build()
}

/// Joins `base_url` and `path` without doubling the slash between them.
pub fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
