use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

/// Environment variable that overrides the computed filter, e.g. `valuer=trace`.
pub const LOG_ENV: &str = "VALUER_LOG";

fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::OFF,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Sets up the global subscriber. `verbosity` is the number of `-v` flags.
pub fn init_logging(verbosity: u8) {
    let env_filter = EnvFilter::try_from_env(LOG_ENV).ok();
    let app_filter = env_filter
        .is_none()
        .then(|| Targets::new().with_target("valuer", level_for(verbosity)));

    tracing_subscriber::registry()
        .with(fmt::layer().compact().without_time().with_target(false))
        .with(app_filter)
        .with(env_filter)
        .init();
}
