use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use tracing::info;
use valuer::core::config::AppConfig;
use valuer::core::country::{CountryCode, Currency};
use valuer::core::estimate::SourceTag;
use valuer::core::features::PropertyInput;
use valuer::core::rate_cache::RefreshOutcome;
use valuer::{App, AppCommand};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod test_utils {
    use wiremock::matchers::{bearer_token, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub const FX_RESPONSE: &str =
        r#"{"base": "USD", "rates": {"USD": 1, "INR": 83.0, "EUR": 0.9, "GBP": 0.8, "AED": 3.67}}"#;

    pub async fn create_fx_mock_server(
        status: u16,
        body: &str,
        expected_calls: u64,
    ) -> MockServer {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/latest"))
            .and(query_param("base", "USD"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .expect(expected_calls)
            .mount(&mock_server)
            .await;
        mock_server
    }

    pub async fn create_prediction_mock_server(
        token: &str,
        status: u16,
        body: &str,
        expected_calls: u64,
    ) -> MockServer {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/predict"))
            .and(bearer_token(token))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .expect(expected_calls)
            .mount(&mock_server)
            .await;
        mock_server
    }
}

fn write_config(dir: &Path, fx: &MockServer, prediction: &str, api_key: Option<&str>) -> String {
    let api_key_line = api_key.map_or(String::new(), |k| format!("    api_key: \"{k}\"\n"));
    let content = format!(
        r#"providers:
  fx:
    base_url: "{fx}"
    timeout_secs: 5
  prediction:
    base_url: "{prediction}"
    timeout_secs: 5
{api_key_line}country: IN
data_path: "{data}"
listings:
  - address: "Pune, Maharashtra"
    country: IN
    property_type: apartment
    square_footage: 850
    year_built: 2017
    bedrooms: 2
    bathrooms: 2
  - address: "Tokyo, Japan"
    country: JP
"#,
        fx = fx.uri(),
        data = dir.join("data").display(),
    );
    let config_path = dir.join("config.yaml");
    fs::write(&config_path, content).expect("Failed to write config file");
    config_path.to_string_lossy().into_owned()
}

async fn build_app(config_path: &str) -> App {
    let config = AppConfig::load_from_path(config_path).expect("Failed to load config");
    App::build(config).await.expect("Failed to build app")
}

#[test_log::test(tokio::test)]
async fn test_rates_are_fetched_and_reused_across_sessions() {
    let dir = TempDir::new().unwrap();

    {
        let fx = test_utils::create_fx_mock_server(200, test_utils::FX_RESPONSE, 1).await;
        let config_path = write_config(dir.path(), &fx, "http://127.0.0.1:9", None);
        let app = build_app(&config_path).await;

        let outcome = app.rates().refresh(false).await;
        info!(outcome = outcome.label(), "First session refresh");
        assert!(matches!(outcome, RefreshOutcome::Fetched(_)));
        assert_eq!(app.converter().convert(100.0, Some(CountryCode::IN)), 8300.0);
    }

    let fx = test_utils::create_fx_mock_server(200, test_utils::FX_RESPONSE, 0).await;
    let config_path = write_config(dir.path(), &fx, "http://127.0.0.1:9", None);
    let app = build_app(&config_path).await;

    let outcome = app.rates().refresh(false).await;
    assert!(matches!(outcome, RefreshOutcome::Cached(_)));
    assert_eq!(app.converter().convert(100.0, None), 8300.0);
}

#[test_log::test(tokio::test)]
async fn test_rates_fall_back_to_defaults_when_source_is_down() {
    let dir = TempDir::new().unwrap();
    let fx = test_utils::create_fx_mock_server(503, "unavailable", 1).await;
    let config_path = write_config(dir.path(), &fx, "http://127.0.0.1:9", None);
    let app = build_app(&config_path).await;

    let outcome = app.rates().refresh(true).await;
    assert!(matches!(outcome, RefreshOutcome::Defaulted(_)));
    assert_eq!(app.converter().convert(100.0, Some(CountryCode::UK)), 100.0 * 0.7614);
    assert!(app.rates().cached().is_none());
}

#[test_log::test(tokio::test)]
async fn test_predict_without_credential_uses_heuristic() {
    let dir = TempDir::new().unwrap();
    let fx = test_utils::create_fx_mock_server(200, test_utils::FX_RESPONSE, 0).await;
    let prediction =
        test_utils::create_prediction_mock_server("unused", 200, "{}", 0).await;
    let config_path = write_config(dir.path(), &fx, &prediction.uri(), None);
    let app = build_app(&config_path).await;

    assert!(!app.gateway().has_credential());
    let details = PropertyInput {
        square_footage: Some("1500".to_string()),
        country: Some(CountryCode::AE),
        ..Default::default()
    };
    let estimate = app.gateway().predict(&details).await.unwrap();

    assert_eq!(estimate.source, SourceTag::DemoHeuristic);
    assert_eq!(estimate.currency_code, "AED");
    assert!(estimate.price_usd >= 50_000.0);
    assert_eq!(estimate.price_local, estimate.price_usd * 3.671);
}

#[test_log::test(tokio::test)]
async fn test_config_api_key_takes_precedence_over_login() {
    let dir = TempDir::new().unwrap();
    let fx = test_utils::create_fx_mock_server(200, test_utils::FX_RESPONSE, 0).await;
    let prediction = test_utils::create_prediction_mock_server(
        "config-key",
        200,
        r#"{"price_usd": 181000.0, "price_inr": 15023000.0, "currency": "INR", "source": "FASTAPI_BACKEND"}"#,
        1,
    )
    .await;
    let config_path = write_config(dir.path(), &fx, &prediction.uri(), Some("config-key"));

    {
        let app = build_app(&config_path).await;
        app.preferences().set_credential("stored-key").await.unwrap();
    }

    let app = build_app(&config_path).await;
    assert!(app.gateway().has_credential());
    let estimate = app.gateway().predict(&PropertyInput::default()).await.unwrap();

    assert_eq!(estimate.source, SourceTag::RemoteModel);
    assert_eq!(estimate.price_usd, 181000.0);
    assert_eq!(estimate.price_local, 15023000.0);
}

#[test_log::test(tokio::test)]
async fn test_saved_login_enables_remote_model() {
    let dir = TempDir::new().unwrap();
    let fx = test_utils::create_fx_mock_server(200, test_utils::FX_RESPONSE, 0).await;
    let prediction = test_utils::create_prediction_mock_server(
        "stored-key",
        200,
        r#"{"price_usd": 90000.0, "price_inr": 7470000.0, "currency": "INR"}"#,
        1,
    )
    .await;
    let config_path = write_config(dir.path(), &fx, &prediction.uri(), None);

    {
        let app = build_app(&config_path).await;
        assert!(!app.gateway().has_credential());
        app.preferences().set_credential("stored-key").await.unwrap();
    }

    let app = build_app(&config_path).await;
    let estimate = app.gateway().predict(&PropertyInput::default()).await.unwrap();
    assert_eq!(estimate.source, SourceTag::RemoteModel);
    assert_eq!(estimate.price_usd, 90000.0);
}

#[test_log::test(tokio::test)]
async fn test_remote_failure_is_reported_by_predict_command() {
    let dir = TempDir::new().unwrap();
    let fx = test_utils::create_fx_mock_server(200, test_utils::FX_RESPONSE, 1).await;
    let prediction = test_utils::create_prediction_mock_server(
        "config-key",
        500,
        r#"{"detail":"Prediction error"}"#,
        1,
    )
    .await;
    let config_path = write_config(dir.path(), &fx, &prediction.uri(), Some("config-key"));

    let result = valuer::run_command(
        AppCommand::Predict(PropertyInput::default()),
        Some(&config_path),
    )
    .await;

    let err = result.expect_err("Remote failure must not be hidden");
    let message = format!("{err:#}");
    assert!(message.contains("Prediction failed"));
    assert!(message.contains("500"));
}

#[test_log::test(tokio::test)]
async fn test_listings_command_succeeds_with_heuristic() {
    let dir = TempDir::new().unwrap();
    let fx = test_utils::create_fx_mock_server(200, test_utils::FX_RESPONSE, 1).await;
    let config_path = write_config(dir.path(), &fx, "http://127.0.0.1:9", None);

    let result = valuer::run_command(
        AppCommand::Listings { country: None },
        Some(&config_path),
    )
    .await;
    assert!(result.is_ok(), "Listings failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_country_selection_persists() {
    let dir = TempDir::new().unwrap();
    let fx = test_utils::create_fx_mock_server(200, test_utils::FX_RESPONSE, 0).await;
    let config_path = write_config(dir.path(), &fx, "http://127.0.0.1:9", None);

    {
        let app = build_app(&config_path).await;
        valuer::cli::country::run(app.preferences(), Some(CountryCode::UK))
            .await
            .unwrap();
    }

    let app = build_app(&config_path).await;
    assert_eq!(app.preferences().selected_country().await, CountryCode::UK);
    assert_eq!(app.converter().default_country(), CountryCode::UK);
}

#[test_log::test]
fn test_startup_refresh_is_saved_before_command_returns() {
    let dir = TempDir::new().unwrap();
    let server_rt = tokio::runtime::Runtime::new().unwrap();
    let fx = server_rt.block_on(async {
        let fx = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/latest"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(test_utils::FX_RESPONSE)
                    .set_delay(Duration::from_millis(100)),
            )
            .expect(1)
            .mount(&fx)
            .await;
        fx
    });
    let config_path = write_config(dir.path(), &fx, "http://127.0.0.1:9", None);

    // The command finishes long before the delayed FX response arrives; the
    // session runtime is dropped right after it returns.
    let session_rt = tokio::runtime::Runtime::new().unwrap();
    session_rt
        .block_on(valuer::run_command(
            AppCommand::Convert {
                amount: 100.0,
                from: None,
                to: None,
            },
            Some(&config_path),
        ))
        .unwrap();
    drop(session_rt);

    server_rt.block_on(async {
        let requests = fx.received_requests().await.unwrap_or_default();
        assert_eq!(requests.len(), 1);

        let app = build_app(&config_path).await;
        let cached = app.rates().cached().expect("Refreshed rates were not saved");
        assert_eq!(cached.table.rate(Currency::INR), Some(83.0));
    });
}
