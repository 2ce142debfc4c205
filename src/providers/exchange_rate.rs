use crate::core::country::Currency;
use crate::core::error::ValuationError;
use crate::core::rates::{RateFetcher, RateTable};
use crate::providers::util::{build_client, join_url};
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, instrument};

/// Fetches USD based rates for the currency basket from an
/// exchangerate.host compatible endpoint.
pub struct ExchangeRateProvider {
    base_url: String,
    timeout_secs: Option<u64>,
}

impl ExchangeRateProvider {
    pub fn new(base_url: &str, timeout_secs: Option<u64>) -> Self {
        ExchangeRateProvider {
            base_url: base_url.to_string(),
            timeout_secs,
        }
    }

    fn url(&self) -> String {
        let symbols: Vec<&str> = Currency::ALL.iter().map(|c| c.code()).collect();
        format!(
            "{}?base=USD&symbols={}",
            join_url(&self.base_url, "latest"),
            symbols.join(",")
        )
    }
}

#[async_trait]
impl RateFetcher for ExchangeRateProvider {
    #[instrument(name = "FxFetch", skip(self))]
    async fn fetch(&self) -> Result<RateTable, ValuationError> {
        let url = self.url();
        debug!("Requesting exchange rates from {}", url);

        let client =
            build_client(self.timeout_secs).map_err(|e| ValuationError::Network(e.to_string()))?;
        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| ValuationError::Network(format!("Request error: {e} URL: {url}")))?;

        if !response.status().is_success() {
            return Err(ValuationError::Network(format!(
                "HTTP error: {} for exchange rates",
                response.status()
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| ValuationError::Network(e.to_string()))?;

        let data: Value = serde_json::from_str(&text).map_err(|e| {
            ValuationError::Parse(format!("Failed to parse exchange rate response: {e}"))
        })?;
        let rates = data
            .get("rates")
            .and_then(Value::as_object)
            .ok_or_else(|| {
                ValuationError::Parse("Exchange rate response has no rates object".to_string())
            })?;

        let table = RateTable::from_untrusted(rates);
        debug!(?table, "Received exchange rates");
        Ok(table)
    }
}
