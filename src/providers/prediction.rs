use crate::core::error::ValuationError;
use crate::core::estimate::{PricingModel, RemotePrediction};
use crate::core::features::FeatureVector;
use crate::providers::util::{build_client, join_url};
use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, instrument};

/// Client of the remote house price prediction service.
pub struct RemotePricingModel {
    base_url: String,
    timeout_secs: Option<u64>,
}

impl RemotePricingModel {
    pub fn new(base_url: &str, timeout_secs: Option<u64>) -> Self {
        RemotePricingModel {
            base_url: base_url.to_string(),
            timeout_secs,
        }
    }
}

#[derive(Serialize)]
struct PredictRequest<'a> {
    features_by_name: &'a FeatureVector,
}

#[async_trait]
impl PricingModel for RemotePricingModel {
    #[instrument(name = "RemotePredict", skip_all, fields(features = features.len()))]
    async fn predict(
        &self,
        features: &FeatureVector,
        credential: &str,
    ) -> Result<RemotePrediction, ValuationError> {
        let url = join_url(&self.base_url, "predict");
        debug!("Requesting prediction from {}", url);

        let client = build_client(self.timeout_secs)
            .map_err(|e| ValuationError::BackendUnreachable(e.to_string()))?;
        let response = client
            .post(&url)
            .bearer_auth(credential)
            .json(&PredictRequest {
                features_by_name: features,
            })
            .send()
            .await
            .map_err(|e| ValuationError::BackendUnreachable(format!("{e} URL: {url}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ValuationError::BackendUnreachable(e.to_string()))?;

        if !status.is_success() {
            return Err(ValuationError::RemoteRejected {
                status: status.as_u16(),
                body: text,
            });
        }

        let prediction: RemotePrediction = serde_json::from_str(&text).map_err(|e| {
            ValuationError::Parse(format!(
                "Failed to parse prediction response: {e}. Response: '{text}'"
            ))
        })?;
        debug!(?prediction, "Received prediction");
        Ok(prediction)
    }
}
