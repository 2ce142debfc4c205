//! Price estimate types and the remote pricing model abstraction

use crate::core::error::ValuationError;
use crate::core::features::FeatureVector;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceTag {
    RemoteModel,
    DemoHeuristic,
}

impl Display for SourceTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                SourceTag::RemoteModel => "REMOTE_MODEL",
                SourceTag::DemoHeuristic => "DEMO_HEURISTIC",
            }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceEstimate {
    pub price_usd: f64,
    pub price_local: f64,
    pub currency_code: String,
    pub source: SourceTag,
}

/// Response envelope of the prediction service.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RemotePrediction {
    pub price_usd: f64,
    pub price_inr: f64,
    pub currency: String,
    #[serde(default)]
    pub source: Option<String>,
}

impl From<RemotePrediction> for PriceEstimate {
    fn from(remote: RemotePrediction) -> Self {
        PriceEstimate {
            price_usd: remote.price_usd,
            price_local: remote.price_inr,
            currency_code: remote.currency,
            source: SourceTag::RemoteModel,
        }
    }
}

/// Authenticated remote inference.
#[async_trait]
pub trait PricingModel: Send + Sync {
    async fn predict(
        &self,
        features: &FeatureVector,
        credential: &str,
    ) -> Result<RemotePrediction, ValuationError>;
}
