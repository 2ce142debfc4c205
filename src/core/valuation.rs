//! Prediction gateway: turns property details into a price estimate.
//!
//! Without a credential the local [`HeuristicEstimator`] prices the property
//! and the call never fails. With a credential the remote model is called
//! exactly once and any failure is returned to the caller; there is no
//! silent fallback to the heuristic on that path.

use crate::core::currency::CurrencyConverter;
use crate::core::error::ValuationError;
use crate::core::estimate::{PriceEstimate, PricingModel, SourceTag};
use crate::core::features::{PropertyInput, build_feature_vector};
use crate::core::heuristic::HeuristicEstimator;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

pub struct PredictionGateway {
    model: Arc<dyn PricingModel>,
    estimator: HeuristicEstimator,
    converter: Arc<CurrencyConverter>,
    credential: Option<String>,
}

impl PredictionGateway {
    pub fn new(
        model: Arc<dyn PricingModel>,
        estimator: HeuristicEstimator,
        converter: Arc<CurrencyConverter>,
        credential: Option<String>,
    ) -> Self {
        // Blank credentials are treated as absent
        let credential = credential.filter(|c| !c.trim().is_empty());
        Self {
            model,
            estimator,
            converter,
            credential,
        }
    }

    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    #[instrument(name = "Predict", skip_all, fields(address = details.address.as_deref().unwrap_or("")))]
    pub async fn predict(&self, details: &PropertyInput) -> Result<PriceEstimate, ValuationError> {
        debug!("Normalizing property details");
        let features = build_feature_vector(details);

        let Some(credential) = self.credential.as_deref() else {
            debug!("No credential, pricing with heuristic");
            let price_usd = self.estimator.estimate(&features);
            let country = details
                .country
                .unwrap_or_else(|| self.converter.default_country());
            return Ok(PriceEstimate {
                price_usd,
                price_local: self.converter.convert(price_usd, Some(country)),
                currency_code: country.currency().code().to_string(),
                source: SourceTag::DemoHeuristic,
            });
        };

        debug!("Credential present, awaiting remote model");
        match self.model.predict(&features, credential).await {
            Ok(remote) => {
                debug!("Remote prediction received");
                Ok(PriceEstimate::from(remote))
            }
            Err(e) => {
                warn!("Remote prediction failed: {}", e);
                Err(e)
            }
        }
    }
}
