//! Local pricing model used when no authenticated inference is available.

use crate::core::features::{
    DEFAULT_BEDROOMS, DEFAULT_QUALITY, DEFAULT_SQFT, DEFAULT_YEAR_BUILT, FeatureVector,
};
use chrono::Datelike;
use rand::Rng;
use std::sync::Arc;
use tracing::debug;

/// Lowest price the heuristic ever returns, in USD.
pub const PRICE_FLOOR_USD: f64 = 50_000.0;
/// Half width of the multiplicative variance band.
pub const VARIANCE: f64 = 0.10;

/// Source of the multiplicative variance term.
pub trait Jitter: Send + Sync {
    /// Returns a value in `[-VARIANCE, VARIANCE]`.
    fn sample(&self) -> f64;
}

/// Uniformly distributed variance.
pub struct UniformJitter;

impl Jitter for UniformJitter {
    fn sample(&self) -> f64 {
        rand::thread_rng().gen_range(-VARIANCE..=VARIANCE)
    }
}

/// Constant variance, mostly for reproducible estimates.
pub struct FixedJitter(pub f64);

impl Jitter for FixedJitter {
    fn sample(&self) -> f64 {
        self.0.clamp(-VARIANCE, VARIANCE)
    }
}

pub struct HeuristicEstimator {
    current_year: i32,
    jitter: Arc<dyn Jitter>,
}

impl HeuristicEstimator {
    pub fn new() -> Self {
        Self::with_jitter(chrono::Utc::now().year(), Arc::new(UniformJitter))
    }

    pub fn with_jitter(current_year: i32, jitter: Arc<dyn Jitter>) -> Self {
        Self {
            current_year,
            jitter,
        }
    }

    /// Estimates a USD price from the living area, rooms, age and quality.
    pub fn estimate(&self, features: &FeatureVector) -> f64 {
        let sqft = features.get("GrLivArea").unwrap_or(DEFAULT_SQFT);
        let bedrooms = features.get("BedroomAbvGr").unwrap_or(DEFAULT_BEDROOMS);
        let full_bath = features.get("FullBath").unwrap_or(2.0);
        let half_bath = features.get("HalfBath").unwrap_or(0.0);
        let year_built = features.get("YearBuilt").unwrap_or(DEFAULT_YEAR_BUILT);
        let overall_qual = features.get("OverallQual").unwrap_or(DEFAULT_QUALITY);

        let base_per_sqft = 150.0 + (overall_qual - 5.0) * 20.0;
        // Only a build year in the future yields a non-zero adjustment.
        let age_adjustment = f64::max(0.0, (f64::from(self.current_year) - year_built) * -500.0);
        let bathrooms = full_bath + 0.5 * half_bath;
        let bedroom_adjustment = (bedrooms - 3.0) * 10_000.0;
        let bathroom_adjustment = (bathrooms - 2.0) * 15_000.0;

        let raw_estimate =
            sqft * base_per_sqft + age_adjustment + bedroom_adjustment + bathroom_adjustment;
        let variance = self.jitter.sample();
        let estimate = f64::max(PRICE_FLOOR_USD, raw_estimate * (1.0 + variance));

        debug!(
            raw_estimate,
            variance, estimate, "Heuristic estimate computed"
        );
        estimate
    }
}

impl Default for HeuristicEstimator {
    fn default() -> Self {
        Self::new()
    }
}
