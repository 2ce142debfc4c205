//! Core domain: rates, currencies, feature normalisation and valuation

pub mod config;
pub mod country;
pub mod currency;
pub mod error;
pub mod estimate;
pub mod features;
pub mod heuristic;
pub mod log;
pub mod preferences;
pub mod rate_cache;
pub mod rates;
pub mod store;
pub mod valuation;

// Re-export main types for cleaner imports
pub use country::{CountryCode, Currency};
pub use currency::CurrencyConverter;
pub use error::ValuationError;
pub use estimate::{PriceEstimate, PricingModel, SourceTag};
pub use features::{FeatureVector, PropertyInput};
pub use rate_cache::{RateCache, RefreshOutcome};
pub use rates::{RateFetcher, RateSnapshot, RateTable};
pub use valuation::PredictionGateway;
