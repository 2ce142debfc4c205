pub mod exchange_rate;
pub mod prediction;
pub mod util;

pub use exchange_rate::ExchangeRateProvider;
pub use prediction::RemotePricingModel;
