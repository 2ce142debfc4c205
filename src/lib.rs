pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::core::config::AppConfig;
use crate::core::country::CountryCode;
use crate::core::currency::CurrencyConverter;
use crate::core::features::PropertyInput;
use crate::core::heuristic::HeuristicEstimator;
use crate::core::preferences::Preferences;
use crate::core::rate_cache::{RateCache, SystemClock};
use crate::core::valuation::PredictionGateway;
use crate::providers::{ExchangeRateProvider, RemotePricingModel};
use anyhow::Result;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub enum AppCommand {
    Rates {
        force: bool,
    },
    Convert {
        amount: f64,
        from: Option<CountryCode>,
        to: Option<CountryCode>,
    },
    Country {
        set: Option<CountryCode>,
    },
    Login {
        token: String,
    },
    Logout,
    Predict(PropertyInput),
    Listings {
        country: Option<String>,
    },
}

/// Services shared by every command for one session.
pub struct App {
    config: AppConfig,
    prefs: Preferences,
    rates: Arc<RateCache>,
    converter: Arc<CurrencyConverter>,
    gateway: PredictionGateway,
}

impl App {
    pub async fn build(config: AppConfig) -> Result<Self> {
        let data_path = config.default_data_path()?;
        let store = store::open_store(&data_path);
        let prefs = Preferences::new(Arc::clone(&store), config.default_country());

        let fx = &config.providers.fx;
        let fetcher = Arc::new(ExchangeRateProvider::new(&fx.base_url, fx.timeout_secs));
        let rates = Arc::new(RateCache::open(fetcher, Arc::clone(&store), Arc::new(SystemClock)).await);

        let country = prefs.selected_country().await;
        let converter = Arc::new(CurrencyConverter::new(rates.clone(), country));

        let prediction = &config.providers.prediction;
        let credential = match prediction
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
        {
            Some(key) => Some(key),
            None => prefs.credential().await,
        };
        let model = Arc::new(RemotePricingModel::new(
            &prediction.base_url,
            prediction.timeout_secs,
        ));
        let gateway = PredictionGateway::new(
            model,
            HeuristicEstimator::new(),
            Arc::clone(&converter),
            credential,
        );
        debug!(
            %country,
            remote = gateway.has_credential(),
            "Session ready"
        );

        Ok(Self {
            config,
            prefs,
            rates,
            converter,
            gateway,
        })
    }

    pub fn rates(&self) -> &RateCache {
        &self.rates
    }

    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    pub fn converter(&self) -> &CurrencyConverter {
        &self.converter
    }

    pub fn gateway(&self) -> &PredictionGateway {
        &self.gateway
    }

    /// Starts the start-up refresh in the background. The command does not
    /// wait for it, but `execute` joins it before returning.
    fn spawn_refresh(&self) -> JoinHandle<()> {
        let rates = Arc::clone(&self.rates);
        tokio::spawn(async move {
            let outcome = rates.refresh(false).await;
            debug!("Background rate refresh finished: {}", outcome.label());
        })
    }

    pub async fn execute(&self, command: AppCommand) -> Result<()> {
        let refresh = match command {
            AppCommand::Rates { .. } => None,
            _ => Some(self.spawn_refresh()),
        };

        let result = self.dispatch(command).await;

        if let Some(handle) = refresh
            && let Err(e) = handle.await
        {
            warn!("Background rate refresh did not finish: {e}");
        }
        result
    }

    async fn dispatch(&self, command: AppCommand) -> Result<()> {
        match command {
            AppCommand::Rates { force } => cli::rates::run(&self.rates, force).await,
            AppCommand::Convert { amount, from, to } => {
                println!("{}", cli::convert::run(&self.converter, amount, from, to));
                Ok(())
            }
            AppCommand::Country { set } => cli::country::run(&self.prefs, set).await,
            AppCommand::Login { token } => cli::auth::login(&self.prefs, &token).await,
            AppCommand::Logout => cli::auth::logout(&self.prefs).await,
            AppCommand::Predict(details) => cli::predict::run(&self.gateway, &details).await,
            AppCommand::Listings { country } => {
                cli::listings::run(
                    &self.gateway,
                    &self.converter,
                    &self.config.listings,
                    country.as_deref(),
                )
                .await
            }
        }
    }
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Valuer starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!(
        fx = %config.providers.fx.base_url,
        prediction = %config.providers.prediction.base_url,
        listings = config.listings.len(),
        "Loaded config"
    );

    let app = App::build(config).await?;
    app.execute(command).await
}
