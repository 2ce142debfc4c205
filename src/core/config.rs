use crate::core::country::CountryCode;
use crate::core::features::PropertyInput;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_FX_URL: &str = "https://api.exchangerate.host";
pub const DEFAULT_PREDICTION_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FxProviderConfig {
    pub base_url: String,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for FxProviderConfig {
    fn default() -> Self {
        FxProviderConfig {
            base_url: DEFAULT_FX_URL.to_string(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PredictionProviderConfig {
    pub base_url: String,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Bearer credential; takes precedence over the one saved with `login`.
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for PredictionProviderConfig {
    fn default() -> Self {
        PredictionProviderConfig {
            base_url: DEFAULT_PREDICTION_URL.to_string(),
            timeout_secs: None,
            api_key: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub fx: FxProviderConfig,
    #[serde(default)]
    pub prediction: PredictionProviderConfig,
}

/// A sample property to value with the `listings` command.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Listing {
    pub address: String,
    /// Country code; codes outside the supported basket are shown in USD.
    pub country: String,
    #[serde(default)]
    pub property_type: Option<String>,
    #[serde(default)]
    pub square_footage: Option<f64>,
    #[serde(default)]
    pub year_built: Option<u32>,
    #[serde(default)]
    pub bedrooms: Option<f64>,
    #[serde(default)]
    pub bathrooms: Option<f64>,
    #[serde(default)]
    pub condition: Option<String>,
}

impl Listing {
    pub fn supported_country(&self) -> Option<CountryCode> {
        self.country.parse().ok()
    }

    pub fn to_input(&self) -> PropertyInput {
        PropertyInput {
            address: Some(self.address.clone()),
            property_type: self.property_type.clone(),
            bedrooms: self.bedrooms.map(|v| v.to_string()),
            bathrooms: self.bathrooms.map(|v| v.to_string()),
            square_footage: self.square_footage.map(|v| v.to_string()),
            lot_size: None,
            year_built: self.year_built.map(|v| v.to_string()),
            condition: self.condition.clone(),
            features: None,
            country: self.supported_country(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// Country used until the user selects one.
    #[serde(default)]
    pub country: Option<CountryCode>,
    #[serde(default)]
    pub data_path: Option<String>,
    #[serde(default)]
    pub listings: Vec<Listing>,
}

impl AppConfig {
    /// Loads the default config file, or built-in defaults when there is none.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "valuer", "valuer")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("dev", "valuer", "valuer")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn default_country(&self) -> CountryCode {
        self.country.unwrap_or_default()
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}
