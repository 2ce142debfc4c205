//! User preferences kept in the durable store.

use crate::core::country::CountryCode;
use crate::core::store::{COUNTRY_KEY, CREDENTIAL_KEY, KeyValueCollection};
use anyhow::Result;
use std::sync::Arc;
use tracing::debug;

pub struct Preferences {
    store: Arc<dyn KeyValueCollection>,
    default_country: CountryCode,
}

impl Preferences {
    pub fn new(store: Arc<dyn KeyValueCollection>, default_country: CountryCode) -> Self {
        Self {
            store,
            default_country,
        }
    }

    /// The saved country, or the default one when none (or garbage) is saved.
    pub async fn selected_country(&self) -> CountryCode {
        match self.store.get(COUNTRY_KEY).await {
            Some(saved) => saved.parse().unwrap_or_else(|_| {
                debug!("Ignoring invalid saved country: {}", saved);
                self.default_country
            }),
            None => self.default_country,
        }
    }

    pub async fn set_selected_country(&self, country: CountryCode) -> Result<()> {
        self.store.set(COUNTRY_KEY, country.code()).await
    }

    pub async fn credential(&self) -> Option<String> {
        self.store
            .get(CREDENTIAL_KEY)
            .await
            .filter(|token| !token.trim().is_empty())
    }

    pub async fn set_credential(&self, token: &str) -> Result<()> {
        self.store.set(CREDENTIAL_KEY, token.trim()).await
    }

    pub async fn clear_credential(&self) -> Result<()> {
        self.store.remove(CREDENTIAL_KEY).await
    }
}
