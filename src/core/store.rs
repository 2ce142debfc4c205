//! Durable key-value storage abstraction

use anyhow::Result;
use async_trait::async_trait;

/// Serialized USD rate table.
pub const FX_CACHE_KEY: &str = "app:fx:usd_to";
/// Epoch milliseconds of the last successful rate fetch.
pub const FX_CACHE_TS_KEY: &str = "app:fx:usd_to:ts";
pub const COUNTRY_KEY: &str = "app:country";
pub const CREDENTIAL_KEY: &str = "auth:token";

#[async_trait]
pub trait KeyValueCollection: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
    /// Writes all entries or none of them.
    async fn set_many(&self, entries: &[(&str, &str)]) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}
