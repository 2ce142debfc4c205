//! USD based conversion tables and their cache entries.

use crate::core::country::Currency;
use crate::core::error::ValuationError;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Freshness window of a fetched rate table.
pub const RATE_TTL_MS: i64 = 12 * 60 * 60 * 1000;

/// Static USD-to-currency rates used until a fetch succeeds.
pub const DEFAULT_RATES: [(Currency, f64); 5] = [
    (Currency::USD, 1.0),
    (Currency::INR, 88.61),
    (Currency::EUR, 0.8628),
    (Currency::GBP, 0.7614),
    (Currency::AED, 3.671),
];

/// Units of each basket currency per 1 USD.
///
/// A table always holds every currency of the basket and its USD entry is
/// exactly `1.0`. Tables are never mutated; merging produces a new table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RateTable {
    rates: BTreeMap<Currency, f64>,
}

impl RateTable {
    pub fn defaults() -> Self {
        Self {
            rates: DEFAULT_RATES.into_iter().collect(),
        }
    }

    pub fn rate(&self, currency: Currency) -> Option<f64> {
        self.rates.get(&currency).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Currency, f64)> + '_ {
        self.rates.iter().map(|(c, r)| (*c, *r))
    }

    /// Returns a copy of this table with the valid `overrides` applied.
    ///
    /// Rates that are not finite or not positive are ignored, as is any
    /// override of USD.
    pub fn merged<I>(&self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (Currency, f64)>,
    {
        let mut rates = self.rates.clone();
        for (currency, rate) in overrides {
            if currency == Currency::USD || !is_valid_rate(rate) {
                continue;
            }
            rates.insert(currency, rate);
        }
        Self { rates }
    }

    /// Builds a table from an untrusted `{ "<CODE>": number }` object.
    ///
    /// Every basket currency that is missing or not a usable number keeps
    /// its static default. Unknown codes are ignored.
    pub fn from_untrusted(rates: &Map<String, Value>) -> Self {
        let overrides = Currency::ALL.into_iter().filter_map(|currency| {
            rates
                .get(currency.code())
                .and_then(Value::as_f64)
                .map(|rate| (currency, rate))
        });
        Self::defaults().merged(overrides)
    }

    pub fn to_json(&self) -> Result<String, ValuationError> {
        serde_json::to_string(self).map_err(|e| ValuationError::Parse(e.to_string()))
    }

    pub fn from_json(raw: &str) -> Result<Self, ValuationError> {
        let value: Value =
            serde_json::from_str(raw).map_err(|e| ValuationError::Parse(e.to_string()))?;
        let object = value
            .as_object()
            .ok_or_else(|| ValuationError::Parse("Rate table is not a JSON object".to_string()))?;
        Ok(Self::from_untrusted(object))
    }
}

impl Default for RateTable {
    fn default() -> Self {
        Self::defaults()
    }
}

fn is_valid_rate(rate: f64) -> bool {
    rate.is_finite() && rate > 0.0
}

/// A rate table together with the time it was fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub table: RateTable,
    pub fetched_at_ms: i64,
}

impl CacheEntry {
    pub fn is_fresh(&self, now_ms: i64) -> bool {
        // A zero timestamp marks an entry that was never fetched.
        self.fetched_at_ms > 0 && now_ms - self.fetched_at_ms < RATE_TTL_MS
    }
}

/// Read access to the rate table currently in effect.
pub trait RateSnapshot: Send + Sync {
    fn current(&self) -> RateTable;
}

impl RateSnapshot for RateTable {
    fn current(&self) -> RateTable {
        self.clone()
    }
}

/// Source of fresh rate tables, usually a remote FX service.
#[async_trait]
pub trait RateFetcher: Send + Sync {
    async fn fetch(&self) -> Result<RateTable, ValuationError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_default_table() {
        let table = RateTable::defaults();
        assert_eq!(table.rate(Currency::USD), Some(1.0));
        assert_eq!(table.rate(Currency::INR), Some(88.61));
        assert_eq!(table.rate(Currency::EUR), Some(0.8628));
        assert_eq!(table.rate(Currency::GBP), Some(0.7614));
        assert_eq!(table.rate(Currency::AED), Some(3.671));
        assert_eq!(table.iter().count(), 5);
    }

    #[test]
    fn test_merge_ignores_invalid_rates() {
        let table = RateTable::defaults().merged([
            (Currency::INR, 83.0),
            (Currency::EUR, -1.0),
            (Currency::GBP, f64::NAN),
            (Currency::USD, 2.0),
        ]);
        assert_eq!(table.rate(Currency::INR), Some(83.0));
        assert_eq!(table.rate(Currency::EUR), Some(0.8628));
        assert_eq!(table.rate(Currency::GBP), Some(0.7614));
        assert_eq!(table.rate(Currency::USD), Some(1.0));
    }

    #[test]
    fn test_from_untrusted_partial_payload() {
        let payload = json!({"INR": 84.5, "EUR": "0.9", "GBP": null, "JPY": 150.0, "AED": 0});
        let table = RateTable::from_untrusted(payload.as_object().unwrap());
        assert_eq!(table.rate(Currency::INR), Some(84.5));
        assert_eq!(table.rate(Currency::EUR), Some(0.8628));
        assert_eq!(table.rate(Currency::GBP), Some(0.7614));
        assert_eq!(table.rate(Currency::AED), Some(3.671));
        assert_eq!(table.iter().count(), 5);
    }

    #[test]
    fn test_json_round_trip_and_corruption() {
        let table = RateTable::defaults().merged([(Currency::INR, 85.25)]);
        let raw = table.to_json().unwrap();
        assert!(raw.contains("\"INR\":85.25"));
        assert_eq!(RateTable::from_json(&raw).unwrap(), table);

        assert!(RateTable::from_json("not json").is_err());
        assert!(RateTable::from_json("[1, 2]").is_err());
    }

    #[test]
    fn test_cache_entry_freshness() {
        let entry = CacheEntry {
            table: RateTable::defaults(),
            fetched_at_ms: 1_000,
        };
        assert!(entry.is_fresh(1_000 + RATE_TTL_MS - 1));
        assert!(!entry.is_fresh(1_000 + RATE_TTL_MS));

        let never_fetched = CacheEntry {
            table: RateTable::defaults(),
            fetched_at_ms: 0,
        };
        assert!(!never_fetched.is_fresh(1));
    }

    proptest! {
        #[test]
        fn prop_untrusted_payload_keeps_full_basket(
            inr in proptest::option::of(any::<f64>()),
            eur in proptest::option::of(any::<f64>()),
            junk in "[a-z]{0,8}",
        ) {
            let mut rates = Map::new();
            if let Some(v) = inr.and_then(serde_json::Number::from_f64) {
                rates.insert("INR".to_string(), Value::Number(v));
            }
            if let Some(v) = eur.and_then(serde_json::Number::from_f64) {
                rates.insert("EUR".to_string(), Value::Number(v));
            }
            rates.insert("GBP".to_string(), Value::String(junk));

            let table = RateTable::from_untrusted(&rates);
            prop_assert_eq!(table.iter().count(), 5);
            prop_assert_eq!(table.rate(Currency::USD), Some(1.0));
            prop_assert_eq!(table.rate(Currency::GBP), Some(0.7614));
            prop_assert_eq!(table.rate(Currency::AED), Some(3.671));
            for (_, rate) in table.iter() {
                prop_assert!(rate.is_finite() && rate > 0.0);
            }
            match inr {
                Some(v) if v.is_finite() && v > 0.0 => prop_assert_eq!(table.rate(Currency::INR), Some(v)),
                _ => prop_assert_eq!(table.rate(Currency::INR), Some(88.61)),
            }
        }
    }
}
