//! Supported countries and their currencies.

use crate::core::error::ValuationError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Currencies of the fixed conversion basket. USD is the base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Currency {
    USD,
    INR,
    EUR,
    GBP,
    AED,
}

impl Currency {
    pub const ALL: [Currency; 5] = [
        Currency::USD,
        Currency::INR,
        Currency::EUR,
        Currency::GBP,
        Currency::AED,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::INR => "INR",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::AED => "AED",
        }
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = ValuationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Currency::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValuationError::Parse(format!("Unknown currency: {s}")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CountryCode {
    #[default]
    IN,
    US,
    EU,
    UK,
    AE,
}

impl CountryCode {
    pub const ALL: [CountryCode; 5] = [
        CountryCode::IN,
        CountryCode::US,
        CountryCode::EU,
        CountryCode::UK,
        CountryCode::AE,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            CountryCode::IN => "IN",
            CountryCode::US => "US",
            CountryCode::EU => "EU",
            CountryCode::UK => "UK",
            CountryCode::AE => "AE",
        }
    }

    pub fn currency(&self) -> Currency {
        match self {
            CountryCode::IN => Currency::INR,
            CountryCode::US => Currency::USD,
            CountryCode::EU => Currency::EUR,
            CountryCode::UK => Currency::GBP,
            CountryCode::AE => Currency::AED,
        }
    }

    /// BCP 47 tag of the locale used to display amounts for this country.
    pub fn locale(&self) -> &'static str {
        match self {
            CountryCode::IN => "en-IN",
            CountryCode::US => "en-US",
            CountryCode::EU => "de-DE",
            CountryCode::UK => "en-GB",
            CountryCode::AE => "en-AE",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CountryCode::IN => "India",
            CountryCode::US => "USA",
            CountryCode::EU => "EU",
            CountryCode::UK => "UK",
            CountryCode::AE => "UAE",
        }
    }
}

impl Display for CountryCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for CountryCode {
    type Err = ValuationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "IN" => Ok(CountryCode::IN),
            "US" => Ok(CountryCode::US),
            "EU" => Ok(CountryCode::EU),
            "UK" => Ok(CountryCode::UK),
            "AE" => Ok(CountryCode::AE),
            _ => Err(ValuationError::UnknownCountry(s.to_string())),
        }
    }
}
