//! Conversion and display of USD amounts in a country's currency.

use crate::core::country::{CountryCode, Currency};
use crate::core::rates::RateSnapshot;
use num_format::{CustomFormat, Grouping, Locale, ToFormattedString};
use std::sync::Arc;
use tracing::debug;

/// Converts amounts with whatever rate table is current at call time.
pub struct CurrencyConverter {
    rates: Arc<dyn RateSnapshot>,
    default_country: CountryCode,
}

impl CurrencyConverter {
    pub fn new(rates: Arc<dyn RateSnapshot>, default_country: CountryCode) -> Self {
        Self {
            rates,
            default_country,
        }
    }

    pub fn default_country(&self) -> CountryCode {
        self.default_country
    }

    fn rate(&self, currency: Currency) -> f64 {
        // Conversion never fails; a missing rate degrades to identity.
        self.rates.current().rate(currency).unwrap_or(1.0)
    }

    pub fn convert(&self, amount_usd: f64, target: Option<CountryCode>) -> f64 {
        let country = target.unwrap_or(self.default_country);
        amount_usd * self.rate(country.currency())
    }

    /// Converts `amount` from one country's currency to another's via USD.
    pub fn convert_between(&self, amount: f64, from: CountryCode, to: CountryCode) -> f64 {
        if from == to {
            return amount;
        }
        let table = self.rates.current();
        let from_rate = table.rate(from.currency()).unwrap_or(1.0);
        let to_rate = table.rate(to.currency()).unwrap_or(1.0);
        amount / from_rate * to_rate
    }

    pub fn format(&self, amount: f64, country: Option<CountryCode>) -> String {
        format_currency(amount, country.unwrap_or(self.default_country))
    }

    pub fn convert_and_format(&self, amount_usd: f64, country: Option<CountryCode>) -> String {
        let country = country.unwrap_or(self.default_country);
        format_currency(self.convert(amount_usd, Some(country)), country)
    }
}

/// How a locale lays out a currency amount.
struct CurrencyStyle {
    prefix: &'static str,
    suffix: &'static str,
    separator: &'static str,
    grouping: Grouping,
}

fn style_for(country: CountryCode) -> CurrencyStyle {
    match country {
        CountryCode::IN => CurrencyStyle {
            prefix: "₹",
            suffix: "",
            separator: ",",
            grouping: Grouping::Indian,
        },
        CountryCode::US => CurrencyStyle {
            prefix: "$",
            suffix: "",
            separator: ",",
            grouping: Grouping::Standard,
        },
        CountryCode::EU => CurrencyStyle {
            prefix: "",
            suffix: "\u{a0}€",
            separator: ".",
            grouping: Grouping::Standard,
        },
        CountryCode::UK => CurrencyStyle {
            prefix: "£",
            suffix: "",
            separator: ",",
            grouping: Grouping::Standard,
        },
        CountryCode::AE => CurrencyStyle {
            prefix: "AED\u{a0}",
            suffix: "",
            separator: ",",
            grouping: Grouping::Standard,
        },
    }
}

/// Formats `amount` in the country's currency with no fractional digits.
pub fn format_currency(amount: f64, country: CountryCode) -> String {
    match format_localized(amount, country) {
        Ok(formatted) => formatted,
        Err(reason) => {
            debug!(
                "Falling back to plain formatting for {} in {}: {}",
                amount,
                country.locale(),
                reason
            );
            fallback_format(amount, country.currency())
        }
    }
}

fn format_localized(amount: f64, country: CountryCode) -> Result<String, String> {
    let rounded = round_to_integer(amount)?;
    let style = style_for(country);
    let format = CustomFormat::builder()
        .grouping(style.grouping)
        .separator(style.separator)
        .build()
        .map_err(|e| e.to_string())?;
    let sign = if rounded < 0 { "-" } else { "" };
    Ok(format!(
        "{sign}{}{}{}",
        style.prefix,
        rounded.unsigned_abs().to_formatted_string(&format),
        style.suffix
    ))
}

/// `"<CODE> <rounded-integer-with-grouping>"`
pub fn fallback_format(amount: f64, currency: Currency) -> String {
    match round_to_integer(amount) {
        Ok(rounded) => format!("{} {}", currency.code(), rounded.to_formatted_string(&Locale::en)),
        Err(_) => format!("{} {}", currency.code(), amount.round()),
    }
}

fn round_to_integer(amount: f64) -> Result<i64, String> {
    let rounded = amount.round();
    if !rounded.is_finite() || rounded.abs() >= i64::MAX as f64 {
        return Err(format!("{amount} is not representable"));
    }
    Ok(rounded as i64)
}
