use crate::core::country::CountryCode;
use crate::core::currency::{CurrencyConverter, format_currency};

/// Converts `amount` into `to` (or the selected country).
///
/// Without `from` the amount is taken to be in USD.
pub fn run(
    converter: &CurrencyConverter,
    amount: f64,
    from: Option<CountryCode>,
    to: Option<CountryCode>,
) -> String {
    let to = to.unwrap_or_else(|| converter.default_country());
    match from {
        Some(from) => format!(
            "{} = {}",
            format_currency(amount, from),
            format_currency(converter.convert_between(amount, from, to), to)
        ),
        None => format!(
            "{} = {}",
            format_currency(amount, CountryCode::US),
            converter.convert_and_format(amount, Some(to))
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rates::RateTable;
    use std::sync::Arc;

    fn converter() -> CurrencyConverter {
        CurrencyConverter::new(Arc::new(RateTable::defaults()), CountryCode::IN)
    }

    #[test]
    fn test_convert_from_usd_to_selected_country() {
        assert_eq!(run(&converter(), 1000.0, None, None), "$1,000 = ₹88,610");
    }

    #[test]
    fn test_convert_between_countries() {
        assert_eq!(
            run(&converter(), 88610.0, Some(CountryCode::IN), Some(CountryCode::US)),
            "₹88,610 = $1,000"
        );
        assert_eq!(
            run(&converter(), 500.0, Some(CountryCode::UK), Some(CountryCode::UK)),
            "£500 = £500"
        );
    }
}
