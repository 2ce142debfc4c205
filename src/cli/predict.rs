use crate::cli::ui;
use crate::core::country::{CountryCode, Currency};
use crate::core::currency::{fallback_format, format_currency};
use crate::core::error::ValuationError;
use crate::core::estimate::PriceEstimate;
use crate::core::features::PropertyInput;
use crate::core::valuation::PredictionGateway;
use anyhow::Result;

pub async fn run(gateway: &PredictionGateway, details: &PropertyInput) -> Result<()> {
    let estimate = gateway
        .predict(details)
        .await
        .map_err(|e| {
            let hint = failure_hint(&e);
            anyhow::Error::new(e).context(hint)
        })?;
    println!("{}", render(details, &estimate));
    Ok(())
}

fn failure_hint(error: &ValuationError) -> &'static str {
    if error.is_remote() {
        "Prediction failed; check the prediction service and your API key"
    } else {
        "Prediction failed"
    }
}

/// Formats the local price by its currency code, whatever the source.
pub fn format_local(estimate: &PriceEstimate) -> String {
    match estimate.currency_code.parse::<Currency>() {
        Ok(currency) => match CountryCode::ALL.into_iter().find(|c| c.currency() == currency) {
            Some(country) => format_currency(estimate.price_local, country),
            None => fallback_format(estimate.price_local, currency),
        },
        Err(_) => format!("{} {:.0}", estimate.currency_code, estimate.price_local),
    }
}

pub fn render(details: &PropertyInput, estimate: &PriceEstimate) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Price (USD)"),
        ui::header_cell(&format!("Price ({})", estimate.currency_code)),
        ui::header_cell("Source"),
    ]);
    table.add_row(vec![
        ui::amount_cell(format_currency(estimate.price_usd, CountryCode::US)),
        ui::amount_cell(format_local(estimate)),
        ui::source_cell(estimate.source),
    ]);

    let title = details.address.as_deref().unwrap_or("Property estimate");
    format!(
        "{}\n\n{}",
        ui::style_text(title, ui::StyleType::Title),
        table
    )
}
