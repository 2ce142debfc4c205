use crate::cli::ui;
use crate::core::config::Listing;
use crate::core::country::CountryCode;
use crate::core::currency::{CurrencyConverter, format_currency};
use crate::core::error::ValuationError;
use crate::core::estimate::PriceEstimate;
use crate::core::valuation::PredictionGateway;
use anyhow::Result;
use comfy_table::Cell;
use futures::future::join_all;
use tracing::debug;

type Valuation<'a> = (&'a Listing, Result<PriceEstimate, ValuationError>);

/// Values the configured listings concurrently and prints them as a table.
pub async fn run(
    gateway: &PredictionGateway,
    converter: &CurrencyConverter,
    listings: &[Listing],
    country: Option<&str>,
) -> Result<()> {
    let selected = filter_listings(listings, country);
    if selected.is_empty() {
        println!(
            "{}",
            ui::style_text("No listings to show", ui::StyleType::Subtle)
        );
        return Ok(());
    }
    debug!("Valuing {} listings", selected.len());

    let pb = ui::new_progress_bar(selected.len() as u64, "Valuing listings...");
    let futures = selected.iter().map(|listing| {
        let pb = pb.clone();
        async move {
            let result = gateway.predict(&listing.to_input()).await;
            pb.inc(1);
            (*listing, result)
        }
    });
    let valuations: Vec<Valuation> = join_all(futures).await;
    pb.finish_and_clear();

    println!("{}", render(&valuations, converter));
    Ok(())
}

pub fn filter_listings<'a>(listings: &'a [Listing], country: Option<&str>) -> Vec<&'a Listing> {
    listings
        .iter()
        .filter(|l| country.is_none_or(|c| l.country.eq_ignore_ascii_case(c.trim())))
        .collect()
}

pub fn pretty_property_type(raw: &str) -> String {
    let label = match raw.to_lowercase().as_str() {
        "single-family" | "single family" => "Single Family Home",
        "condo" | "condominium" => "Condominium",
        "townhouse" => "Townhouse",
        "duplex" => "Duplex",
        "apartment" => "Apartment",
        "mansion" => "Mansion",
        "land" | "land/lot" => "Land/Lot",
        _ => {
            let mut chars = raw.chars();
            return match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            };
        }
    };
    label.to_string()
}

/// Supported countries get their own currency, everything else USD.
fn display_price(converter: &CurrencyConverter, listing: &Listing, price_usd: f64) -> String {
    match listing.supported_country() {
        Some(country) => converter.convert_and_format(price_usd, Some(country)),
        None => format_currency(price_usd, CountryCode::US),
    }
}

pub fn render(valuations: &[Valuation], converter: &CurrencyConverter) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Address"),
        ui::header_cell("Country"),
        ui::header_cell("Type"),
        ui::header_cell("Area"),
        ui::header_cell("Estimate"),
        ui::header_cell("Source"),
    ]);

    for (listing, result) in valuations {
        let mut row = vec![
            Cell::new(&listing.address),
            Cell::new(listing.country.to_uppercase()),
            ui::optional_cell(listing.property_type.as_deref(), pretty_property_type),
            ui::optional_cell(listing.square_footage, |sqft| format!("{sqft} sqft")),
        ];
        match result {
            Ok(estimate) => {
                row.push(ui::amount_cell(display_price(
                    converter,
                    listing,
                    estimate.price_usd,
                )));
                row.push(ui::source_cell(estimate.source));
            }
            Err(e) => {
                row.push(ui::error_cell(&e.to_string()));
                row.push(Cell::new(""));
            }
        }
        table.add_row(row);
    }
    table.to_string()
}
