use crate::cli::ui;
use crate::core::rate_cache::{RateCache, RefreshOutcome};
use anyhow::Result;
use chrono::{DateTime, Utc};
use comfy_table::Cell;

/// Refreshes the rate table and prints it with its provenance.
pub async fn run(rates: &RateCache, force: bool) -> Result<()> {
    let outcome = rates.refresh(force).await;
    let fetched_at = rates.cached().map(|entry| entry.fetched_at_ms);
    println!("{}", render(&outcome, fetched_at));
    Ok(())
}

fn describe_fetch_time(fetched_at_ms: Option<i64>) -> String {
    fetched_at_ms
        .filter(|ts| *ts > 0)
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map_or("never".to_string(), |at| {
            at.format("%Y-%m-%d %H:%M UTC").to_string()
        })
}

pub fn render(outcome: &RefreshOutcome, fetched_at_ms: Option<i64>) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Currency"), ui::header_cell("Per USD")]);
    for (currency, rate) in outcome.table().iter() {
        table.add_row(vec![
            Cell::new(currency.code()),
            ui::amount_cell(format!("{rate:.4}")),
        ]);
    }

    let status = match outcome {
        RefreshOutcome::Fetched(_) | RefreshOutcome::Cached(_) => {
            ui::style_text(outcome.label(), ui::StyleType::Amount)
        }
        RefreshOutcome::Stale(_) | RefreshOutcome::Defaulted(_) => {
            ui::style_text(outcome.label(), ui::StyleType::Warning)
        }
    };

    format!(
        "{}\n\n{}\n\n{} {} {}",
        ui::style_text("Exchange rates", ui::StyleType::Title),
        table,
        ui::style_text("Source:", ui::StyleType::Label),
        status,
        ui::style_text(
            &format!("(last fetch: {})", describe_fetch_time(fetched_at_ms)),
            ui::StyleType::Subtle
        ),
    )
}
