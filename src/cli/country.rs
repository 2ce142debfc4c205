use crate::cli::ui;
use crate::core::country::CountryCode;
use crate::core::preferences::Preferences;
use anyhow::Result;
use comfy_table::Cell;
use tracing::debug;

pub async fn run(prefs: &Preferences, set: Option<CountryCode>) -> Result<()> {
    if let Some(country) = set {
        prefs.set_selected_country(country).await?;
        debug!("Selected country set to {}", country);
    }
    println!("{}", render(prefs.selected_country().await));
    Ok(())
}

pub fn render(selected: CountryCode) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell(""),
        ui::header_cell("Code"),
        ui::header_cell("Country"),
        ui::header_cell("Currency"),
        ui::header_cell("Locale"),
    ]);
    for country in CountryCode::ALL {
        let marker = if country == selected { "*" } else { "" };
        table.add_row(vec![
            Cell::new(marker),
            Cell::new(country.code()),
            Cell::new(country.display_name()),
            Cell::new(country.currency().code()),
            Cell::new(country.locale()),
        ]);
    }
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryCollection;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_run_persists_selection() {
        let prefs = Preferences::new(Arc::new(MemoryCollection::new()), CountryCode::IN);
        run(&prefs, Some(CountryCode::EU)).await.unwrap();
        assert_eq!(prefs.selected_country().await, CountryCode::EU);

        run(&prefs, None).await.unwrap();
        assert_eq!(prefs.selected_country().await, CountryCode::EU);
    }

    #[test]
    fn test_render_lists_all_countries() {
        let output = render(CountryCode::UK);
        for country in CountryCode::ALL {
            assert!(output.contains(country.display_name()));
        }
        assert!(output.contains("en-GB"));
    }
}
