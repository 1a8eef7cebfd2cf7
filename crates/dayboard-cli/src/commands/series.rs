use chrono::NaiveDate;
use clap::Subcommand;
use dayboard_core::ItemFilter;

use super::{open_store, print_json, CliResult};

#[derive(Subcommand)]
pub enum SeriesAction {
    /// Show a series root and its occurrences
    Show {
        /// Root item ID
        root_id: String,
    },
    /// Materialize one occurrence of a series
    Occur {
        /// Root item ID
        root_id: String,
        /// Occurrence date (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

pub fn run(action: SeriesAction) -> CliResult {
    let mut store = open_store()?;

    match action {
        SeriesAction::Show { root_id } => {
            let filter = ItemFilter {
                series: Some(root_id.clone()),
                ..ItemFilter::default()
            };
            let members = store.list(&filter);
            if members.is_empty() {
                return Err(format!("no series with root {root_id}").into());
            }
            print_json(&members)?;
        }
        SeriesAction::Occur { root_id, date } => {
            let date = date.unwrap_or_else(|| store.today());
            let id = store.add_occurrence(&root_id, date)?;
            println!("Occurrence created: {id}");
            if let Some(item) = store.get(&id) {
                print_json(item)?;
            }
        }
    }
    Ok(())
}
