use chrono::Local;
use clap::Subcommand;
use dayboard_core::{day_progress, time_distribution, ProgressSummary};
use serde_json::json;

use super::{open_store, print_json, CliResult};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Task completion rates and how far the day has gone
    Progress,
    /// Scheduled minutes per category
    Distribution,
}

pub fn run(action: StatsAction) -> CliResult {
    let store = open_store()?;

    match action {
        StatsAction::Progress => {
            let summary = ProgressSummary::from_items(store.items());
            let day = day_progress(Local::now().time());
            print_json(&json!({
                "overall": summary.overall,
                "topPriority": summary.top_priority,
                "secondary": summary.secondary,
                "totalTasks": summary.total_tasks,
                "completedTasks": summary.completed_tasks,
                "allDone": summary.all_done(),
                "dayProgress": (day * 10.0).round() / 10.0,
            }))?;
        }
        StatsAction::Distribution => {
            print_json(&time_distribution(store.items()))?;
        }
    }
    Ok(())
}
