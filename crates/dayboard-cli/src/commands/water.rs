use clap::Subcommand;
use dayboard_core::{Clock, Config, ItemDb, SystemClock, WaterIntake};

use super::{print_json, CliResult};

#[derive(Subcommand)]
pub enum WaterAction {
    /// Log water (default: water.step_oz)
    Add {
        /// Ounces
        amount: Option<u32>,
    },
    /// Take back logged water (default: water.step_oz)
    Remove {
        /// Ounces
        amount: Option<u32>,
    },
    /// Show today's intake
    Status,
}

pub fn run(action: WaterAction) -> CliResult {
    let config = Config::load_or_default().water;
    let db = ItemDb::open()?;
    let mut intake = WaterIntake::load(&db, config.goal_oz, SystemClock.today())?;

    match action {
        WaterAction::Add { amount } => {
            intake.add(amount.unwrap_or(config.step_oz));
            intake.save(&db)?;
        }
        WaterAction::Remove { amount } => {
            intake.remove(amount.unwrap_or(config.step_oz));
            intake.save(&db)?;
        }
        WaterAction::Status => {}
    }

    print_json(&serde_json::json!({
        "intakeOz": intake.intake_oz,
        "goalOz": intake.goal_oz,
        "percent": intake.percent(),
        "needsReminder": intake.needs_reminder(),
    }))
}
