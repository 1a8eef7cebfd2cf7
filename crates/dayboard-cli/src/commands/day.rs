use clap::Subcommand;
use dayboard_core::{Clock, Config, SystemClock, WaterIntake};

use super::{open_store, CliResult};

#[derive(Subcommand)]
pub enum DayAction {
    /// Start a new day: remove every item and zero the water counter
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(action: DayAction) -> CliResult {
    match action {
        DayAction::Reset { yes } => {
            if !yes {
                return Err("refusing to reset without --yes".into());
            }
            let mut store = open_store()?;
            let removed = store.reset_all()?;

            let goal = Config::load_or_default().water.goal_oz;
            let mut intake = WaterIntake::load(store.persistence(), goal, SystemClock.today())?;
            intake.reset();
            intake.save(store.persistence())?;

            println!("new day started: {removed} item(s) removed");
        }
    }
    Ok(())
}
