//! Daily water intake counter.
//!
//! Intake is clamped to `[0, goal]` and starts over when the calendar day
//! changes or when a new day is started by hand.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::PersistenceError;
use crate::storage::ItemDb;

const KV_KEY: &str = "water_intake";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaterIntake {
    /// Daily goal in fluid ounces.
    pub goal_oz: u32,
    pub intake_oz: u32,
    /// Day the intake was counted for.
    pub day: NaiveDate,
}

impl WaterIntake {
    pub fn new(goal_oz: u32, day: NaiveDate) -> Self {
        Self {
            goal_oz,
            intake_oz: 0,
            day,
        }
    }

    /// Add up to the goal; returns the new intake.
    pub fn add(&mut self, amount_oz: u32) -> u32 {
        self.intake_oz = self.intake_oz.saturating_add(amount_oz).min(self.goal_oz);
        self.intake_oz
    }

    /// Remove down to zero; returns the new intake.
    pub fn remove(&mut self, amount_oz: u32) -> u32 {
        self.intake_oz = self.intake_oz.saturating_sub(amount_oz);
        self.intake_oz
    }

    /// Change the goal, clamping the current intake to it.
    pub fn set_goal(&mut self, goal_oz: u32) {
        self.goal_oz = goal_oz;
        self.intake_oz = self.intake_oz.min(goal_oz);
    }

    /// Zero the intake if `today` is a different day. Returns whether it did.
    pub fn roll_over(&mut self, today: NaiveDate) -> bool {
        if self.day == today {
            return false;
        }
        debug!(from = %self.day, to = %today, "water intake rolled over");
        self.day = today;
        self.intake_oz = 0;
        true
    }

    pub fn reset(&mut self) {
        self.intake_oz = 0;
    }

    pub fn needs_reminder(&self) -> bool {
        self.intake_oz < self.goal_oz
    }

    /// Progress toward the goal, 0-100.
    pub fn percent(&self) -> u8 {
        if self.goal_oz == 0 {
            return 100;
        }
        (u64::from(self.intake_oz) * 100 / u64::from(self.goal_oz)).min(100) as u8
    }

    /// Read the stored counter, rolled over to `today` and set to `goal_oz`.
    ///
    /// An unreadable stored value is replaced with a fresh counter.
    pub fn load(db: &ItemDb, goal_oz: u32, today: NaiveDate) -> Result<Self, PersistenceError> {
        let mut intake = match db.kv_get(KV_KEY)? {
            Some(raw) => serde_json::from_str::<WaterIntake>(&raw).unwrap_or_else(|e| {
                warn!("discarding stored water intake: {e}");
                WaterIntake::new(goal_oz, today)
            }),
            None => WaterIntake::new(goal_oz, today),
        };
        intake.set_goal(goal_oz);
        intake.roll_over(today);
        Ok(intake)
    }

    pub fn save(&self, db: &ItemDb) -> Result<(), PersistenceError> {
        db.kv_set(KV_KEY, &serde_json::to_string(self)?)
    }
}
