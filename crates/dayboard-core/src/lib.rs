//! # Dayboard Core Library
//!
//! This library provides the core business logic for Dayboard, a personal
//! daily planner. All operations are available through the standalone
//! `dayboard` CLI, which is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Items**: prioritized tasks and timeline blocks, optionally tagged with
//!   a daily recurrence (series root or materialized occurrence)
//! - **Store**: the ordered item set with scoped delete semantics for series
//! - **Storage**: SQLite item storage and TOML-based configuration
//! - **Stats / Timeline / Water / Memory**: progress numbers, hour lanes, the
//!   hydration counter and the memory-match break game
//!
//! ## Key Components
//!
//! - [`RecurrenceStore`]: owner of the item set
//! - [`Persistence`]: load/save seam the store writes through
//! - [`ItemDb`]: SQLite persistence
//! - [`Config`]: application configuration

pub mod clock;
pub mod error;
pub mod item;
pub mod memory;
pub mod stats;
pub mod storage;
pub mod store;
pub mod timeline;
pub mod water;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ConfigError, GameError, PersistenceError, Result, StoreError, ValidationError};
pub use item::{
    Category, ClockTime, Frequency, Item, ItemDraft, ItemKind, ItemPatch, Recurrence,
    RecurrenceChange, RecurrenceRequest,
};
pub use memory::{FlipOutcome, MemoryGame};
pub use stats::{completion_rate, day_progress, time_distribution, CategoryShare, ProgressSummary};
pub use storage::{Config, ItemDb, MemoryPersistence, Persistence};
pub use store::{DeleteScope, ItemFilter, KindFilter, RecurrenceStore};
pub use timeline::timeline_hours;
pub use water::WaterIntake;
