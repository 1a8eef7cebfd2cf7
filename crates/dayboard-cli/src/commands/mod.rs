//! Subcommand implementations and the helpers they share.

pub mod block;
pub mod config;
pub mod day;
pub mod memory;
pub mod series;
pub mod stats;
pub mod task;
pub mod water;

use chrono::NaiveDate;
use dayboard_core::{Item, ItemDb, ItemDraft, RecurrenceChange, RecurrenceStore};
use serde::Serialize;
use tracing::debug;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// The store backed by the on-disk database.
pub fn open_store() -> Result<RecurrenceStore<ItemDb>, Box<dyn std::error::Error>> {
    let store = RecurrenceStore::open(ItemDb::open()?)?;
    debug!(items = store.len(), "store opened");
    Ok(store)
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Attach the recurrence flags shared by `task add` and `block add`.
pub fn with_recurrence(
    draft: ItemDraft,
    recurring: bool,
    series: Option<String>,
    start_date: Option<NaiveDate>,
) -> ItemDraft {
    let draft = match series {
        Some(root) => draft.occurrence_of(root),
        None if recurring => draft.recurring(),
        None => draft,
    };
    match start_date {
        Some(date) => draft.starting(date),
        None => draft,
    }
}

/// `--recurring true|false` on update.
pub fn recurrence_change(flag: Option<bool>) -> Option<RecurrenceChange> {
    flag.map(|on| {
        if on {
            RecurrenceChange::Enable
        } else {
            RecurrenceChange::Disable
        }
    })
}

/// Refuse ids of the other kind, so `task` commands never edit blocks and
/// the reverse. Unknown ids pass through to the store's own `NotFound`.
pub fn require_kind(
    store: &RecurrenceStore<ItemDb>,
    id: &str,
    is_kind: fn(&Item) -> bool,
    command: &str,
) -> CliResult {
    match store.get(id) {
        Some(item) if !is_kind(item) => Err(format!(
            "{id} is a {}, not a {command}; use `dayboard {}`",
            item.kind.name(),
            item.kind.name()
        )
        .into()),
        _ => Ok(()),
    }
}
