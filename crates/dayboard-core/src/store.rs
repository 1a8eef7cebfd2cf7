//! The item set and its recurring-series rules.
//!
//! [`RecurrenceStore`] owns every task and time block for the session, in
//! display order. Each item moves through a tiny state machine:
//!
//! ```text
//!   Active(completed=false) <--toggle--> Active(completed=true)
//!            \                               /
//!             +--------> Deleted <----------+
//! ```
//!
//! Deleting a recurring item takes a [`DeleteScope`]: `Instance` removes the
//! one item, `Series` removes the series root and every occurrence linked to
//! it. Validation happens before any mutation, so a rejected call leaves the
//! set untouched. After each mutation the set is handed to the
//! [`Persistence`] collaborator; a failed save is reported but the in-memory
//! change stands.

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::clock::{Clock, SystemClock};
use crate::error::{Result, StoreError, ValidationError};
use crate::item::{
    Category, ClockTime, Item, ItemDraft, ItemKind, ItemPatch, Recurrence, RecurrenceChange,
};
use crate::stats;
use crate::storage::Persistence;
use crate::timeline;

/// How much of a series a delete removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeleteScope {
    /// Only the referenced item.
    #[default]
    Instance,
    /// The series root and all of its occurrences.
    Series,
}

impl fmt::Display for DeleteScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeleteScope::Instance => f.write_str("instance"),
            DeleteScope::Series => f.write_str("series"),
        }
    }
}

impl FromStr for DeleteScope {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "instance" => Ok(DeleteScope::Instance),
            "series" => Ok(DeleteScope::Series),
            other => Err(ValidationError::invalid(
                "scope",
                format!("'{other}' is not 'instance' or 'series'"),
            )),
        }
    }
}

/// Which kind of item a filter keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindFilter {
    Task,
    Block,
}

/// Common list predicates. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
    pub kind: Option<KindFilter>,
    pub category: Option<Category>,
    pub top_priority: Option<bool>,
    pub completed: Option<bool>,
    /// Root id; keeps the root and its occurrences.
    pub series: Option<String>,
}

impl ItemFilter {
    pub fn tasks() -> Self {
        Self {
            kind: Some(KindFilter::Task),
            ..Self::default()
        }
    }

    pub fn blocks() -> Self {
        Self {
            kind: Some(KindFilter::Block),
            ..Self::default()
        }
    }

    pub fn matches(&self, item: &Item) -> bool {
        let kind_ok = match self.kind {
            Some(KindFilter::Task) => item.is_task(),
            Some(KindFilter::Block) => item.is_block(),
            None => true,
        };
        kind_ok
            && self.category.map_or(true, |c| item.category == c)
            && self
                .top_priority
                .map_or(true, |top| item.is_task() && item.is_top_priority() == top)
            && self.completed.map_or(true, |c| item.completed == c)
            && self
                .series
                .as_deref()
                .map_or(true, |root| item.belongs_to_series(root))
    }
}

/// Ordered, session-scoped set of tasks and time blocks.
pub struct RecurrenceStore<P, C = SystemClock> {
    items: IndexMap<String, Item>,
    persistence: P,
    clock: C,
}

impl<P: Persistence> RecurrenceStore<P, SystemClock> {
    /// Load the stored set using the system's local date as "today".
    ///
    /// # Errors
    /// Returns [`StoreError::Persistence`] if the backend cannot be read.
    pub fn open(persistence: P) -> Result<Self> {
        Self::with_clock(persistence, SystemClock)
    }
}

impl<P: Persistence, C: Clock> RecurrenceStore<P, C> {
    /// Load the stored set with an explicit clock.
    ///
    /// A stored set containing duplicate ids is treated as invalid and
    /// replaced by an empty one.
    pub fn with_clock(persistence: P, clock: C) -> Result<Self> {
        let loaded = persistence.load()?;
        let mut items = IndexMap::with_capacity(loaded.len());
        for item in loaded {
            if items.contains_key(&item.id) {
                warn!(id = %item.id, "duplicate id in stored items; starting empty");
                items.clear();
                break;
            }
            items.insert(item.id.clone(), item);
        }
        debug!(count = items.len(), "store opened");
        Ok(Self {
            items,
            persistence,
            clock,
        })
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    pub fn persistence_mut(&mut self) -> &mut P {
        &mut self.persistence
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    /// All items in display order.
    pub fn items(&self) -> impl Iterator<Item = &Item> + '_ {
        self.items.values()
    }

    /// Create an item from `draft` and return its new id.
    ///
    /// A recurrence request without a series id starts a new series rooted at
    /// this item (start date defaults to today). With a series id, the new
    /// item is an occurrence: the referenced item must be a series root of
    /// the same kind, and the occurrence date (default today) must not precede
    /// the root's start date.
    ///
    /// # Errors
    /// [`StoreError::Validation`] for an empty title, zero duration or a bad
    /// series link; [`StoreError::Persistence`] if the save fails (the item is
    /// kept in memory).
    pub fn add(&mut self, draft: ItemDraft) -> Result<String> {
        let recurrence = match &draft.recurrence {
            None => None,
            Some(req) => {
                let date = req.start_date.unwrap_or_else(|| self.clock.today());
                match &req.series_id {
                    None => Some(Recurrence::root(date)),
                    Some(root_id) => {
                        self.check_series_link(root_id, &draft.kind, date)?;
                        Some(Recurrence::occurrence(root_id.clone(), date))
                    }
                }
            }
        };

        let id = self.fresh_id(&draft.kind);
        let item = Item {
            id: id.clone(),
            title: draft.title,
            category: draft.category,
            completed: draft.completed,
            kind: draft.kind,
            recurrence,
        };
        item.validate()?;

        debug!(id = %id, kind = item.kind.name(), recurring = item.is_recurring(), "add item");
        self.items.insert(id.clone(), item);
        self.persist()?;
        Ok(id)
    }

    /// Materialize one occurrence of `root_id` on `date`, copying the root's
    /// title, category and kind fields. The copy starts incomplete.
    pub fn add_occurrence(&mut self, root_id: &str, date: NaiveDate) -> Result<String> {
        let root = self
            .items
            .get(root_id)
            .ok_or_else(|| StoreError::not_found(root_id))?;
        let draft = ItemDraft {
            title: root.title.clone(),
            category: root.category,
            completed: false,
            kind: root.kind.clone(),
            recurrence: None,
        }
        .starting(date)
        .occurrence_of(root_id);
        self.add(draft)
    }

    /// Flip `completed` on exactly this item and return the new value.
    pub fn toggle_completion(&mut self, id: &str) -> Result<bool> {
        let item = self
            .items
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found(id))?;
        item.completed = !item.completed;
        let completed = item.completed;
        debug!(id, completed, "toggle item");
        self.persist()?;
        Ok(completed)
    }

    /// Merge `patch` into the item at `id`.
    ///
    /// Only that item changes; editing an occurrence never touches its root.
    /// Enabling recurrence turns a one-off or an occurrence into a fresh
    /// series root dated today and leaves an existing root as it is;
    /// disabling drops the tag. Existing occurrences keep their links.
    ///
    /// # Errors
    /// [`ValidationError::StaleOccurrences`] when enabling recurrence on a
    /// former root that occurrences of its old series still point at.
    pub fn update(&mut self, id: &str, patch: ItemPatch) -> Result<()> {
        let today = self.clock.today();
        let current = self
            .items
            .get(id)
            .ok_or_else(|| StoreError::not_found(id))?;
        if patch.recurrence == Some(RecurrenceChange::Enable) && !current.is_series_root() {
            let count = self.stale_occurrences(id);
            if count > 0 {
                return Err(ValidationError::StaleOccurrences {
                    id: id.to_string(),
                    count,
                }
                .into());
            }
        }
        let mut updated = current.clone();
        patch.apply(&mut updated, today)?;

        debug!(id, "update item");
        self.items.insert(id.to_string(), updated);
        self.persist()
    }

    /// Drop a block onto an hour lane: its start becomes `hour:00`.
    pub fn move_block(&mut self, id: &str, hour: u8) -> Result<()> {
        if !self.items.contains_key(id) {
            return Err(StoreError::not_found(id));
        }
        let start = ClockTime::on_the_hour(hour)?;
        self.update(id, ItemPatch::new().start_time(start))
    }

    /// Delete `id`, or its whole series, and return the removed ids in
    /// display order.
    ///
    /// With [`DeleteScope::Series`] the root is the item itself when it is a
    /// root, otherwise the item its `series_id` names (which may already be
    /// gone). Unrelated items are never touched.
    ///
    /// # Errors
    /// [`StoreError::NotFound`] if `id` is absent; [`StoreError::AmbiguousScope`]
    /// if `Series` is requested for an item with no recurrence.
    pub fn delete(&mut self, id: &str, scope: DeleteScope) -> Result<Vec<String>> {
        let root_id = self
            .items
            .get(id)
            .ok_or_else(|| StoreError::not_found(id))?
            .series_root_id()
            .map(str::to_string);

        let removed = match (scope, root_id) {
            (DeleteScope::Series, None) => {
                return Err(StoreError::AmbiguousScope { id: id.to_string() });
            }
            (DeleteScope::Instance, _) => {
                self.items.shift_remove(id);
                vec![id.to_string()]
            }
            (DeleteScope::Series, Some(root_id)) => {
                let removed: Vec<String> = self
                    .items
                    .values()
                    .filter(|i| i.belongs_to_series(&root_id))
                    .map(|i| i.id.clone())
                    .collect();
                self.items.retain(|_, i| !i.belongs_to_series(&root_id));
                removed
            }
        };

        debug!(id, %scope, removed = removed.len(), "delete item");
        self.persist()?;
        Ok(removed)
    }

    /// Clear the whole set (the "start new day" signal). Returns how many
    /// items were removed.
    pub fn reset_all(&mut self) -> Result<usize> {
        let count = self.items.len();
        self.items.clear();
        debug!(count, "reset all items");
        self.persist()?;
        Ok(count)
    }

    /// Lazy, order-preserving view of the items matching `predicate`.
    pub fn list_by<'a, F>(&'a self, predicate: F) -> impl Iterator<Item = &'a Item> + Clone + 'a
    where
        F: Fn(&Item) -> bool + Clone + 'a,
    {
        self.items.values().filter(move |item| predicate(*item))
    }

    /// Items matching a common filter, in display order.
    pub fn list(&self, filter: &ItemFilter) -> Vec<&Item> {
        self.items.values().filter(|i| filter.matches(i)).collect()
    }

    /// A series root followed by its occurrences, in display order. Works
    /// for orphaned occurrences whose root was deleted as an instance.
    pub fn series_members<'a>(&'a self, root_id: &'a str) -> impl Iterator<Item = &'a Item> + 'a {
        self.items
            .values()
            .filter(move |i| i.belongs_to_series(root_id))
    }

    /// Blocks covering `hour` on the timeline.
    pub fn blocks_at_hour(&self, hour: u8) -> impl Iterator<Item = &Item> + '_ {
        self.items.values().filter(move |item| match item.kind {
            ItemKind::Block {
                start_time,
                duration,
            } => timeline::covers_hour(start_time, duration, hour),
            ItemKind::Task { .. } => false,
        })
    }

    /// Completion percentage (0..=100) of the items matching `predicate`.
    pub fn completion_rate<F>(&self, predicate: F) -> u8
    where
        F: Fn(&Item) -> bool + Clone,
    {
        stats::completion_rate(self.list_by(predicate))
    }

    fn check_series_link(
        &self,
        root_id: &str,
        kind: &ItemKind,
        date: NaiveDate,
    ) -> std::result::Result<(), ValidationError> {
        let root = self
            .items
            .get(root_id)
            .ok_or_else(|| ValidationError::UnknownSeries(root_id.to_string()))?;
        let start = match &root.recurrence {
            Some(r) if r.series_id.is_none() => r.start_date,
            _ => return Err(ValidationError::NotSeriesRoot(root_id.to_string())),
        };
        if !root.kind.same_kind(kind) {
            return Err(ValidationError::KindMismatch {
                field: "recurring.seriesId".to_string(),
                kind: kind.name().to_string(),
            });
        }
        if date < start {
            return Err(ValidationError::OccurrenceBeforeSeriesStart { date, start });
        }
        Ok(())
    }

    /// Occurrences naming `id` as their root.
    fn stale_occurrences(&self, id: &str) -> usize {
        self.items
            .values()
            .filter(|i| i.is_occurrence() && i.series_root_id() == Some(id))
            .count()
    }

    fn fresh_id(&self, kind: &ItemKind) -> String {
        loop {
            let id = format!("{}-{}", kind.name(), Uuid::new_v4().simple());
            if !self.items.contains_key(&id) {
                return id;
            }
        }
    }

    fn persist(&mut self) -> Result<()> {
        let snapshot: Vec<Item> = self.items.values().cloned().collect();
        self.persistence.save(&snapshot).map_err(|e| {
            warn!(error = %e, "failed to save items; keeping in-memory state");
            StoreError::Persistence(e)
        })
    }
}
