//! Schedulable items: prioritized tasks and timeline blocks.
//!
//! Both kinds share identity, title, category, completion and an optional
//! daily recurrence. Whether an item is a series root or a materialized
//! occurrence is carried by [`Recurrence::series_id`], not by the type:
//!
//! ```text
//!   recurrence: None                   one-off item
//!   recurrence: Some { series_id: None }     series root
//!   recurrence: Some { series_id: Some(r) }  occurrence of root `r`
//! ```

mod clock_time;
mod draft;

pub use clock_time::ClockTime;
pub use draft::{ItemDraft, ItemPatch, RecurrenceChange, RecurrenceRequest};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Life area an item belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    #[default]
    Work,
    SelfCare,
    Family,
    Health,
    Social,
    Other,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 6] = [
        Category::Work,
        Category::SelfCare,
        Category::Family,
        Category::Health,
        Category::Social,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Work => "work",
            Category::SelfCare => "self-care",
            Category::Family => "family",
            Category::Health => "health",
            Category::Social => "social",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                ValidationError::invalid(
                    "category",
                    format!("'{s}' is not one of work, self-care, family, health, social, other"),
                )
            })
    }
}

/// Recurrence rule. Daily is the only supported frequency.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    #[default]
    Daily,
}

/// Recurrence tag attached to a series root or one of its occurrences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Recurrence {
    /// `None` on the series root, the root's id on occurrences.
    #[serde(alias = "parentId")]
    pub series_id: Option<String>,
    #[serde(default)]
    pub frequency: Frequency,
    /// First day of the series (root) or the day an occurrence belongs to.
    pub start_date: NaiveDate,
}

impl Recurrence {
    /// A fresh series root starting on `start_date`.
    pub fn root(start_date: NaiveDate) -> Self {
        Self {
            series_id: None,
            frequency: Frequency::Daily,
            start_date,
        }
    }

    /// An occurrence of `series_id` on `date`.
    pub fn occurrence(series_id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            series_id: Some(series_id.into()),
            frequency: Frequency::Daily,
            start_date: date,
        }
    }
}

/// Kind-specific fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ItemKind {
    /// Prioritized task.
    Task {
        #[serde(rename = "isTopPriority", default)]
        is_top_priority: bool,
    },
    /// Timeline block.
    Block {
        #[serde(rename = "startTime")]
        start_time: ClockTime,
        /// Length in minutes
        duration: u32,
    },
}

impl ItemKind {
    pub fn name(&self) -> &'static str {
        match self {
            ItemKind::Task { .. } => "task",
            ItemKind::Block { .. } => "block",
        }
    }

    pub(crate) fn same_kind(&self, other: &ItemKind) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// A task or time block, recurring or not.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Unique identifier
    pub id: String,
    pub title: String,
    pub category: Category,
    #[serde(default)]
    pub completed: bool,
    #[serde(flatten)]
    pub kind: ItemKind,
    #[serde(rename = "recurring", default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Recurrence>,
}

impl Item {
    pub fn is_task(&self) -> bool {
        matches!(self.kind, ItemKind::Task { .. })
    }

    pub fn is_block(&self) -> bool {
        matches!(self.kind, ItemKind::Block { .. })
    }

    /// False for blocks.
    pub fn is_top_priority(&self) -> bool {
        matches!(self.kind, ItemKind::Task { is_top_priority: true })
    }

    pub fn start_time(&self) -> Option<ClockTime> {
        match self.kind {
            ItemKind::Block { start_time, .. } => Some(start_time),
            ItemKind::Task { .. } => None,
        }
    }

    pub fn duration(&self) -> Option<u32> {
        match self.kind {
            ItemKind::Block { duration, .. } => Some(duration),
            ItemKind::Task { .. } => None,
        }
    }

    pub fn is_recurring(&self) -> bool {
        self.recurrence.is_some()
    }

    pub fn is_series_root(&self) -> bool {
        matches!(&self.recurrence, Some(r) if r.series_id.is_none())
    }

    pub fn is_occurrence(&self) -> bool {
        matches!(&self.recurrence, Some(r) if r.series_id.is_some())
    }

    /// Id of the series this item belongs to: its own id for a root, the
    /// parent pointer for an occurrence, `None` for one-off items.
    pub fn series_root_id(&self) -> Option<&str> {
        self.recurrence
            .as_ref()
            .map(|r| r.series_id.as_deref().unwrap_or(self.id.as_str()))
    }

    /// Whether this item is the root `root_id` or one of its occurrences.
    ///
    /// A former root whose recurrence was disabled is a one-off and no longer
    /// belongs, even though stale occurrences may still name its id.
    pub fn belongs_to_series(&self, root_id: &str) -> bool {
        match &self.recurrence {
            Some(r) => match r.series_id.as_deref() {
                Some(parent) => parent == root_id,
                None => self.id == root_id,
            },
            None => false,
        }
    }

    /// Check the title and duration invariants.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if let ItemKind::Block { duration, .. } = self.kind {
            if duration == 0 {
                return Err(ValidationError::InvalidDuration(0));
            }
        }
        Ok(())
    }
}
