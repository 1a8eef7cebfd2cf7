//! Inputs to the store: drafts for new items and patches for edits.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Category, ClockTime, Item, ItemKind, Recurrence};
use crate::error::ValidationError;

/// Recurrence requested on a new item.
///
/// Without `series_id` the new item starts a series; with it, the new item is
/// an occurrence of that root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceRequest {
    #[serde(default, alias = "parentId")]
    pub series_id: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
}

/// Everything needed to create an item except its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDraft {
    pub title: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub completed: bool,
    #[serde(flatten)]
    pub kind: ItemKind,
    #[serde(rename = "recurring", default)]
    pub recurrence: Option<RecurrenceRequest>,
}

impl ItemDraft {
    pub fn task(title: impl Into<String>, category: Category) -> Self {
        Self {
            title: title.into(),
            category,
            completed: false,
            kind: ItemKind::Task {
                is_top_priority: false,
            },
            recurrence: None,
        }
    }

    pub fn block(
        title: impl Into<String>,
        category: Category,
        start_time: ClockTime,
        duration: u32,
    ) -> Self {
        Self {
            title: title.into(),
            category,
            completed: false,
            kind: ItemKind::Block {
                start_time,
                duration,
            },
            recurrence: None,
        }
    }

    /// Mark a task draft as top priority. No effect on blocks.
    pub fn top_priority(mut self, top: bool) -> Self {
        if let ItemKind::Task { is_top_priority } = &mut self.kind {
            *is_top_priority = top;
        }
        self
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    /// Start a new daily series with this item as its root.
    pub fn recurring(mut self) -> Self {
        let start_date = self.recurrence.take().and_then(|r| r.start_date);
        self.recurrence = Some(RecurrenceRequest {
            series_id: None,
            start_date,
        });
        self
    }

    /// Make this item an occurrence of the series rooted at `root_id`.
    pub fn occurrence_of(mut self, root_id: impl Into<String>) -> Self {
        let start_date = self.recurrence.take().and_then(|r| r.start_date);
        self.recurrence = Some(RecurrenceRequest {
            series_id: Some(root_id.into()),
            start_date,
        });
        self
    }

    /// Date of the series start (root) or of the occurrence. Implies
    /// [`recurring`](Self::recurring) when no recurrence was requested yet.
    pub fn starting(mut self, date: NaiveDate) -> Self {
        self.recurrence
            .get_or_insert_with(RecurrenceRequest::default)
            .start_date = Some(date);
        self
    }
}

/// How an edit changes the recurrence of an existing item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceChange {
    /// Turn the item into a new series root starting today.
    Enable,
    /// Drop the recurrence tag; the item becomes a one-off.
    Disable,
}

/// Partial update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemPatch {
    pub title: Option<String>,
    pub category: Option<Category>,
    pub completed: Option<bool>,
    pub is_top_priority: Option<bool>,
    pub start_time: Option<ClockTime>,
    pub duration: Option<u32>,
    #[serde(rename = "recurring")]
    pub recurrence: Option<RecurrenceChange>,
}

impl ItemPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    pub fn top_priority(mut self, top: bool) -> Self {
        self.is_top_priority = Some(top);
        self
    }

    pub fn start_time(mut self, start_time: ClockTime) -> Self {
        self.start_time = Some(start_time);
        self
    }

    pub fn duration(mut self, minutes: u32) -> Self {
        self.duration = Some(minutes);
        self
    }

    pub fn recurrence(mut self, change: RecurrenceChange) -> Self {
        self.recurrence = Some(change);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge into `item`, then check the result.
    ///
    /// On error `item` may be partially modified; callers apply patches to a
    /// copy.
    pub(crate) fn apply(&self, item: &mut Item, today: NaiveDate) -> Result<(), ValidationError> {
        if let Some(title) = &self.title {
            item.title = title.clone();
        }
        if let Some(category) = self.category {
            item.category = category;
        }
        if let Some(completed) = self.completed {
            item.completed = completed;
        }

        let kind_name = item.kind.name();
        match &mut item.kind {
            ItemKind::Task { is_top_priority } => {
                if self.start_time.is_some() {
                    return Err(mismatch("startTime", kind_name));
                }
                if self.duration.is_some() {
                    return Err(mismatch("duration", kind_name));
                }
                if let Some(top) = self.is_top_priority {
                    *is_top_priority = top;
                }
            }
            ItemKind::Block {
                start_time,
                duration,
            } => {
                if self.is_top_priority.is_some() {
                    return Err(mismatch("isTopPriority", kind_name));
                }
                if let Some(t) = self.start_time {
                    *start_time = t;
                }
                if let Some(d) = self.duration {
                    *duration = d;
                }
            }
        }

        match self.recurrence {
            // Already a root: keep its start date so its occurrences stay in range.
            Some(RecurrenceChange::Enable) if item.is_series_root() => {}
            Some(RecurrenceChange::Enable) => item.recurrence = Some(Recurrence::root(today)),
            Some(RecurrenceChange::Disable) => item.recurrence = None,
            None => {}
        }

        item.validate()
    }
}

fn mismatch(field: &str, kind: &str) -> ValidationError {
    ValidationError::KindMismatch {
        field: field.to_string(),
        kind: kind.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn task() -> Item {
        Item {
            id: "t1".into(),
            title: "Write report".into(),
            category: Category::Work,
            completed: false,
            kind: ItemKind::Task {
                is_top_priority: true,
            },
            recurrence: None,
        }
    }

    #[test]
    fn draft_builders() {
        let d = ItemDraft::task("Read", Category::Other)
            .top_priority(true)
            .recurring();
        assert_eq!(d.kind, ItemKind::Task { is_top_priority: true });
        assert_eq!(d.recurrence, Some(RecurrenceRequest::default()));

        let d = ItemDraft::task("Read", Category::Other)
            .starting(today())
            .occurrence_of("r1");
        let req = d.recurrence.unwrap();
        assert_eq!(req.series_id.as_deref(), Some("r1"));
        assert_eq!(req.start_date, Some(today()));
    }

    #[test]
    fn top_priority_ignored_on_blocks() {
        let d = ItemDraft::block("Gym", Category::Health, ClockTime::new(7, 0).unwrap(), 45)
            .top_priority(true);
        assert!(matches!(d.kind, ItemKind::Block { duration: 45, .. }));
    }

    #[test]
    fn patch_merges_fields() {
        let mut item = task();
        ItemPatch::new()
            .title("Ship report")
            .category(Category::Family)
            .top_priority(false)
            .apply(&mut item, today())
            .unwrap();
        assert_eq!(item.title, "Ship report");
        assert_eq!(item.category, Category::Family);
        assert!(!item.is_top_priority());
    }

    #[test]
    fn patch_rejects_wrong_kind_fields() {
        let mut item = task();
        let err = ItemPatch::new().duration(30).apply(&mut item, today()).unwrap_err();
        assert!(matches!(err, ValidationError::KindMismatch { .. }));
    }

    #[test]
    fn patch_rejects_empty_title() {
        let mut item = task();
        let err = ItemPatch::new().title("  ").apply(&mut item, today()).unwrap_err();
        assert_eq!(err, ValidationError::EmptyTitle);
    }

    #[test]
    fn enable_makes_a_fresh_root() {
        let mut item = task();
        item.recurrence = Some(Recurrence::occurrence("r0", today().pred_opt().unwrap()));
        ItemPatch::new()
            .recurrence(RecurrenceChange::Enable)
            .apply(&mut item, today())
            .unwrap();
        assert_eq!(item.recurrence, Some(Recurrence::root(today())));

        ItemPatch::new()
            .recurrence(RecurrenceChange::Disable)
            .apply(&mut item, today())
            .unwrap();
        assert!(item.recurrence.is_none());
    }

    #[test]
    fn enable_on_a_root_keeps_its_start_date() {
        let mut item = task();
        let start = NaiveDate::from_ymd_opt(2026, 10, 10).unwrap();
        item.recurrence = Some(Recurrence::root(start));
        ItemPatch::new()
            .recurrence(RecurrenceChange::Enable)
            .apply(&mut item, today())
            .unwrap();
        assert_eq!(item.recurrence, Some(Recurrence::root(start)));
    }

    #[test]
    fn patch_deserializes_partial_json() {
        let patch: ItemPatch =
            serde_json::from_str(r#"{ "title": "x", "recurring": "disable" }"#).unwrap();
        assert_eq!(patch.title.as_deref(), Some("x"));
        assert_eq!(patch.recurrence, Some(RecurrenceChange::Disable));
        assert!(patch.category.is_none());
        assert!(ItemPatch::new().is_empty());
    }
}
