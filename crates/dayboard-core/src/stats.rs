//! Progress numbers for the dashboard header and the "progress pulse" panel.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::item::{Category, Item};

/// `round(100 * completed / total)`, or 0 for an empty subset.
pub fn completion_rate<'a, I>(subset: I) -> u8
where
    I: IntoIterator<Item = &'a Item>,
{
    let (total, done) = subset
        .into_iter()
        .fold((0u64, 0u64), |(total, done), item| {
            (total + 1, done + u64::from(item.completed))
        });
    if total == 0 {
        return 0;
    }
    // Half rounds up.
    ((200 * done + total) / (2 * total)) as u8
}

/// Task completion split by priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSummary {
    pub overall: u8,
    pub top_priority: u8,
    pub secondary: u8,
    pub total_tasks: usize,
    pub completed_tasks: usize,
}

impl ProgressSummary {
    /// Summarize the tasks in `items`; blocks are ignored.
    pub fn from_items<'a, I>(items: I) -> Self
    where
        I: IntoIterator<Item = &'a Item>,
    {
        let tasks: Vec<&Item> = items.into_iter().filter(|i| i.is_task()).collect();
        let top = tasks.iter().copied().filter(|t| t.is_top_priority());
        let secondary = tasks.iter().copied().filter(|t| !t.is_top_priority());
        Self {
            overall: completion_rate(tasks.iter().copied()),
            top_priority: completion_rate(top),
            secondary: completion_rate(secondary),
            total_tasks: tasks.len(),
            completed_tasks: tasks.iter().filter(|t| t.completed).count(),
        }
    }

    /// Every task is done (and there is at least one).
    pub fn all_done(&self) -> bool {
        self.total_tasks > 0 && self.completed_tasks == self.total_tasks
    }
}

/// Scheduled time for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub category: Category,
    pub minutes: u64,
    /// Hours rounded to one decimal.
    pub hours: f64,
    /// Share of all scheduled minutes, 0-100.
    pub percent: f64,
}

/// Block minutes per category, in order of first appearance. Tasks are ignored.
pub fn time_distribution<'a, I>(items: I) -> Vec<CategoryShare>
where
    I: IntoIterator<Item = &'a Item>,
{
    let mut totals: Vec<(Category, u64)> = Vec::new();
    for item in items {
        let Some(duration) = item.duration() else {
            continue;
        };
        match totals.iter_mut().find(|(c, _)| *c == item.category) {
            Some((_, minutes)) => *minutes += u64::from(duration),
            None => totals.push((item.category, u64::from(duration))),
        }
    }

    let grand_total: u64 = totals.iter().map(|(_, m)| m).sum();
    totals
        .into_iter()
        .map(|(category, minutes)| CategoryShare {
            category,
            minutes,
            hours: (minutes as f64 / 60.0 * 10.0).round() / 10.0,
            percent: if grand_total == 0 {
                0.0
            } else {
                minutes as f64 * 100.0 / grand_total as f64
            },
        })
        .collect()
}

/// Percentage of the 24-hour day elapsed at `time` (minute resolution).
pub fn day_progress(time: NaiveTime) -> f64 {
    let minutes = time.hour() * 60 + time.minute();
    f64::from(minutes) / (24.0 * 60.0) * 100.0
}
