//! Task management commands for CLI.

use chrono::NaiveDate;
use clap::Subcommand;
use dayboard_core::{Category, Config, DeleteScope, Item, ItemDraft, ItemFilter, ItemPatch};

use super::{
    open_store, print_json, recurrence_change, require_kind, with_recurrence, CliResult,
};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Add {
        /// Task title
        title: String,
        /// Category (work, self-care, family, health, social, other)
        #[arg(long)]
        category: Option<Category>,
        /// Mark as a top priority
        #[arg(long)]
        top: bool,
        /// Start a new daily series with this task as its root
        #[arg(long, conflicts_with = "series")]
        recurring: bool,
        /// Add as an occurrence of an existing series root
        #[arg(long)]
        series: Option<String>,
        /// Recurrence date (YYYY-MM-DD, default: today)
        #[arg(long)]
        start_date: Option<NaiveDate>,
    },
    /// List tasks
    List {
        /// Filter by category
        #[arg(long)]
        category: Option<Category>,
        /// Only top priorities
        #[arg(long, conflicts_with = "secondary")]
        top: bool,
        /// Only secondary tasks
        #[arg(long)]
        secondary: bool,
        /// Filter by completion (true or false)
        #[arg(long)]
        completed: Option<bool>,
    },
    /// Flip a task's completion state
    Toggle {
        /// Task ID
        id: String,
    },
    /// Update a task
    Update {
        /// Task ID
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        category: Option<Category>,
        /// Top priority (true or false)
        #[arg(long)]
        top: Option<bool>,
        /// Completion state (true or false)
        #[arg(long)]
        completed: Option<bool>,
        /// Turn daily recurrence on or off (true or false)
        #[arg(long)]
        recurring: Option<bool>,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
        /// instance or series
        #[arg(long, default_value_t = DeleteScope::Instance)]
        scope: DeleteScope,
    },
}

pub fn run(action: TaskAction) -> CliResult {
    let mut store = open_store()?;

    match action {
        TaskAction::Add {
            title,
            category,
            top,
            recurring,
            series,
            start_date,
        } => {
            let category = category.unwrap_or_else(|| Config::load_or_default().defaults.category);
            let draft = ItemDraft::task(title, category).top_priority(top);
            let id = store.add(with_recurrence(draft, recurring, series, start_date))?;
            println!("Task created: {id}");
            if let Some(item) = store.get(&id) {
                print_json(item)?;
            }
        }
        TaskAction::List {
            category,
            top,
            secondary,
            completed,
        } => {
            let top_priority = match (top, secondary) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            let filter = ItemFilter {
                category,
                top_priority,
                completed,
                ..ItemFilter::tasks()
            };
            print_json(&store.list(&filter))?;
        }
        TaskAction::Toggle { id } => {
            require_kind(&store, &id, Item::is_task, "task")?;
            let completed = store.toggle_completion(&id)?;
            println!("{id}: completed = {completed}");
        }
        TaskAction::Update {
            id,
            title,
            category,
            top,
            completed,
            recurring,
        } => {
            let patch = ItemPatch {
                title,
                category,
                completed,
                is_top_priority: top,
                recurrence: recurrence_change(recurring),
                ..ItemPatch::default()
            };
            if patch.is_empty() {
                return Err("nothing to update".into());
            }
            require_kind(&store, &id, Item::is_task, "task")?;
            store.update(&id, patch)?;
            if let Some(item) = store.get(&id) {
                print_json(item)?;
            }
        }
        TaskAction::Delete { id, scope } => {
            require_kind(&store, &id, Item::is_task, "task")?;
            let removed = store.delete(&id, scope)?;
            println!("Deleted {} item(s): {}", removed.len(), removed.join(", "));
        }
    }
    Ok(())
}
