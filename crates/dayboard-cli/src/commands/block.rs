//! Timeline block commands for CLI.

use chrono::NaiveDate;
use clap::Subcommand;
use dayboard_core::{
    timeline_hours, Category, ClockTime, Config, DeleteScope, Item, ItemDraft, ItemFilter,
    ItemPatch,
};

use super::{
    open_store, print_json, recurrence_change, require_kind, with_recurrence, CliResult,
};

#[derive(Subcommand)]
pub enum BlockAction {
    /// Schedule a new block
    Add {
        /// Block title
        title: String,
        /// Start time (HH:MM)
        #[arg(long)]
        start: ClockTime,
        /// Length in minutes (default: defaults.block_duration)
        #[arg(long)]
        duration: Option<u32>,
        /// Category (work, self-care, family, health, social, other)
        #[arg(long)]
        category: Option<Category>,
        /// Start a new daily series with this block as its root
        #[arg(long, conflicts_with = "series")]
        recurring: bool,
        /// Add as an occurrence of an existing series root
        #[arg(long)]
        series: Option<String>,
        /// Recurrence date (YYYY-MM-DD, default: today)
        #[arg(long)]
        start_date: Option<NaiveDate>,
    },
    /// List blocks
    List {
        #[arg(long)]
        category: Option<Category>,
        /// Filter by completion (true or false)
        #[arg(long)]
        completed: Option<bool>,
    },
    /// Move a block to the top of another hour
    Move {
        /// Block ID
        id: String,
        /// Target hour (0-23)
        hour: u8,
    },
    /// Flip a block's completion state
    Toggle {
        /// Block ID
        id: String,
    },
    /// Update a block
    Update {
        /// Block ID
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        category: Option<Category>,
        /// Start time (HH:MM)
        #[arg(long)]
        start: Option<ClockTime>,
        /// Length in minutes
        #[arg(long)]
        duration: Option<u32>,
        /// Completion state (true or false)
        #[arg(long)]
        completed: Option<bool>,
        /// Turn daily recurrence on or off (true or false)
        #[arg(long)]
        recurring: Option<bool>,
    },
    /// Delete a block
    Delete {
        /// Block ID
        id: String,
        /// instance or series
        #[arg(long, default_value_t = DeleteScope::Instance)]
        scope: DeleteScope,
    },
    /// Blocks overlapping an hour
    Hour {
        /// Hour (0-23)
        hour: u8,
    },
    /// Print the day's hour lanes
    Timeline,
}

pub fn run(action: BlockAction) -> CliResult {
    let mut store = open_store()?;

    match action {
        BlockAction::Add {
            title,
            start,
            duration,
            category,
            recurring,
            series,
            start_date,
        } => {
            let defaults = Config::load_or_default().defaults;
            let draft = ItemDraft::block(
                title,
                category.unwrap_or(defaults.category),
                start,
                duration.unwrap_or(defaults.block_duration),
            );
            let id = store.add(with_recurrence(draft, recurring, series, start_date))?;
            println!("Block created: {id}");
            if let Some(item) = store.get(&id) {
                print_json(item)?;
            }
        }
        BlockAction::List {
            category,
            completed,
        } => {
            let filter = ItemFilter {
                category,
                completed,
                ..ItemFilter::blocks()
            };
            print_json(&store.list(&filter))?;
        }
        BlockAction::Move { id, hour } => {
            require_kind(&store, &id, Item::is_block, "block")?;
            store.move_block(&id, hour)?;
            println!("{id} moved to {hour:02}:00");
        }
        BlockAction::Toggle { id } => {
            require_kind(&store, &id, Item::is_block, "block")?;
            let completed = store.toggle_completion(&id)?;
            println!("{id}: completed = {completed}");
        }
        BlockAction::Update {
            id,
            title,
            category,
            start,
            duration,
            completed,
            recurring,
        } => {
            let patch = ItemPatch {
                title,
                category,
                completed,
                start_time: start,
                duration,
                recurrence: recurrence_change(recurring),
                ..ItemPatch::default()
            };
            if patch.is_empty() {
                return Err("nothing to update".into());
            }
            require_kind(&store, &id, Item::is_block, "block")?;
            store.update(&id, patch)?;
            if let Some(item) = store.get(&id) {
                print_json(item)?;
            }
        }
        BlockAction::Delete { id, scope } => {
            require_kind(&store, &id, Item::is_block, "block")?;
            let removed = store.delete(&id, scope)?;
            println!("Deleted {} item(s): {}", removed.len(), removed.join(", "));
        }
        BlockAction::Hour { hour } => {
            if hour > 23 {
                return Err(format!("hour must be 0-23, got {hour}").into());
            }
            let blocks: Vec<&Item> = store.blocks_at_hour(hour).collect();
            print_json(&blocks)?;
        }
        BlockAction::Timeline => {
            for hour in timeline_hours() {
                let titles: Vec<String> = store
                    .blocks_at_hour(hour)
                    .map(|b| {
                        let mark = if b.completed { "x" } else { " " };
                        format!("[{mark}] {} ({})", b.title, b.id)
                    })
                    .collect();
                println!("{hour:02}:00  {}", titles.join("  "));
            }
        }
    }
    Ok(())
}
