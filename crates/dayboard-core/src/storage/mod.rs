mod config;
pub mod database;
pub mod migrations;

pub use config::{Config, DefaultsConfig, UiConfig, WaterConfig};
pub use database::ItemDb;

use std::path::PathBuf;

use crate::error::PersistenceError;
use crate::item::Item;

/// Where the item set lives between sessions.
///
/// The store calls [`load`](Persistence::load) once when it is constructed and
/// [`save`](Persistence::save) after every successful mutation.
pub trait Persistence {
    /// Stored items in display order. Empty when nothing is stored or the
    /// stored contents are invalid.
    fn load(&self) -> Result<Vec<Item>, PersistenceError>;

    /// Replace the stored set.
    fn save(&mut self, items: &[Item]) -> Result<(), PersistenceError>;
}

/// In-process persistence with no durability.
#[derive(Debug, Default, Clone)]
pub struct MemoryPersistence {
    items: Vec<Item>,
    saves: usize,
    fail_saves: bool,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with items already "stored".
    pub fn with_items(items: Vec<Item>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    /// Make subsequent saves fail with [`PersistenceError::Unavailable`].
    pub fn set_fail_saves(&mut self, fail: bool) {
        self.fail_saves = fail;
    }

    /// Last successfully saved set.
    pub fn stored(&self) -> &[Item] {
        &self.items
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl Persistence for MemoryPersistence {
    fn load(&self) -> Result<Vec<Item>, PersistenceError> {
        Ok(self.items.clone())
    }

    fn save(&mut self, items: &[Item]) -> Result<(), PersistenceError> {
        if self.fail_saves {
            return Err(PersistenceError::Unavailable("memory store is read-only".into()));
        }
        self.items = items.to_vec();
        self.saves += 1;
        Ok(())
    }
}

/// Returns the data directory.
///
/// `DAYBOARD_DATA_DIR` wins when set; otherwise `~/.config/dayboard[-dev]/`
/// based on `DAYBOARD_ENV` (set `DAYBOARD_ENV=dev` for the development
/// directory).
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let dir = match std::env::var_os("DAYBOARD_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("DAYBOARD_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("dayboard-dev")
            } else {
                base_dir.join("dayboard")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_persistence_counts_saves() {
        let mut p = MemoryPersistence::new();
        p.save(&[]).unwrap();
        p.save(&[]).unwrap();
        assert_eq!(p.save_count(), 2);
    }

    #[test]
    fn memory_persistence_can_fail() {
        let mut p = MemoryPersistence::new();
        p.set_fail_saves(true);
        assert!(matches!(p.save(&[]), Err(PersistenceError::Unavailable(_))));
        assert_eq!(p.save_count(), 0);
    }
}
