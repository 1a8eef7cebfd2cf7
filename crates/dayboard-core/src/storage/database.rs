//! SQLite-based item storage.
//!
//! Provides persistent storage for:
//! - Tasks and time blocks, in display order
//! - Key-value store for widget state (water intake)

use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use std::path::Path;
use tracing::{debug, warn};

use super::{data_dir, migrations, Persistence};
use crate::error::PersistenceError;
use crate::item::{Category, ClockTime, Frequency, Item, ItemKind, Recurrence};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// SQLite database for the item set.
pub struct ItemDb {
    conn: Connection,
}

impl ItemDb {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `<data_dir>/dayboard.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, PersistenceError> {
        let path = data_dir()?.join("dayboard.db");
        Self::open_at(&path)
    }

    /// Open (or create) the database at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self, PersistenceError> {
        let conn = Connection::open(path).map_err(|source| PersistenceError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, PersistenceError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        migrations::migrate(&self.conn)
    }

    /// All stored items in display order.
    ///
    /// Any undecodable row discards the whole set: a partial list would break
    /// series linkage in ways the store cannot detect.
    pub fn load_items(&self) -> Result<Vec<Item>, PersistenceError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, category, completed, kind, is_top_priority,
                    start_time, duration, series_id, series_start_date
             FROM items
             ORDER BY position",
        )?;
        let rows = stmt.query_map([], |row| Ok(row_to_item(row)))?;

        let mut items = Vec::new();
        for row in rows {
            match row? {
                Ok(item) => items.push(item),
                Err(reason) => {
                    warn!("discarding stored items: {reason}");
                    return Ok(Vec::new());
                }
            }
        }
        debug!(count = items.len(), "loaded items");
        Ok(items)
    }

    /// Replace the stored set with `items`, keeping their order.
    pub fn save_items(&self, items: &[Item]) -> Result<(), PersistenceError> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM items", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO items (id, position, title, category, completed, kind,
                                    is_top_priority, start_time, duration,
                                    series_id, series_start_date)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            )?;
            for (position, item) in items.iter().enumerate() {
                let (is_top_priority, start_time, duration) = match &item.kind {
                    ItemKind::Task { is_top_priority } => (*is_top_priority, None, None),
                    ItemKind::Block {
                        start_time,
                        duration,
                    } => (false, Some(start_time.to_string()), Some(*duration)),
                };
                let (series_id, start_date) = match &item.recurrence {
                    Some(r) => (
                        r.series_id.as_deref(),
                        Some(r.start_date.format(DATE_FORMAT).to_string()),
                    ),
                    None => (None, None),
                };
                stmt.execute(params![
                    item.id,
                    position as i64,
                    item.title,
                    item.category.as_str(),
                    item.completed,
                    item.kind.name(),
                    is_top_priority,
                    start_time,
                    duration,
                    series_id,
                    start_date,
                ])?;
            }
        }
        tx.commit()?;
        debug!(count = items.len(), "saved items");
        Ok(())
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}

impl Persistence for ItemDb {
    fn load(&self) -> Result<Vec<Item>, PersistenceError> {
        self.load_items()
    }

    fn save(&mut self, items: &[Item]) -> Result<(), PersistenceError> {
        self.save_items(items)
    }
}

/// Decode one row; the outer error is SQLite's, the inner one a bad value.
fn row_to_item(row: &Row) -> Result<Item, String> {
    let get_err = |e: rusqlite::Error| e.to_string();

    let id: String = row.get(0).map_err(get_err)?;
    let title: String = row.get(1).map_err(get_err)?;
    let category: String = row.get(2).map_err(get_err)?;
    let completed: bool = row.get(3).map_err(get_err)?;
    let kind: String = row.get(4).map_err(get_err)?;
    let is_top_priority: bool = row.get(5).map_err(get_err)?;
    let start_time: Option<String> = row.get(6).map_err(get_err)?;
    let duration: Option<i64> = row.get(7).map_err(get_err)?;
    let series_id: Option<String> = row.get(8).map_err(get_err)?;
    let start_date: Option<String> = row.get(9).map_err(get_err)?;

    let category: Category = category
        .parse()
        .map_err(|e| format!("item {id}: {e}"))?;

    let kind = match kind.as_str() {
        "task" => ItemKind::Task { is_top_priority },
        "block" => {
            let start_time: ClockTime = start_time
                .ok_or_else(|| format!("item {id}: block without start time"))?
                .parse()
                .map_err(|e| format!("item {id}: {e}"))?;
            let duration = duration
                .and_then(|d| u32::try_from(d).ok())
                .ok_or_else(|| format!("item {id}: block without valid duration"))?;
            ItemKind::Block {
                start_time,
                duration,
            }
        }
        other => return Err(format!("item {id}: unknown kind '{other}'")),
    };

    let recurrence = match start_date {
        Some(date) => Some(Recurrence {
            series_id,
            frequency: Frequency::Daily,
            start_date: NaiveDate::parse_from_str(&date, DATE_FORMAT)
                .map_err(|e| format!("item {id}: bad start date '{date}': {e}"))?,
        }),
        None if series_id.is_some() => {
            return Err(format!("item {id}: series link without start date"))
        }
        None => None,
    };

    let item = Item {
        id,
        title,
        category,
        completed,
        kind,
        recurrence,
    };
    item.validate().map_err(|e| format!("item {}: {e}", item.id))?;
    Ok(item)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Item> {
        let start = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        vec![
            Item {
                id: "t1".into(),
                title: "Write report".into(),
                category: Category::Work,
                completed: true,
                kind: ItemKind::Task {
                    is_top_priority: true,
                },
                recurrence: None,
            },
            Item {
                id: "b1".into(),
                title: "Standup".into(),
                category: Category::Work,
                completed: false,
                kind: ItemKind::Block {
                    start_time: ClockTime::new(9, 0).unwrap(),
                    duration: 15,
                },
                recurrence: Some(Recurrence::root(start)),
            },
            Item {
                id: "b2".into(),
                title: "Standup".into(),
                category: Category::Work,
                completed: false,
                kind: ItemKind::Block {
                    start_time: ClockTime::new(9, 0).unwrap(),
                    duration: 15,
                },
                recurrence: Some(Recurrence::occurrence("b1", start)),
            },
        ]
    }

    #[test]
    fn empty_database_loads_nothing() {
        let db = ItemDb::open_memory().unwrap();
        assert!(db.load_items().unwrap().is_empty());
    }

    #[test]
    fn save_then_load_preserves_order_and_fields() {
        let db = ItemDb::open_memory().unwrap();
        let items = sample();
        db.save_items(&items).unwrap();
        assert_eq!(db.load_items().unwrap(), items);

        let reversed: Vec<Item> = items.into_iter().rev().collect();
        db.save_items(&reversed).unwrap();
        assert_eq!(db.load_items().unwrap(), reversed);
    }

    #[test]
    fn corrupt_row_discards_everything() {
        let db = ItemDb::open_memory().unwrap();
        db.save_items(&sample()).unwrap();
        db.conn()
            .execute("UPDATE items SET category = 'chores' WHERE id = 'b2'", [])
            .unwrap();
        assert!(db.load_items().unwrap().is_empty());
    }

    #[test]
    fn block_without_duration_is_invalid() {
        let db = ItemDb::open_memory().unwrap();
        db.save_items(&sample()).unwrap();
        db.conn()
            .execute("UPDATE items SET duration = 0 WHERE id = 'b1'", [])
            .unwrap();
        assert!(db.load_items().unwrap().is_empty());
    }

    #[test]
    fn kv_store() {
        let db = ItemDb::open_memory().unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
        db.kv_set("test", "hello").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "hello");
    }

    #[test]
    fn file_database_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dayboard.db");
        {
            let mut db = ItemDb::open_at(&path).unwrap();
            db.save(&sample()).unwrap();
        }
        let db = ItemDb::open_at(&path).unwrap();
        assert_eq!(db.load().unwrap(), sample());
    }
}
