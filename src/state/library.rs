use rusqlite::{params, Connection, Result as SqlResult, Row};
use tracing::{debug, info};

use super::data::{ClothingItem, ImportItem, NewClothingItem};
use crate::config::StorageLocation;
use crate::error::{ClosetError, Result};

const SELECT_ITEMS: &str = "SELECT id, name, category, image, date_added FROM clothes";

/// The Library manages the SQLite wardrobe catalog.
/// It is synchronous; `ClosetStore` wraps it for async callers.
pub struct Library {
    conn: Connection,
    location: StorageLocation,
}

impl Library {
    /// Open (creating on first use) the catalog and initialize the schema.
    ///
    /// `max_pages` caps the database size; writes beyond it fail with SQLITE_FULL.
    pub fn open(location: &StorageLocation, max_pages: Option<u32>) -> Result<Self> {
        let unavailable = |reason: String| ClosetError::storage_unavailable(location.to_string(), reason);

        let conn = match location {
            StorageLocation::File(path) => {
                // Ensure the parent directory exists
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent).map_err(|e| unavailable(e.to_string()))?;
                }
                Connection::open(path).map_err(|e| unavailable(e.to_string()))?
            }
            StorageLocation::Memory => Connection::open_in_memory().map_err(|e| unavailable(e.to_string()))?,
        };

        let library = Library {
            conn,
            location: location.clone(),
        };
        library.init_schema().map_err(|e| unavailable(e.to_string()))?;

        if let Some(pages) = max_pages {
            library
                .conn
                .pragma_update(None, "max_page_count", pages)
                .map_err(|e| unavailable(e.to_string()))?;
        }

        info!(location = %location, "wardrobe catalog opened");
        Ok(library)
    }

    /// Initialize the database schema.
    /// Creates the clothes table and its indexes if they don't exist.
    fn init_schema(&self) -> SqlResult<()> {
        // AUTOINCREMENT keeps ids monotonic: a deleted id is never handed out again,
        // even after the table is emptied by an import
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS clothes (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                name            TEXT NOT NULL,
                category        TEXT NOT NULL,
                image           TEXT NOT NULL,
                date_added      TEXT NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_clothes_category ON clothes(category)",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_clothes_name ON clothes(name)",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_clothes_date_added ON clothes(date_added)",
            [],
        )?;

        debug!("wardrobe schema initialized");
        Ok(())
    }

    /// Get a count of items in the catalog
    pub fn count(&self) -> SqlResult<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM clothes", [], |row| row.get(0))
    }

    /// Insert a new item and return its assigned ID
    pub fn insert(&self, item: &NewClothingItem) -> SqlResult<i64> {
        self.conn.execute(
            "INSERT INTO clothes (name, category, image, date_added) VALUES (?1, ?2, ?3, ?4)",
            params![item.name, item.category, item.image, item.date_added],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    /// Get every item, ordered by ID
    pub fn all(&self) -> SqlResult<Vec<ClothingItem>> {
        let mut stmt = self.conn.prepare(&format!("{SELECT_ITEMS} ORDER BY id"))?;
        let items = stmt.query_map([], row_to_item)?;
        items.collect()
    }

    /// Get items whose category exactly matches (case-sensitive), via the category index
    pub fn by_category(&self, category: &str) -> SqlResult<Vec<ClothingItem>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_ITEMS} WHERE category = ?1 ORDER BY id"))?;
        let items = stmt.query_map([category], row_to_item)?;
        items.collect()
    }

    /// Delete an item by ID
    /// Returns whether a row was removed; a missing ID is not an error
    pub fn delete(&self, id: i64) -> SqlResult<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM clothes WHERE id = ?1", params![id])?;
        Ok(removed > 0)
    }

    /// Replace the whole catalog with `items` in a single transaction.
    ///
    /// Records keep their own ID when they have one (a later record with the
    /// same ID overwrites an earlier one). If any insert fails the transaction
    /// is rolled back and the previous contents remain.
    pub fn replace_all(&mut self, items: &[ImportItem]) -> SqlResult<usize> {
        let tx = self.conn.transaction()?;

        tx.execute("DELETE FROM clothes", [])?;

        {
            let mut with_id = tx.prepare(
                "INSERT OR REPLACE INTO clothes (id, name, category, image, date_added)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            let mut without_id = tx.prepare(
                "INSERT INTO clothes (name, category, image, date_added) VALUES (?1, ?2, ?3, ?4)",
            )?;

            for item in items {
                match item.id {
                    Some(id) => with_id.execute(params![
                        id,
                        item.name,
                        item.category,
                        item.image,
                        item.date_added
                    ])?,
                    None => without_id.execute(params![
                        item.name,
                        item.category,
                        item.image,
                        item.date_added
                    ])?,
                };
            }
        }

        // Dropping an uncommitted transaction rolls it back
        tx.commit()?;
        Ok(items.len())
    }
}

fn row_to_item(row: &Row<'_>) -> SqlResult<ClothingItem> {
    Ok(ClothingItem {
        id: row.get(0)?,
        name: row.get(1)?,
        category: row.get(2)?,
        image: row.get(3)?,
        date_added: row.get(4)?,
    })
}

// Implement Debug for better error messages
impl std::fmt::Debug for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Library")
            .field("location", &self.location)
            .finish()
    }
}
