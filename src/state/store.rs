/// Async wardrobe store
///
/// `ClosetStore` is the handle the UI layer holds. The SQLite catalog is
/// opened lazily on first use and shared by every operation afterwards.
///
/// Every operation runs on the blocking pool while holding the catalog lock
/// for its whole duration, so operations are linearizable: an import can
/// never interleave with an add or delete, and readers see either the old
/// contents or the new ones, never the empty table in between.

use rusqlite::Result as SqlResult;
use std::sync::{Arc, Mutex};
use tokio::sync::OnceCell;
use tokio::task;
use tracing::{debug, info, warn};

use super::data::{ClothingItem, ImportItem, NewClothingItem};
use super::library::Library;
use crate::config::{ClosetConfig, StorageLocation};
use crate::error::{ClosetError, Result};

pub struct ClosetStore {
    config: ClosetConfig,
    /// Initialized once; concurrent `open` calls wait on the same initialization
    catalog: OnceCell<Arc<Mutex<Library>>>,
}

impl ClosetStore {
    /// Create a store handle. Nothing is opened until the first operation.
    pub fn new(config: ClosetConfig) -> Self {
        Self {
            config,
            catalog: OnceCell::new(),
        }
    }

    /// A store backed by a private in-memory database
    pub fn in_memory() -> Self {
        Self::new(ClosetConfig::in_memory())
    }

    pub fn location(&self) -> &StorageLocation {
        &self.config.database
    }

    pub fn config(&self) -> &ClosetConfig {
        &self.config
    }

    /// Open the catalog, creating it on first use.
    ///
    /// Idempotent: later calls reuse the handle. A failed open is not cached,
    /// so a later call retries.
    pub async fn open(&self) -> Result<()> {
        self.catalog().await.map(|_| ())
    }

    async fn catalog(&self) -> Result<&Arc<Mutex<Library>>> {
        self.catalog
            .get_or_try_init(|| async {
                let location = self.config.database.clone();
                let max_pages = self.config.max_pages;

                let library = task::spawn_blocking(move || Library::open(&location, max_pages))
                    .await
                    .map_err(|e| {
                        ClosetError::storage_unavailable(
                            self.config.database.to_string(),
                            format!("Task join error: {e}"),
                        )
                    })?
                    .inspect_err(|e| warn!("failed to open wardrobe catalog: {e}"))?;

                Ok::<_, ClosetError>(Arc::new(Mutex::new(library)))
            })
            .await
    }

    /// Run `op` against the catalog on the blocking pool, holding the lock throughout
    async fn run<T, F>(&self, fail: fn(String) -> ClosetError, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Library) -> SqlResult<T> + Send + 'static,
    {
        let catalog = Arc::clone(self.catalog().await?);

        task::spawn_blocking(move || {
            let mut library = catalog
                .lock()
                .map_err(|_| fail("catalog lock poisoned".to_string()))?;
            op(&mut *library).map_err(|e| fail(e.to_string()))
        })
        .await
        .map_err(|e| fail(format!("Task join error: {e}")))?
    }

    /// Store a new item and return the ID assigned to it
    pub async fn add(&self, item: &NewClothingItem) -> Result<i64> {
        let record = item.clone();
        let category = item.category.clone();

        let id = self
            .run(ClosetError::WriteFailed, move |library| library.insert(&record))
            .await
            .inspect_err(|e| warn!(%category, "add failed: {e}"))?;

        debug!(id, %category, "item added");
        Ok(id)
    }

    /// Get every stored item (ordered by ID, though callers should not rely on it)
    pub async fn get_all(&self) -> Result<Vec<ClothingItem>> {
        self.run(ClosetError::ReadFailed, |library| library.all()).await
    }

    /// Get the items whose category exactly equals `category`
    ///
    /// An unknown category yields an empty list.
    pub async fn get_by_category(&self, category: &str) -> Result<Vec<ClothingItem>> {
        let category = category.to_string();
        self.run(ClosetError::ReadFailed, move |library| library.by_category(&category))
            .await
    }

    /// Delete an item. Deleting an ID that does not exist succeeds.
    pub async fn delete(&self, id: i64) -> Result<()> {
        let removed = self
            .run(ClosetError::WriteFailed, move |library| library.delete(id))
            .await
            .inspect_err(|e| warn!(id, "delete failed: {e}"))?;

        debug!(id, removed, "item deleted");
        Ok(())
    }

    /// Number of stored items
    pub async fn count(&self) -> Result<i64> {
        self.run(ClosetError::ReadFailed, |library| library.count()).await
    }

    /// Full consistent dump of the store, suitable for a backup
    pub async fn export_all(&self) -> Result<Vec<ClothingItem>> {
        let items = self.get_all().await?;
        info!(count = items.len(), "wardrobe exported");
        Ok(items)
    }

    /// Atomically replace the whole store with `items`.
    ///
    /// IDs present in the input are kept. On failure nothing changes and
    /// `ImportFailed` is returned.
    pub async fn import_replace<I>(&self, items: I) -> Result<usize>
    where
        I: IntoIterator,
        I::Item: Into<ImportItem>,
    {
        let items: Vec<ImportItem> = items.into_iter().map(Into::into).collect();

        let count = self
            .run(ClosetError::ImportFailed, move |library| library.replace_all(&items))
            .await
            .inspect_err(|e| warn!("import failed, previous contents kept: {e}"))?;

        info!(count, "wardrobe imported");
        Ok(count)
    }
}

impl std::fmt::Debug for ClosetStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClosetStore")
            .field("location", &self.config.database)
            .field("open", &self.catalog.initialized())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::category;
    use std::collections::HashSet;

    fn item(name: &str, category: &str) -> NewClothingItem {
        NewClothingItem::new(name, category, format!("data:image/png;base64,{name}"), "2024-05-01T10:00:00.000Z")
    }

    /// File-backed store with a small page quota
    fn quota_store(dir: &tempfile::TempDir) -> ClosetStore {
        let mut config = ClosetConfig::with_file(dir.path().join("closet.db"));
        config.max_pages = Some(10);
        ClosetStore::new(config)
    }

    fn huge_image() -> String {
        "x".repeat(256 * 1024)
    }

    #[tokio::test]
    async fn test_open_is_idempotent() {
        let store = ClosetStore::in_memory();
        store.open().await.unwrap();
        let id = store.add(&item("Red Shirt", category::TOP)).await.unwrap();
        store.open().await.unwrap();

        // Reopening must not replace the database
        let ids: Vec<i64> = store.get_all().await.unwrap().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![id]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_open_converges_on_one_handle() {
        let store = Arc::new(ClosetStore::in_memory());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { Arc::as_ptr(store.catalog().await.unwrap()) as usize })
            })
            .collect();

        let mut pointers = HashSet::new();
        for handle in handles {
            pointers.insert(handle.await.unwrap());
        }
        assert_eq!(pointers.len(), 1);
    }

    #[test]
    fn test_handle_reports_its_configuration() {
        let path = std::path::PathBuf::from("wardrobe/closet.db");
        let store = ClosetStore::new(ClosetConfig::with_file(path.clone()));

        assert_eq!(store.location(), &StorageLocation::File(path));
        assert_eq!(store.config().max_pages, None);
        assert!(matches!(ClosetStore::in_memory().location(), StorageLocation::Memory));
    }

    #[tokio::test]
    async fn test_operations_open_lazily() {
        let store = ClosetStore::in_memory();
        assert!(!store.catalog.initialized());
        assert!(store.get_all().await.unwrap().is_empty());
        assert!(store.catalog.initialized());
    }

    #[tokio::test]
    async fn test_open_failure_is_storage_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();
        let store = ClosetStore::new(ClosetConfig::with_file(blocker.join("closet.db")));

        assert!(matches!(store.open().await, Err(ClosetError::StorageUnavailable { .. })));
        // Every operation reports the same failure
        assert!(matches!(
            store.add(&item("Jeans", category::BOTTOM)).await,
            Err(ClosetError::StorageUnavailable { .. })
        ));
    }

    #[tokio::test]
    async fn test_open_rejects_non_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("closet.db");
        std::fs::write(&path, vec![0x42u8; 4096]).unwrap();
        let store = ClosetStore::new(ClosetConfig::with_file(path));

        assert!(matches!(store.open().await, Err(ClosetError::StorageUnavailable { .. })));
    }

    #[tokio::test]
    async fn test_add_assigns_unique_ids() {
        let store = ClosetStore::in_memory();
        let mut ids = HashSet::new();
        for n in 0..20 {
            let id = store.add(&item(&format!("item {n}"), category::TOP)).await.unwrap();
            assert!(ids.insert(id), "id {id} handed out twice");
        }

        // Deleting does not free an id for reuse
        let last = *ids.iter().max().unwrap();
        store.delete(last).await.unwrap();
        let next = store.add(&item("late", category::TOP)).await.unwrap();
        assert!(next > last);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = ClosetStore::in_memory();
        let id = store.add(&item("Scarf", category::ACCESSORY)).await.unwrap();

        store.delete(id).await.unwrap();
        assert!(store.get_all().await.unwrap().iter().all(|i| i.id != id));
        store.delete(id).await.unwrap();
        store.delete(9_999).await.unwrap();
    }

    #[tokio::test]
    async fn test_category_index_matches_full_scan() {
        let store = ClosetStore::in_memory();
        let labels = ["Top", "Bottom", "Top", "Shoes", "top", "Top "];
        for (n, label) in labels.iter().enumerate() {
            store.add(&item(&format!("item {n}"), label)).await.unwrap();
        }
        let first_top = store.get_by_category("Top").await.unwrap()[0].id;
        store.delete(first_top).await.unwrap();

        let all = store.get_all().await.unwrap();
        for label in ["Top", "Bottom", "Shoes", "top", "Top ", "Outerwear"] {
            let indexed = store.get_by_category(label).await.unwrap();
            let scanned: Vec<_> = all.iter().filter(|i| i.category == label).cloned().collect();
            assert_eq!(indexed, scanned, "category {label:?}");
        }
        assert!(store.get_by_category("Outerwear").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_import_keeps_ids_and_assigns_missing_ones() {
        let store = ClosetStore::in_memory();
        store.add(&item("old", category::TOP)).await.unwrap();

        let mut boots = ImportItem::from(item("Boots", category::SHOES));
        boots.id = Some(5);
        let belt = ImportItem::from(item("Belt", category::ACCESSORY));

        assert_eq!(store.import_replace(vec![boots, belt]).await.unwrap(), 2);

        let all = store.get_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, 5);
        assert_eq!(all[0].name, "Boots");
        assert!(all[1].id > 5);
        assert_eq!(all[1].name, "Belt");
    }

    #[tokio::test]
    async fn test_import_empty_list_clears_store() {
        let store = ClosetStore::in_memory();
        store.add(&item("Jeans", category::BOTTOM)).await.unwrap();

        store.import_replace(Vec::<ImportItem>::new()).await.unwrap();
        assert!(store.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_over_quota_is_write_failed() {
        let dir = tempfile::tempdir().unwrap();
        let store = quota_store(&dir);
        let small = store.add(&item("Jeans", category::BOTTOM)).await.unwrap();

        let mut big = item("Coat", category::OUTERWEAR);
        big.image = huge_image();
        let before = big.clone();

        assert!(matches!(store.add(&big).await, Err(ClosetError::WriteFailed(_))));
        assert_eq!(big, before);

        let ids: Vec<i64> = store.get_all().await.unwrap().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![small]);
    }

    #[tokio::test]
    async fn test_failed_import_keeps_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let store = quota_store(&dir);
        store.add(&item("Jeans", category::BOTTOM)).await.unwrap();
        let before = store.get_all().await.unwrap();

        let mut big = ImportItem::from(item("Coat", category::OUTERWEAR));
        big.image = huge_image();
        let replacement = vec![ImportItem::from(item("Boots", category::SHOES)), big];

        assert!(matches!(
            store.import_replace(replacement).await,
            Err(ClosetError::ImportFailed(_))
        ));
        assert_eq!(store.get_all().await.unwrap(), before);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_readers_never_observe_a_half_done_import() {
        let store = Arc::new(ClosetStore::in_memory());
        let seed: Vec<ImportItem> = (0..3)
            .map(|n| ImportItem::from(item(&format!("seed #{n}"), category::TOP)))
            .collect();
        store.import_replace(seed).await.unwrap();

        let writer = {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                for round in 0..25 {
                    let batch: Vec<ImportItem> = (0..3)
                        .map(|n| ImportItem::from(item(&format!("round {round} #{n}"), category::TOP)))
                        .collect();
                    store.import_replace(batch).await.unwrap();
                }
            })
        };

        let reader = {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                for _ in 0..50 {
                    let all = store.get_all().await.unwrap();
                    assert_eq!(all.len(), 3);
                    // All three records come from the same import round
                    let rounds: HashSet<&str> =
                        all.iter().filter_map(|i| i.name.split(" #").next()).collect();
                    assert_eq!(rounds.len(), 1);
                }
            })
        };

        writer.await.unwrap();
        reader.await.unwrap();
    }
}
