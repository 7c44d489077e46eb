/// Backup export/import
///
/// A backup is a pretty-printed JSON array of items with fields
/// `id, name, category, image, dateAdded`. The same format is accepted
/// back by `import_replace`, so export followed by import reproduces the
/// same item set with the same IDs.

use std::path::Path;
use tracing::info;

use super::data::{ClothingItem, ImportItem};
use super::store::ClosetStore;
use crate::error::Result;

/// File name suggested for downloaded backups
pub const DEFAULT_EXPORT_FILE_NAME: &str = "my-closet-export.json";

/// Serialize items as a pretty-printed JSON array
pub fn to_json(items: &[ClothingItem]) -> Result<String> {
    Ok(serde_json::to_string_pretty(items)?)
}

/// Parse a backup; records may omit `id`
pub fn from_json(json: &str) -> Result<Vec<ImportItem>> {
    Ok(serde_json::from_str(json)?)
}

impl ClosetStore {
    /// Write a full backup to `path`, returning the number of items written
    pub async fn export_to_file(&self, path: &Path) -> Result<usize> {
        let items = self.export_all().await?;
        let json = to_json(&items)?;
        tokio::fs::write(path, json).await?;

        info!(path = %path.display(), count = items.len(), "backup written");
        Ok(items.len())
    }

    /// Replace the store with the contents of a backup file
    ///
    /// The file is fully parsed before the store is touched, so a malformed
    /// backup leaves the store unchanged.
    pub async fn import_from_file(&self, path: &Path) -> Result<usize> {
        let json = tokio::fs::read_to_string(path).await?;
        let items = from_json(&json)?;
        self.import_replace(items).await
    }
}
