/// State management module
///
/// This module handles all persisted wardrobe state, including:
/// - Shared data structures (data.rs)
/// - The SQLite catalog and its schema (library.rs)
/// - The async store handle used by the UI layer (store.rs)
/// - Backup export/import (backup.rs)
/// - Outfit composition from per-category choices (outfit.rs)

pub mod backup;
pub mod data;
pub mod library;
pub mod outfit;
pub mod store;

pub use data::{ClothingItem, ImportItem, NewClothingItem};
pub use outfit::{Outfit, Slot, Wardrobe};
pub use store::ClosetStore;
