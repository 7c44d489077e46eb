/// Shared data structures for the wardrobe
///
/// These structs represent the data model that flows between
/// the database layer, the backup format and the UI layer.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Built-in category labels
///
/// Categories are opaque to the store; these are the ones the outfit
/// selectors know about.
pub mod category {
    pub const TOP: &str = "Top";
    pub const BOTTOM: &str = "Bottom";
    pub const OUTERWEAR: &str = "Outerwear";
    pub const SHOES: &str = "Shoes";
    pub const ACCESSORY: &str = "Accessory";
}

/// Categories shown in the outfit builder, in display order
pub const DEFAULT_CATEGORIES: [&str; 5] = [
    category::TOP,
    category::BOTTOM,
    category::OUTERWEAR,
    category::SHOES,
    category::ACCESSORY,
];

/// Represents a single persisted clothing item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClothingItem {
    /// Unique database ID, assigned by the store
    pub id: i64,
    /// User-supplied name (e.g., "Red Shirt")
    pub name: String,
    /// Category label (e.g., "Top")
    pub category: String,
    /// Encoded image, usually a PNG data URI
    pub image: String,
    /// ISO-8601 timestamp set by the caller at creation time
    pub date_added: String,
}

/// A clothing item that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClothingItem {
    pub name: String,
    pub category: String,
    pub image: String,
    pub date_added: String,
}

impl NewClothingItem {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        image: impl Into<String>,
        date_added: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            image: image.into(),
            date_added: date_added.into(),
        }
    }

    /// Create an item stamped with the current UTC time
    pub fn now(name: impl Into<String>, category: impl Into<String>, image: impl Into<String>) -> Self {
        let stamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        Self::new(name, category, image, stamp)
    }

    /// Attach the id the store assigned
    pub fn with_id(self, id: i64) -> ClothingItem {
        ClothingItem {
            id,
            name: self.name,
            category: self.category,
            image: self.image,
            date_added: self.date_added,
        }
    }
}

/// One record of a backup being restored
///
/// The id is kept when present; records without one get a fresh id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub category: String,
    pub image: String,
    pub date_added: String,
}

impl From<ClothingItem> for ImportItem {
    fn from(item: ClothingItem) -> Self {
        Self {
            id: Some(item.id),
            name: item.name,
            category: item.category,
            image: item.image,
            date_added: item.date_added,
        }
    }
}

impl From<NewClothingItem> for ImportItem {
    fn from(item: NewClothingItem) -> Self {
        Self {
            id: None,
            name: item.name,
            category: item.category,
            image: item.image,
            date_added: item.date_added,
        }
    }
}
