//! Virtual closet core.
//!
//! Two independent pieces, composed by the UI layer:
//! - [`imaging`]: background removal on RGBA buffers and upload preparation
//! - [`state`]: the async wardrobe store with category lookup and backups
//!
//! ```no_run
//! use closet::{ClosetConfig, ClosetStore, NewClothingItem};
//!
//! # async fn demo() -> closet::Result<()> {
//! let store = ClosetStore::new(ClosetConfig::load()?);
//! let id = store.add(&NewClothingItem::now("Red Shirt", "Top", "data:image/png;base64,...")).await?;
//! let tops = store.get_by_category("Top").await?;
//! assert!(tops.iter().any(|item| item.id == id));
//! # Ok(())
//! # }
//! ```

pub mod color;
pub mod config;
pub mod error;
pub mod imaging;
pub mod state;

pub use color::{average_color, ColorSampler, Rgb};
pub use config::{ClosetConfig, StorageLocation};
pub use error::{ClosetError, Result};
pub use state::{ClosetStore, ClothingItem, ImportItem, NewClothingItem, Outfit, Slot, Wardrobe};
