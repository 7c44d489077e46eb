/// Outfit composition
///
/// An outfit is one item per garment slot plus any number of accessories.
/// Items are picked per category: a slot only offers items from its own
/// category, so an ID from another category selects nothing.

use std::collections::HashMap;

use super::data::{category, ClothingItem, DEFAULT_CATEGORIES};
use super::store::ClosetStore;
use crate::error::Result;

/// Single-item slots of an outfit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Top,
    Bottom,
    Outerwear,
    Shoes,
}

impl Slot {
    pub const ALL: [Slot; 4] = [Slot::Top, Slot::Bottom, Slot::Outerwear, Slot::Shoes];

    /// The category this slot draws its items from
    pub fn category(self) -> &'static str {
        match self {
            Slot::Top => category::TOP,
            Slot::Bottom => category::BOTTOM,
            Slot::Outerwear => category::OUTERWEAR,
            Slot::Shoes => category::SHOES,
        }
    }
}

/// Items available to the outfit builder, grouped by category
#[derive(Debug, Clone, Default)]
pub struct Wardrobe {
    by_category: HashMap<String, Vec<ClothingItem>>,
}

impl Wardrobe {
    /// The choices for one category (empty for unknown categories)
    pub fn options(&self, category: &str) -> &[ClothingItem] {
        self.by_category
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Look up an item by ID within one category
    pub fn select(&self, category: &str, id: i64) -> Option<&ClothingItem> {
        self.options(category).iter().find(|item| item.id == id)
    }
}

/// A composed outfit
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outfit {
    pub top: Option<ClothingItem>,
    pub bottom: Option<ClothingItem>,
    pub outerwear: Option<ClothingItem>,
    pub shoes: Option<ClothingItem>,
    pub accessories: Vec<ClothingItem>,
}

impl Outfit {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut Option<ClothingItem> {
        match slot {
            Slot::Top => &mut self.top,
            Slot::Bottom => &mut self.bottom,
            Slot::Outerwear => &mut self.outerwear,
            Slot::Shoes => &mut self.shoes,
        }
    }

    /// Put an item into a slot, or clear the slot with `None`
    pub fn set(&mut self, slot: Slot, item: Option<ClothingItem>) {
        *self.slot_mut(slot) = item;
    }

    pub fn get(&self, slot: Slot) -> Option<&ClothingItem> {
        match slot {
            Slot::Top => self.top.as_ref(),
            Slot::Bottom => self.bottom.as_ref(),
            Slot::Outerwear => self.outerwear.as_ref(),
            Slot::Shoes => self.shoes.as_ref(),
        }
    }

    /// Accessories are open-ended; each call adds another one
    pub fn add_accessory(&mut self, item: ClothingItem) {
        self.accessories.push(item);
    }

    pub fn accessories(&self) -> &[ClothingItem] {
        &self.accessories
    }

    /// Every item in the outfit, slots first in display order
    pub fn items(&self) -> impl Iterator<Item = &ClothingItem> {
        Slot::ALL
            .into_iter()
            .filter_map(|slot| self.get(slot))
            .chain(self.accessories.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.items().next().is_none()
    }
}

impl ClosetStore {
    /// Load the outfit builder's choices for every built-in category
    ///
    /// Built from a single `get_all` snapshot, so the groups are consistent
    /// with each other even while an import is running.
    pub async fn wardrobe(&self) -> Result<Wardrobe> {
        let mut by_category: HashMap<String, Vec<ClothingItem>> = DEFAULT_CATEGORIES
            .iter()
            .map(|category| (category.to_string(), Vec::new()))
            .collect();

        for item in self.get_all().await? {
            if let Some(items) = by_category.get_mut(&item.category) {
                items.push(item);
            }
        }
        Ok(Wardrobe { by_category })
    }
}
