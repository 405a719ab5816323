use crate::core::ids::ItemId;
use serde::{Deserialize, Serialize};

/// A quantity of one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub item: ItemId,
    pub quantity: u64,
}

impl ItemStack {
    pub fn new(item: impl Into<ItemId>, quantity: u64) -> Self {
        Self {
            item: item.into(),
            quantity,
        }
    }
}

impl From<&str> for ItemStack {
    fn from(item: &str) -> Self {
        ItemStack::new(item, 1)
    }
}
