//! Slot-limited inventory.
//!
//! Each distinct item occupies one slot and stacks without limit. An item that
//! needs a new slot when none is free does not fit; callers count it as lost.

use super::types::ItemStack;
use crate::core::constants::DEFAULT_INVENTORY_SLOTS;
use crate::core::ids::ItemId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    slots: usize,
    items: BTreeMap<ItemId, u64>,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new(DEFAULT_INVENTORY_SLOTS)
    }
}

impl Inventory {
    pub fn new(slots: usize) -> Self {
        Self {
            slots,
            items: BTreeMap::new(),
        }
    }

    pub fn slots(&self) -> usize {
        self.slots
    }

    pub fn used_slots(&self) -> usize {
        self.items.len()
    }

    pub fn free_slots(&self) -> usize {
        self.slots.saturating_sub(self.items.len())
    }

    pub fn count(&self, item: &ItemId) -> u64 {
        self.items.get(item).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ItemId, u64)> {
        self.items.iter().map(|(id, qty)| (id, *qty))
    }

    /// True if `stack` would be accepted in full.
    pub fn can_fit(&self, stack: &ItemStack) -> bool {
        stack.quantity == 0 || self.items.contains_key(&stack.item) || self.free_slots() > 0
    }

    /// Adds a stack, returning the quantity that did not fit (all or nothing).
    pub fn add(&mut self, stack: &ItemStack) -> u64 {
        if stack.quantity == 0 {
            return 0;
        }
        if !self.can_fit(stack) {
            return stack.quantity;
        }
        *self.items.entry(stack.item.clone()).or_insert(0) += stack.quantity;
        0
    }

    /// True if every requirement is held, counting repeated items together.
    pub fn has_all(&self, stacks: &[ItemStack]) -> bool {
        required(stacks)
            .into_iter()
            .all(|(item, qty)| self.count(item) >= qty)
    }

    /// Removes every stack or nothing. Returns false when anything is short.
    pub fn remove_all(&mut self, stacks: &[ItemStack]) -> bool {
        if !self.has_all(stacks) {
            return false;
        }
        for (item, qty) in required(stacks) {
            if let Some(held) = self.items.get_mut(item) {
                *held -= qty;
                if *held == 0 {
                    self.items.remove(item);
                }
            }
        }
        true
    }
}

fn required(stacks: &[ItemStack]) -> BTreeMap<&ItemId, u64> {
    let mut totals = BTreeMap::new();
    for stack in stacks {
        *totals.entry(&stack.item).or_insert(0) += stack.quantity;
    }
    totals
}
