//! Item stacks and the player inventory.

pub mod inventory;
pub mod types;

pub use inventory::Inventory;
pub use types::ItemStack;
