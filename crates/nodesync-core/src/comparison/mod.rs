//! Inventory comparison
//!
//! [`InventoryComparer`] merges inventories into [`ComparisonItem`]s, each
//! holding the [`ContentIdentity`] variants observed for one logical entry.

mod access;
mod comparer;
mod identity;
mod item;
mod status;

pub use comparer::InventoryComparer;
pub use identity::{ContentCore, ContentIdentity, ContentIdentityCore, EntryDescription, PathIdentity};
pub use item::{ComparisonItem, ComparisonResult, ContentRepartition};
pub use status::InitialStatusBuilder;
