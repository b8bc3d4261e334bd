//! Session settings and inventory data model for nodesync.
//!
//! An [`Inventory`] is one node's scan of its data: a list of
//! [`InventoryPart`]s (scanned roots), each listing file and directory
//! descriptions. Inventories are produced by the scanning subsystem and are
//! treated as immutable input by the comparison engine.

pub mod error;
pub mod inventory;
pub mod loader;
pub mod settings;

pub use error::{Error, Result};
pub use inventory::{
    AnalysisError, DirectoryDescription, FileDescription, FileSystemType, Fingerprint, Inventory,
    InventoryPart, PartRef,
};
pub use loader::{load_inventories, load_inventory, load_settings};
pub use settings::{AnalysisMode, DataType, LinkingCase, MatchingMode, SessionSettings};
