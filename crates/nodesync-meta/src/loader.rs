//! Loading settings and inventory snapshots from disk
//!
//! Files are read through [`ConfigStore`], so the format follows the file
//! extension (`.toml`, `.json`, `.yaml`).

use std::collections::HashSet;
use std::path::Path;

use nodesync_fs::ConfigStore;

use crate::{Error, Inventory, Result, SessionSettings};

/// Load session settings
pub fn load_settings(path: &Path) -> Result<SessionSettings> {
    let settings: SessionSettings = ConfigStore::new().load(path)?;
    tracing::debug!(
        path = %path.display(),
        matching_mode = %settings.matching_mode,
        linking_case = %settings.linking_case,
        "loaded session settings"
    );
    Ok(settings)
}

/// Load and validate one inventory snapshot
pub fn load_inventory(path: &Path) -> Result<Inventory> {
    let inventory: Inventory = ConfigStore::new().load(path)?;
    inventory.validate()?;
    tracing::debug!(
        path = %path.display(),
        code = %inventory.code,
        parts = inventory.parts.len(),
        "loaded inventory"
    );
    Ok(inventory)
}

/// Load several inventories, rejecting repeated inventory or part codes
pub fn load_inventories<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<Inventory>> {
    let mut inventories = Vec::with_capacity(paths.len());
    let mut inventory_codes = HashSet::new();
    let mut part_codes = HashSet::new();

    for path in paths {
        let inventory = load_inventory(path.as_ref())?;
        if !inventory_codes.insert(inventory.code.clone()) {
            return Err(Error::InvalidInventory {
                code: inventory.code.clone(),
                message: "inventory code is used by another inventory".to_string(),
            });
        }
        for part in &inventory.parts {
            if !part_codes.insert(part.code.clone()) {
                return Err(Error::InvalidInventory {
                    code: inventory.code.clone(),
                    message: format!("part code {} is used by another inventory", part.code),
                });
            }
        }
        inventories.push(inventory);
    }

    Ok(inventories)
}
