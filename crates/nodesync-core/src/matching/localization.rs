//! Locating the content identity a data part refers to

use nodesync_meta::{Inventory, InventoryPart, PartRef};

use crate::comparison::{ComparisonItem, ContentIdentity};
use crate::rules::DataPart;

/// First identity of `item` attaching a description for `data_part`
pub fn localize<'a>(item: &'a ComparisonItem, data_part: &DataPart) -> Option<&'a ContentIdentity> {
    item.content_identities()
        .iter()
        .find(|ci| ci.parts().any(|p| data_part.matches(p)))
}

/// Every identity of `item` attaching a description for `data_part`
pub fn localize_all<'a>(item: &'a ComparisonItem, data_part: &DataPart) -> Vec<&'a ContentIdentity> {
    item.content_identities()
        .iter()
        .filter(|ci| ci.parts().any(|p| data_part.matches(p)))
        .collect()
}

/// Parts of `identity` that fall within `data_part`
pub fn matching_parts<'a>(
    identity: &'a ContentIdentity,
    data_part: &'a DataPart,
) -> impl Iterator<Item = &'a PartRef> {
    identity.parts().filter(move |p| data_part.matches(p))
}

/// Inventory parts `data_part` covers
pub fn resolve_parts<'a>(data_part: &DataPart, inventories: &'a [Inventory]) -> Vec<(PartRef, &'a InventoryPart)> {
    inventories
        .iter()
        .filter(|inv| inv.code == data_part.inventory)
        .flat_map(|inv| inv.parts.iter().map(move |part| (inv.part_ref(part), part)))
        .filter(|(part_ref, _)| data_part.matches(part_ref))
        .collect()
}
