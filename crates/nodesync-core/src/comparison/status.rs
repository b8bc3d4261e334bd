//! Completeness and grouping status of comparison items

use nodesync_meta::Inventory;

use super::identity::ContentCore;
use super::item::{ComparisonItem, ContentRepartition};

/// Computes the [`ContentRepartition`] of comparison items
#[derive(Debug, Default, Clone, Copy)]
pub struct InitialStatusBuilder;

impl InitialStatusBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Recompute `item`'s repartition against every inventory of the run
    pub fn build_status(&self, item: &mut ComparisonItem, inventories: &[Inventory]) {
        let mut repartition = ContentRepartition::default();

        for inventory in inventories {
            let present = item
                .content_identities()
                .iter()
                .any(|ci| ci.inventories().contains(inventory.code.as_str()));
            if !present {
                repartition.missing_inventories.insert(inventory.code.clone());
                repartition.missing_parts.extend(inventory.part_refs());
            }
        }

        for identity in item.content_identities() {
            if let ContentCore::Known(core) = identity.core() {
                repartition
                    .fingerprint_groups
                    .entry(core.clone())
                    .or_default()
                    .extend(identity.parts().cloned());
            }

            for (part, descriptions) in identity.descriptions() {
                for time in descriptions.iter().filter_map(|d| d.last_write_time()) {
                    repartition
                        .last_write_time_groups
                        .entry(time)
                        .or_default()
                        .insert(part.clone());
                }
            }
        }

        item.set_content_repartition(repartition);
    }
}
