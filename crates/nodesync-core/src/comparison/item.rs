//! Comparison items and the result of one comparison run

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use nodesync_meta::{AnalysisMode, FileSystemType, Inventory, InventoryPart, PartRef};

use super::identity::{ContentIdentity, ContentIdentityCore, PathIdentity};

/// Completeness and grouping summary of one comparison item
///
/// Built by [`super::InitialStatusBuilder`]; recomputed from scratch whenever
/// the item's content identities change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentRepartition {
    /// Inventories with no description of the item at all
    pub missing_inventories: BTreeSet<String>,
    /// Parts of the missing inventories
    pub missing_parts: BTreeSet<PartRef>,
    /// Parts sharing each exact content
    pub fingerprint_groups: BTreeMap<ContentIdentityCore, BTreeSet<PartRef>>,
    /// Parts sharing each exact last-write time, regardless of content
    pub last_write_time_groups: BTreeMap<DateTime<Utc>, BTreeSet<PartRef>>,
}

impl ContentRepartition {
    /// Same content and same timestamp everywhere, nothing missing
    pub fn is_in_sync(&self) -> bool {
        self.missing_inventories.is_empty()
            && self.fingerprint_groups.len() <= 1
            && self.last_write_time_groups.len() <= 1
    }

    /// Same last-write time observed for different contents
    pub fn has_same_time_different_content(&self) -> bool {
        self.fingerprint_groups.len() > 1
            && self.last_write_time_groups.values().any(|parts| {
                let cores: BTreeSet<&ContentIdentityCore> = self
                    .fingerprint_groups
                    .iter()
                    .filter(|(_, group)| !group.is_disjoint(parts))
                    .map(|(core, _)| core)
                    .collect();
                cores.len() > 1
            })
    }
}

/// One logical entry across all inventories
#[derive(Debug, Clone)]
pub struct ComparisonItem {
    path_identity: PathIdentity,
    content_identities: Vec<ContentIdentity>,
    repartition: ContentRepartition,
}

impl ComparisonItem {
    pub fn new(path_identity: PathIdentity) -> Self {
        Self {
            path_identity,
            content_identities: Vec::new(),
            repartition: ContentRepartition::default(),
        }
    }

    pub fn path_identity(&self) -> &PathIdentity {
        &self.path_identity
    }

    pub fn file_system_type(&self) -> FileSystemType {
        self.path_identity.file_system_type
    }

    pub fn content_identities(&self) -> &[ContentIdentity] {
        &self.content_identities
    }

    /// Add a content identity; the repartition must be rebuilt afterwards
    pub fn add_content_identity(&mut self, identity: ContentIdentity) {
        self.content_identities.push(identity);
        self.repartition = ContentRepartition::default();
    }

    pub(crate) fn content_identities_mut(&mut self) -> &mut Vec<ContentIdentity> {
        self.repartition = ContentRepartition::default();
        &mut self.content_identities
    }

    pub fn content_repartition(&self) -> &ContentRepartition {
        &self.repartition
    }

    pub(crate) fn set_content_repartition(&mut self, repartition: ContentRepartition) {
        self.repartition = repartition;
    }

    /// The identity attaching a description for `part`, if any
    pub fn identity_for_part(&self, part: &PartRef) -> Option<&ContentIdentity> {
        self.content_identities.iter().find(|ci| ci.has_part(part))
    }

    /// Whether some identity attaches a description for `part`
    pub fn is_present_on(&self, part: &PartRef) -> bool {
        self.identity_for_part(part).is_some()
    }

    /// Parts flagged with an access issue by any identity
    pub fn access_issue_parts(&self) -> BTreeSet<&PartRef> {
        self.content_identities
            .iter()
            .flat_map(|ci| ci.access_issue_parts())
            .collect()
    }

    fn distinct_last_write_times(&self) -> BTreeSet<DateTime<Utc>> {
        self.content_identities
            .iter()
            .flat_map(|ci| ci.descriptions().values().flatten())
            .filter_map(|d| d.last_write_time())
            .collect()
    }

    fn has_unhashed_core(&self) -> bool {
        self.content_identities
            .iter()
            .filter_map(|ci| ci.core().known())
            .any(|core| !core.is_hashed())
    }

    /// Whether this item must be fingerprinted before contents can be trusted
    ///
    /// Smart analysis only selects files whose metadata already disagrees
    /// across parts; checksum analysis selects every file still lacking a hash.
    pub fn needs_full_analysis(&self, mode: AnalysisMode) -> bool {
        if !self.path_identity.is_file() {
            return false;
        }
        match mode {
            AnalysisMode::Checksum => self.has_unhashed_core(),
            AnalysisMode::Smart => {
                self.content_identities.len() > 1 || self.distinct_last_write_times().len() > 1
            }
        }
    }
}

/// Output of one comparison run
#[derive(Debug, Clone)]
pub struct ComparisonResult {
    pub inventories: Vec<Inventory>,
    pub items: Vec<ComparisonItem>,
}

impl ComparisonResult {
    pub fn item(&self, path_identity: &PathIdentity) -> Option<&ComparisonItem> {
        self.items.iter().find(|i| i.path_identity() == path_identity)
    }

    pub fn inventory(&self, code: &str) -> Option<&Inventory> {
        self.inventories.iter().find(|i| i.code == code)
    }

    pub fn part(&self, part: &PartRef) -> Option<&InventoryPart> {
        self.inventory(&part.inventory)?.part(&part.part)
    }

    /// Items that must be fingerprinted (or re-fingerprinted) before rules run
    pub fn items_needing_full_analysis(&self, mode: AnalysisMode) -> Vec<&ComparisonItem> {
        self.items
            .iter()
            .filter(|item| item.needs_full_analysis(mode))
            .collect()
    }
}
