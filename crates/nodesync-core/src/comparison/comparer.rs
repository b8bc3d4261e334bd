//! Merging N inventories into comparison items

use std::collections::{BTreeMap, BTreeSet, HashSet};

use nodesync_meta::{FileSystemType, Inventory, MatchingMode, PartRef, SessionSettings};

use super::access::{AccessMap, Occurrence};
use super::identity::{ContentIdentity, ContentIdentityCore, EntryDescription, PathIdentity};
use super::item::{ComparisonItem, ComparisonResult};
use super::status::InitialStatusBuilder;
use crate::{Error, Result};

/// Groups the entries of several inventories into [`ComparisonItem`]s
///
/// The comparer never touches the file system: it works on inventories that
/// were fully built (and fingerprinted, where applicable) beforehand.
#[derive(Debug, Clone)]
pub struct InventoryComparer {
    settings: SessionSettings,
    status_builder: InitialStatusBuilder,
}

impl InventoryComparer {
    pub fn new(settings: SessionSettings) -> Self {
        Self {
            settings,
            status_builder: InitialStatusBuilder::new(),
        }
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Compare `inventories` and compute the status of every resulting item
    ///
    /// Items come out ordered by file-system type, then linking key.
    pub fn compare(&self, inventories: Vec<Inventory>) -> Result<ComparisonResult> {
        check_unique_codes(&inventories)?;

        let access = AccessMap::build(&inventories, self.settings.linking_case);
        let mut items = Vec::new();
        let mut dropped = 0usize;

        for (path_identity, occurrences) in self.collect(&inventories) {
            if access.is_unresolvable(&occurrences) {
                tracing::trace!(item = %path_identity.link_data, "no readable description, dropped");
                dropped += 1;
                continue;
            }

            let mut item = ComparisonItem::new(path_identity);
            for identity in group_by_content(item.file_system_type(), occurrences) {
                item.add_content_identity(identity);
            }

            match self.settings.matching_mode {
                MatchingMode::Flat => access.add_incomplete_part_placeholders(&mut item),
                MatchingMode::Tree => access.propagate_ancestor_access_issues(&mut item),
            }

            self.status_builder.build_status(&mut item, &inventories);
            items.push(item);
        }

        tracing::debug!(
            inventories = inventories.len(),
            items = items.len(),
            dropped,
            mode = %self.settings.matching_mode,
            "Compared inventories"
        );

        Ok(ComparisonResult { inventories, items })
    }

    fn collect(&self, inventories: &[Inventory]) -> BTreeMap<PathIdentity, Vec<Occurrence>> {
        let mut grouped: BTreeMap<PathIdentity, Vec<Occurrence>> = BTreeMap::new();
        let data_type = self.settings.data_type;

        for inventory in inventories {
            for part in &inventory.parts {
                let part_ref = inventory.part_ref(part);

                let files = part
                    .files
                    .iter()
                    .filter(|_| data_type.includes_files())
                    .map(|f| EntryDescription::File(f.clone()));
                let directories = part
                    .directories
                    .iter()
                    .filter(|_| data_type.includes_directories())
                    .map(|d| EntryDescription::Directory(d.clone()));

                for description in files.chain(directories) {
                    let identity = PathIdentity::new(
                        description.file_system_type(),
                        description.relative_path(),
                        &self.settings,
                    );
                    grouped.entry(identity).or_default().push(Occurrence {
                        part: part_ref.clone(),
                        description,
                    });
                }
            }
        }

        grouped
    }
}

fn check_unique_codes(inventories: &[Inventory]) -> Result<()> {
    let mut inventory_codes = HashSet::new();
    let mut part_codes = HashSet::new();
    for inventory in inventories {
        if !inventory_codes.insert(inventory.code.as_str()) {
            return Err(Error::DuplicateInventoryCode {
                code: inventory.code.clone(),
            });
        }
        for part in &inventory.parts {
            if !part_codes.insert(part.code.as_str()) {
                return Err(Error::DuplicateInventoryCode {
                    code: part.code.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Build the content identities of one item
///
/// Readable files group by content core. Unreadable files only get an
/// unknown identity for parts no readable occurrence already explains.
/// Directories share a single unknown identity.
fn group_by_content(
    file_system_type: FileSystemType,
    occurrences: Vec<Occurrence>,
) -> Vec<ContentIdentity> {
    if file_system_type == FileSystemType::Directory {
        let mut identity = ContentIdentity::unknown();
        for occurrence in occurrences {
            identity.add_description(occurrence.part, occurrence.description);
        }
        return vec![identity];
    }

    let mut known: BTreeMap<ContentIdentityCore, ContentIdentity> = BTreeMap::new();
    let mut unreadable = Vec::new();

    for occurrence in occurrences {
        let core = match &occurrence.description {
            EntryDescription::File(file) => ContentIdentityCore::from_file(file),
            EntryDescription::Directory(_) => None,
        };
        match core {
            Some(core) => known
                .entry(core.clone())
                .or_insert_with(|| ContentIdentity::known(core))
                .add_description(occurrence.part, occurrence.description),
            None => unreadable.push(occurrence),
        }
    }

    let mut identities: Vec<ContentIdentity> = known.into_values().collect();
    let mut unknown_by_part: BTreeMap<PartRef, ContentIdentity> = BTreeMap::new();
    let explained: BTreeSet<PartRef> = identities
        .iter()
        .flat_map(|ci| ci.parts().cloned())
        .collect();

    for occurrence in unreadable {
        if explained.contains(&occurrence.part) {
            if let Some(identity) = identities.iter_mut().find(|ci| ci.has_part(&occurrence.part)) {
                identity.flag_access_issue(occurrence.part);
            }
            continue;
        }
        unknown_by_part
            .entry(occurrence.part.clone())
            .or_insert_with(ContentIdentity::unknown)
            .add_description(occurrence.part, occurrence.description);
    }

    identities.extend(unknown_by_part.into_values());
    identities
}
