//! Access-issue handling for incomplete parts and unreadable directories

use std::collections::{BTreeMap, BTreeSet};

use nodesync_fs::RelativePath;
use nodesync_meta::{FileSystemType, Inventory, InventoryPart, LinkingCase, PartRef};

use super::identity::{ContentIdentity, EntryDescription};
use super::item::ComparisonItem;

/// One description of an entry, tagged with the part that reported it
#[derive(Debug, Clone)]
pub(crate) struct Occurrence {
    pub part: PartRef,
    pub description: EntryDescription,
}

/// Per-part access state gathered once per comparison run
#[derive(Debug, Default)]
pub(crate) struct AccessMap {
    incomplete: BTreeMap<PartRef, FileSystemType>,
    blocked_directories: BTreeMap<PartRef, Vec<RelativePath>>,
}

impl AccessMap {
    pub fn build(inventories: &[Inventory], linking_case: LinkingCase) -> Self {
        let mut map = Self::default();
        for inventory in inventories {
            for part in &inventory.parts {
                let part_ref = PartRef::new(&inventory.code, &part.code);
                if part.is_incomplete_due_to_access {
                    map.incomplete.insert(part_ref.clone(), part.part_type);
                }
                let blocked = blocked_directories(part, linking_case);
                if !blocked.is_empty() {
                    map.blocked_directories.insert(part_ref, blocked);
                }
            }
        }
        map
    }

    pub fn is_incomplete(&self, part: &PartRef) -> bool {
        self.incomplete.contains_key(part)
    }

    /// An item can't be compared when nothing readable was reported for it
    /// and every reporting part skipped entries
    pub fn is_unresolvable(&self, occurrences: &[Occurrence]) -> bool {
        !occurrences.iter().any(|o| o.description.is_accessible())
            && occurrences.iter().all(|o| self.is_incomplete(&o.part))
    }

    /// Flat mode: an incomplete directory part may have missed this name anywhere
    pub fn add_incomplete_part_placeholders(&self, item: &mut ComparisonItem) {
        let file_system_type = item.file_system_type();
        let path = item.path_identity().original_path.clone();

        for (part, part_type) in &self.incomplete {
            if *part_type != FileSystemType::Directory || item.is_present_on(part) {
                continue;
            }
            tracing::trace!(item = %path, part = %part, "placeholder for incomplete part");
            let placeholder = EntryDescription::placeholder(file_system_type, &path);
            attach_placeholder(item, part, placeholder);
        }
    }

    /// Tree mode: entries below an unreadable directory of a part are blocked on that part
    pub fn propagate_ancestor_access_issues(&self, item: &mut ComparisonItem) {
        let key = RelativePath::new(&item.path_identity().linking_key);
        if key.is_root() {
            return;
        }
        let path = item.path_identity().original_path.clone();
        let file_system_type = item.file_system_type();

        for (part, directories) in &self.blocked_directories {
            if !directories.iter().any(|dir| key.is_under(dir)) {
                continue;
            }

            let covering = item
                .content_identities_mut()
                .iter_mut()
                .find(|ci| ci.has_part(part));
            if let Some(identity) = covering {
                identity.flag_access_issue(part.clone());
                continue;
            }

            tracing::trace!(item = %path, part = %part, "access issue inherited from ancestor");
            let placeholder = EntryDescription::placeholder(file_system_type, &path);
            attach_placeholder(item, part, placeholder);
        }
    }
}

/// Files get their own unknown identity; a directory item keeps its single identity
fn attach_placeholder(item: &mut ComparisonItem, part: &PartRef, placeholder: EntryDescription) {
    let identities = item.content_identities_mut();
    match (placeholder.file_system_type(), identities.first_mut()) {
        (FileSystemType::Directory, Some(identity)) => {
            identity.add_description(part.clone(), placeholder);
        }
        _ => {
            let mut identity = ContentIdentity::unknown();
            identity.add_description(part.clone(), placeholder);
            identities.push(identity);
        }
    }
}

fn blocked_directories(part: &InventoryPart, linking_case: LinkingCase) -> Vec<RelativePath> {
    let folded: BTreeSet<RelativePath> = part
        .inaccessible_directories()
        .map(|d| RelativePath::new(linking_case.fold(d.relative_path.as_str())))
        .collect();
    folded.into_iter().collect()
}
