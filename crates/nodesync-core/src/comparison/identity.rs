//! Path and content identities
//!
//! A [`PathIdentity`] says *which* logical entry a description belongs to; a
//! [`ContentIdentity`] groups the descriptions of that entry that share the
//! same content.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use nodesync_fs::RelativePath;
use nodesync_meta::{
    AnalysisError, DirectoryDescription, FileDescription, FileSystemType, MatchingMode, PartRef,
    SessionSettings,
};
use serde::{Deserialize, Serialize};

/// Cross-inventory identity of one entry
///
/// Equality, ordering and hashing only consider the file-system type and the
/// linking key; the remaining fields describe the first occurrence seen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathIdentity {
    pub file_system_type: FileSystemType,
    /// Relative path (Tree mode) or name (Flat mode), case-folded per `LinkingCase`
    pub linking_key: String,
    /// Name of the entry, as first seen
    pub file_name: String,
    /// Display form of the linking key, as first seen
    pub link_data: String,
    /// Relative path of the first occurrence
    pub original_path: RelativePath,
}

impl PathIdentity {
    /// Compute the identity of an entry under the given settings
    pub fn new(
        file_system_type: FileSystemType,
        path: &RelativePath,
        settings: &SessionSettings,
    ) -> Self {
        let file_name = path.file_name().to_string();
        let link_data = match settings.matching_mode {
            MatchingMode::Tree => path.as_str().to_string(),
            MatchingMode::Flat => file_name.clone(),
        };

        Self {
            file_system_type,
            linking_key: settings.linking_case.fold(&link_data),
            file_name,
            link_data,
            original_path: path.clone(),
        }
    }

    pub fn is_file(&self) -> bool {
        self.file_system_type == FileSystemType::File
    }

    pub fn is_directory(&self) -> bool {
        self.file_system_type == FileSystemType::Directory
    }
}

impl PartialEq for PathIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.file_system_type == other.file_system_type && self.linking_key == other.linking_key
    }
}

impl Eq for PathIdentity {}

impl Hash for PathIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.file_system_type.hash(state);
        self.linking_key.hash(state);
    }
}

impl PartialOrd for PathIdentity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PathIdentity {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.file_system_type, &self.linking_key).cmp(&(other.file_system_type, &other.linking_key))
    }
}

/// Content signature of a file
///
/// `hash` is `None` for files that were not fingerprinted yet; such files
/// group by size alone until a full analysis fills the hash in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentIdentityCore {
    pub hash: Option<String>,
    pub size: u64,
}

impl ContentIdentityCore {
    pub fn new(hash: impl Into<String>, size: u64) -> Self {
        Self {
            hash: Some(hash.into()),
            size,
        }
    }

    /// Core of an accessible file, `None` for unreadable files
    pub fn from_file(file: &FileDescription) -> Option<Self> {
        if !file.is_accessible {
            return None;
        }
        Some(Self {
            hash: file.fingerprint.as_ref().map(|f| f.hash_value()),
            size: file.size,
        })
    }

    pub fn is_hashed(&self) -> bool {
        self.hash.is_some()
    }
}

/// Content of one identity: either a known signature or unknown
///
/// Unknown covers unreadable files, placeholders for parts whose scan did not
/// reach the entry, and directories (which carry no content signature).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentCore {
    Known(ContentIdentityCore),
    Unknown,
}

impl ContentCore {
    pub fn known(&self) -> Option<&ContentIdentityCore> {
        match self {
            ContentCore::Known(core) => Some(core),
            ContentCore::Unknown => None,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, ContentCore::Known(_))
    }
}

/// A description attached to a content identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum EntryDescription {
    File(FileDescription),
    Directory(DirectoryDescription),
}

impl EntryDescription {
    /// Unreadable stand-in for an entry the scan of a part never reached
    pub fn placeholder(file_system_type: FileSystemType, path: &RelativePath) -> Self {
        match file_system_type {
            FileSystemType::File => Self::File(FileDescription::inaccessible(path.clone())),
            FileSystemType::Directory => {
                Self::Directory(DirectoryDescription::inaccessible(path.clone()))
            }
        }
    }

    pub fn file_system_type(&self) -> FileSystemType {
        match self {
            Self::File(_) => FileSystemType::File,
            Self::Directory(_) => FileSystemType::Directory,
        }
    }

    pub fn relative_path(&self) -> &RelativePath {
        match self {
            Self::File(f) => &f.relative_path,
            Self::Directory(d) => &d.relative_path,
        }
    }

    pub fn is_accessible(&self) -> bool {
        match self {
            Self::File(f) => f.is_accessible,
            Self::Directory(d) => d.is_accessible,
        }
    }

    pub fn size(&self) -> Option<u64> {
        match self {
            Self::File(f) if f.is_accessible => Some(f.size),
            _ => None,
        }
    }

    pub fn last_write_time(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::File(f) => f.last_write_time,
            Self::Directory(_) => None,
        }
    }

    pub fn analysis_error(&self) -> Option<&AnalysisError> {
        match self {
            Self::File(f) => f.analysis_error.as_ref(),
            Self::Directory(_) => None,
        }
    }
}

/// One content variant observed for a comparison item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentIdentity {
    core: ContentCore,
    descriptions: BTreeMap<PartRef, Vec<EntryDescription>>,
    access_issue_parts: BTreeSet<PartRef>,
}

impl ContentIdentity {
    pub fn new(core: ContentCore) -> Self {
        Self {
            core,
            descriptions: BTreeMap::new(),
            access_issue_parts: BTreeSet::new(),
        }
    }

    pub fn known(core: ContentIdentityCore) -> Self {
        Self::new(ContentCore::Known(core))
    }

    pub fn unknown() -> Self {
        Self::new(ContentCore::Unknown)
    }

    pub fn core(&self) -> &ContentCore {
        &self.core
    }

    /// Attach a description observed on `part`
    ///
    /// The size of a file description must equal the size stored in a known
    /// core; both are kept and a divergence is reported.
    pub fn add_description(&mut self, part: PartRef, description: EntryDescription) {
        if let (ContentCore::Known(core), EntryDescription::File(file)) = (&self.core, &description)
            && file.is_accessible
            && core.size != file.size
        {
            tracing::warn!(
                path = %file.relative_path,
                part = %part,
                core_size = core.size,
                description_size = file.size,
                "description size diverges from its content core"
            );
            debug_assert_eq!(core.size, file.size, "content core and description disagree on size");
        }
        if !description.is_accessible() {
            self.access_issue_parts.insert(part.clone());
        }
        self.descriptions.entry(part).or_default().push(description);
    }

    /// Record that `part` could not be read completely for this entry
    pub fn flag_access_issue(&mut self, part: PartRef) {
        self.access_issue_parts.insert(part);
    }

    pub fn descriptions(&self) -> &BTreeMap<PartRef, Vec<EntryDescription>> {
        &self.descriptions
    }

    pub fn descriptions_for(&self, part: &PartRef) -> &[EntryDescription] {
        self.descriptions
            .get(part)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Parts that attach at least one description
    pub fn parts(&self) -> impl Iterator<Item = &PartRef> {
        self.descriptions.keys()
    }

    pub fn has_part(&self, part: &PartRef) -> bool {
        self.descriptions.contains_key(part)
    }

    /// Inventory codes that attach at least one description
    pub fn inventories(&self) -> BTreeSet<&str> {
        self.descriptions
            .keys()
            .map(|p| p.inventory.as_str())
            .collect()
    }

    pub fn access_issue_parts(&self) -> &BTreeSet<PartRef> {
        &self.access_issue_parts
    }

    pub fn has_access_issue(&self, part: &PartRef) -> bool {
        self.access_issue_parts.contains(part)
    }

    /// Whether any description attached for `part` carries an analysis error
    pub fn has_analysis_error(&self, part: &PartRef) -> bool {
        self.descriptions_for(part)
            .iter()
            .any(|d| d.analysis_error().is_some())
    }

    /// Whether every description attached for `part` was actually read
    pub fn is_accessible_on(&self, part: &PartRef) -> bool {
        let descriptions = self.descriptions_for(part);
        !descriptions.is_empty() && descriptions.iter().all(EntryDescription::is_accessible)
    }

    /// Whether any attached description was actually read
    pub fn has_accessible_description(&self) -> bool {
        self.descriptions
            .values()
            .flatten()
            .any(EntryDescription::is_accessible)
    }

    /// First known last-write time reported for `part`
    pub fn last_write_time(&self, part: &PartRef) -> Option<DateTime<Utc>> {
        self.descriptions_for(part)
            .iter()
            .find_map(EntryDescription::last_write_time)
    }
}
