//! Inventory data model
//!
//! Inventories are built by the scanning subsystem. The comparison engine
//! only reads them, so every type here is plain data with a few lookup helpers.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use nodesync_fs::RelativePath;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Kind of file-system entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileSystemType {
    File,
    Directory,
}

impl fmt::Display for FileSystemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileSystemType::File => write!(f, "file"),
            FileSystemType::Directory => write!(f, "directory"),
        }
    }
}

/// Value reference to one inventory part
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PartRef {
    /// Code of the owning inventory (e.g. `A`)
    pub inventory: String,
    /// Code of the part (e.g. `A1`)
    pub part: String,
}

impl PartRef {
    pub fn new(inventory: impl Into<String>, part: impl Into<String>) -> Self {
        Self {
            inventory: inventory.into(),
            part: part.into(),
        }
    }
}

impl fmt::Display for PartRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.part)
    }
}

/// Content fingerprint computed by the fingerprinting subsystem
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum Fingerprint {
    /// Full-content SHA-256 (`sha256:<hex>`)
    Sha256(String),
    /// Identifier of a delta signature computed for large files
    Signature(Uuid),
}

impl Fingerprint {
    /// The textual hash used as the content key
    pub fn hash_value(&self) -> String {
        match self {
            Fingerprint::Sha256(hash) => hash.clone(),
            Fingerprint::Signature(guid) => format!("signature:{guid}"),
        }
    }
}

/// Failure recorded while analysing an accessible file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisError {
    pub kind: String,
    pub message: String,
}

/// One scanned file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescription {
    pub relative_path: RelativePath,
    #[serde(default)]
    pub size: u64,
    /// Unknown for files the scanner could not read
    #[serde(default)]
    pub last_write_time: Option<DateTime<Utc>>,
    #[serde(default = "default_accessible")]
    pub is_accessible: bool,
    #[serde(default)]
    pub fingerprint: Option<Fingerprint>,
    #[serde(default)]
    pub analysis_error: Option<AnalysisError>,
}

impl FileDescription {
    /// An accessible file that has not been fingerprinted yet
    pub fn new(
        relative_path: impl Into<RelativePath>,
        size: u64,
        last_write_time: DateTime<Utc>,
    ) -> Self {
        Self {
            relative_path: relative_path.into(),
            size,
            last_write_time: Some(last_write_time),
            is_accessible: true,
            fingerprint: None,
            analysis_error: None,
        }
    }

    /// A file the scanner saw but could not read; carries no fingerprint
    pub fn inaccessible(relative_path: impl Into<RelativePath>) -> Self {
        Self {
            relative_path: relative_path.into(),
            size: 0,
            last_write_time: None,
            is_accessible: false,
            fingerprint: None,
            analysis_error: None,
        }
    }

    pub fn with_fingerprint(mut self, fingerprint: Fingerprint) -> Self {
        self.fingerprint = Some(fingerprint);
        self
    }

    pub fn with_analysis_error(mut self, kind: &str, message: &str) -> Self {
        self.analysis_error = Some(AnalysisError {
            kind: kind.to_string(),
            message: message.to_string(),
        });
        self
    }

    pub fn name(&self) -> &str {
        self.relative_path.file_name()
    }

    pub fn has_analysis_error(&self) -> bool {
        self.analysis_error.is_some()
    }
}

/// One scanned directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryDescription {
    pub relative_path: RelativePath,
    #[serde(default = "default_accessible")]
    pub is_accessible: bool,
}

impl DirectoryDescription {
    pub fn new(relative_path: impl Into<RelativePath>) -> Self {
        Self {
            relative_path: relative_path.into(),
            is_accessible: true,
        }
    }

    pub fn inaccessible(relative_path: impl Into<RelativePath>) -> Self {
        Self {
            relative_path: relative_path.into(),
            is_accessible: false,
        }
    }

    pub fn name(&self) -> &str {
        self.relative_path.file_name()
    }
}

fn default_accessible() -> bool {
    true
}

/// One scanned root (a directory or a single file)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryPart {
    /// Part code, unique within a comparison run (e.g. `A1`)
    pub code: String,
    pub root_path: String,
    pub part_type: FileSystemType,
    /// Set when the scan skipped entries it could not read
    #[serde(default)]
    pub is_incomplete_due_to_access: bool,
    #[serde(default)]
    pub files: Vec<FileDescription>,
    #[serde(default)]
    pub directories: Vec<DirectoryDescription>,
}

impl InventoryPart {
    pub fn new(code: impl Into<String>, root_path: impl Into<String>, part_type: FileSystemType) -> Self {
        Self {
            code: code.into(),
            root_path: root_path.into(),
            part_type,
            is_incomplete_due_to_access: false,
            files: Vec::new(),
            directories: Vec::new(),
        }
    }

    /// Directories this part reported as unreadable
    pub fn inaccessible_directories(&self) -> impl Iterator<Item = &DirectoryDescription> {
        self.directories.iter().filter(|d| !d.is_accessible)
    }

    pub fn file(&self, path: &RelativePath) -> Option<&FileDescription> {
        self.files.iter().find(|f| &f.relative_path == path)
    }

    pub fn directory(&self, path: &RelativePath) -> Option<&DirectoryDescription> {
        self.directories.iter().find(|d| &d.relative_path == path)
    }

    fn validate(&self, inventory_code: &str) -> Result<()> {
        let invalid = |message: String| Error::InvalidInventory {
            code: inventory_code.to_string(),
            message,
        };

        let mut seen = HashSet::new();
        let paths = self
            .files
            .iter()
            .map(|f| &f.relative_path)
            .chain(self.directories.iter().map(|d| &d.relative_path));
        for path in paths {
            if !seen.insert(path) {
                return Err(invalid(format!(
                    "path {} is reported twice in part {}",
                    path, self.code
                )));
            }
        }

        if let Some(file) = self
            .files
            .iter()
            .find(|f| !f.is_accessible && f.fingerprint.is_some())
        {
            return Err(invalid(format!(
                "inaccessible file {} in part {} carries a fingerprint",
                file.relative_path, self.code
            )));
        }

        if self.part_type == FileSystemType::File && !self.directories.is_empty() {
            return Err(invalid(format!(
                "single-file part {} lists directories",
                self.code
            )));
        }

        Ok(())
    }
}

/// One node's full scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    pub id: String,
    /// Short code, unique within a comparison run (e.g. `A`)
    pub code: String,
    pub machine_name: String,
    pub endpoint_id: String,
    #[serde(default)]
    pub parts: Vec<InventoryPart>,
}

impl Inventory {
    pub fn new(code: impl Into<String>, machine_name: impl Into<String>) -> Self {
        let code = code.into();
        Self {
            id: Uuid::new_v4().to_string(),
            endpoint_id: format!("endpoint-{code}"),
            code,
            machine_name: machine_name.into(),
            parts: Vec::new(),
        }
    }

    pub fn part(&self, code: &str) -> Option<&InventoryPart> {
        self.parts.iter().find(|p| p.code == code)
    }

    pub fn part_refs(&self) -> impl Iterator<Item = PartRef> + '_ {
        self.parts.iter().map(|p| PartRef::new(&self.code, &p.code))
    }

    pub fn part_ref(&self, part: &InventoryPart) -> PartRef {
        PartRef::new(&self.code, &part.code)
    }

    /// Whether any part of this inventory was only partially scanned
    pub fn is_incomplete(&self) -> bool {
        self.parts.iter().any(|p| p.is_incomplete_due_to_access)
    }

    /// Check structural invariants of a freshly loaded inventory
    ///
    /// # Errors
    ///
    /// Returns `InvalidInventory` when part codes repeat, a path is reported
    /// twice within a part, or an inaccessible file carries a fingerprint.
    pub fn validate(&self) -> Result<()> {
        let mut codes = HashSet::new();
        for part in &self.parts {
            if !codes.insert(part.code.as_str()) {
                return Err(Error::InvalidInventory {
                    code: self.code.clone(),
                    message: format!("part code {} is used twice", part.code),
                });
            }
            part.validate(&self.code)?;
        }
        Ok(())
    }
}
