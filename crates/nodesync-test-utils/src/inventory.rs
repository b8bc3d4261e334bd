//! Fluent builders for inventories.

use chrono::{DateTime, Utc};
use nodesync_fs::checksum::compute_content_fingerprint;
use nodesync_meta::{
    DirectoryDescription, FileDescription, FileSystemType, Fingerprint, Inventory, InventoryPart,
};

/// Timestamp `secs` seconds after the epoch.
///
/// # Panics
/// Panics if `secs` is out of chrono's range.
pub fn ts(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0)
        .unwrap_or_else(|| panic!("ts: timestamp {secs} out of range"))
}

/// Default last-write time used by builders when none is given.
pub const DEFAULT_TIME: i64 = 1_700_000_000;

/// Builds an [`Inventory`] part by part.
///
/// # Example
///
/// ```rust
/// use nodesync_test_utils::{InventoryBuilder, PartBuilder};
///
/// let inventory = InventoryBuilder::new("A")
///     .part(PartBuilder::directory("A1").file("/docs/a.txt", "hello"))
///     .build();
/// assert_eq!(inventory.parts.len(), 1);
/// ```
pub struct InventoryBuilder {
    inventory: Inventory,
}

impl InventoryBuilder {
    pub fn new(code: &str) -> Self {
        Self {
            inventory: Inventory::new(code, format!("machine-{}", code.to_lowercase())),
        }
    }

    pub fn part(mut self, part: PartBuilder) -> Self {
        self.inventory.parts.push(part.build());
        self
    }

    pub fn build(self) -> Inventory {
        self.inventory
    }
}

/// Builds an [`InventoryPart`].
///
/// Files added with [`PartBuilder::file`] are fingerprinted from their
/// textual content and sized accordingly.
pub struct PartBuilder {
    part: InventoryPart,
}

impl PartBuilder {
    /// A part rooted at a directory.
    pub fn directory(code: &str) -> Self {
        Self {
            part: InventoryPart::new(code, format!("/roots/{code}"), FileSystemType::Directory),
        }
    }

    /// A part made of a single file.
    pub fn single_file(code: &str) -> Self {
        Self {
            part: InventoryPart::new(code, format!("/roots/{code}.bin"), FileSystemType::File),
        }
    }

    /// Mark the part as incompletely scanned.
    pub fn incomplete(mut self) -> Self {
        self.part.is_incomplete_due_to_access = true;
        self
    }

    /// A readable, fingerprinted file.
    pub fn file(self, path: &str, content: &str) -> Self {
        self.file_at(path, content, ts(DEFAULT_TIME))
    }

    /// A readable, fingerprinted file with an explicit last-write time.
    pub fn file_at(mut self, path: &str, content: &str, time: DateTime<Utc>) -> Self {
        let description = FileDescription::new(path, content.len() as u64, time)
            .with_fingerprint(Fingerprint::Sha256(compute_content_fingerprint(content)));
        self.part.files.push(description);
        self
    }

    /// A readable file that was not fingerprinted yet.
    pub fn unhashed_file(mut self, path: &str, size: u64, time: DateTime<Utc>) -> Self {
        self.part.files.push(FileDescription::new(path, size, time));
        self
    }

    /// A readable file whose analysis failed.
    pub fn file_with_error(mut self, path: &str, size: u64) -> Self {
        self.part.files.push(
            FileDescription::new(path, size, ts(DEFAULT_TIME))
                .with_analysis_error("io", "read interrupted"),
        );
        self
    }

    /// Add a file description as is.
    pub fn description(mut self, description: FileDescription) -> Self {
        self.part.files.push(description);
        self
    }

    /// A file the scanner could not read.
    pub fn inaccessible_file(mut self, path: &str) -> Self {
        self.part.files.push(FileDescription::inaccessible(path));
        self
    }

    pub fn dir(mut self, path: &str) -> Self {
        self.part.directories.push(DirectoryDescription::new(path));
        self
    }

    /// A directory the scanner could not enter.
    pub fn inaccessible_dir(mut self, path: &str) -> Self {
        self.part
            .directories
            .push(DirectoryDescription::inaccessible(path));
        self
    }

    pub fn build(self) -> InventoryPart {
        self.part
    }
}
