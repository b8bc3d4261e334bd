//! Normalized relative paths for inventory entries
//!
//! Every entry an inventory reports is addressed relative to the root of its
//! inventory part. Scanners on different platforms report these paths with
//! different separators, so they are normalized once here and compared as
//! plain strings everywhere else.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator used by every normalized path
pub const SEPARATOR: char = '/';

/// A path relative to an inventory part root.
///
/// The internal representation always:
/// - uses forward slashes
/// - starts with the separator (the part root itself is `/`)
/// - has no trailing separator, no empty and no `.` segments
/// - never climbs above the root (`..` segments are resolved)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct RelativePath {
    inner: String,
}

impl RelativePath {
    /// Create a normalized relative path from any textual input.
    pub fn new(path: impl AsRef<str>) -> Self {
        let raw = path.as_ref().replace('\\', "/");
        let mut segments: Vec<&str> = Vec::new();

        for segment in raw.split(SEPARATOR) {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                other => segments.push(other),
            }
        }

        let mut inner = String::with_capacity(raw.len() + 1);
        if segments.is_empty() {
            inner.push(SEPARATOR);
        }
        for segment in segments {
            inner.push(SEPARATOR);
            inner.push_str(segment);
        }

        Self { inner }
    }

    /// The part root (`/`).
    pub fn root() -> Self {
        Self {
            inner: SEPARATOR.to_string(),
        }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Whether this is the part root.
    pub fn is_root(&self) -> bool {
        self.inner.len() == 1
    }

    /// Join this path with a segment.
    pub fn join(&self, segment: &str) -> Self {
        Self::new(format!("{}/{}", self.inner, segment))
    }

    /// Get the parent directory, `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        match self.inner.rfind(SEPARATOR) {
            Some(0) => Some(Self::root()),
            Some(idx) => Some(Self {
                inner: self.inner[..idx].to_string(),
            }),
            None => None,
        }
    }

    /// Get the last component, empty for the root.
    pub fn file_name(&self) -> &str {
        self.inner
            .rsplit(SEPARATOR)
            .next()
            .unwrap_or_default()
    }

    /// Number of components below the root.
    pub fn depth(&self) -> usize {
        if self.is_root() {
            0
        } else {
            self.inner.matches(SEPARATOR).count()
        }
    }

    /// Strict ancestors, nearest first, excluding the root.
    pub fn ancestors(&self) -> Vec<Self> {
        let mut ancestors = Vec::new();
        let mut current = self.parent();
        while let Some(path) = current {
            if path.is_root() {
                break;
            }
            current = path.parent();
            ancestors.push(path);
        }
        ancestors
    }

    /// Whether this path lies strictly below `dir`.
    pub fn is_under(&self, dir: &RelativePath) -> bool {
        if dir.is_root() {
            return !self.is_root();
        }
        self.inner.len() > dir.inner.len()
            && self.inner.starts_with(&dir.inner)
            && self.inner[dir.inner.len()..].starts_with(SEPARATOR)
    }
}

impl Default for RelativePath {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl AsRef<str> for RelativePath {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

impl From<&str> for RelativePath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for RelativePath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<RelativePath> for String {
    fn from(p: RelativePath) -> Self {
        p.inner
    }
}
