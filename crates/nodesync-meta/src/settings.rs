//! Session settings shared by every node of a synchronization session
//!
//! Settings decide how entries from different inventories are linked together
//! and which entries take part in the comparison at all.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// How entries of different inventories are linked into one comparison item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchingMode {
    /// Entries link only when they occupy the same relative path.
    #[default]
    Tree,

    /// Entries link by name, wherever they sit in the tree.
    ///
    /// An incomplete inventory part cannot be trusted to have reported every
    /// name, which makes accessibility checks stricter in this mode.
    Flat,
}

impl FromStr for MatchingMode {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tree" => Ok(MatchingMode::Tree),
            "flat" => Ok(MatchingMode::Flat),
            _ => Err(invalid("matching_mode", s)),
        }
    }
}

impl fmt::Display for MatchingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchingMode::Tree => write!(f, "tree"),
            MatchingMode::Flat => write!(f, "flat"),
        }
    }
}

/// Case sensitivity of linking keys (paths in Tree mode, names in Flat mode).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkingCase {
    Sensitive,
    #[default]
    Insensitive,
}

impl LinkingCase {
    /// Fold a raw key according to this setting.
    pub fn fold(&self, key: &str) -> String {
        match self {
            LinkingCase::Sensitive => key.to_string(),
            LinkingCase::Insensitive => key.to_lowercase(),
        }
    }
}

impl FromStr for LinkingCase {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sensitive" | "case-sensitive" => Ok(LinkingCase::Sensitive),
            "insensitive" | "case-insensitive" => Ok(LinkingCase::Insensitive),
            _ => Err(invalid("linking_case", s)),
        }
    }
}

impl fmt::Display for LinkingCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkingCase::Sensitive => write!(f, "sensitive"),
            LinkingCase::Insensitive => write!(f, "insensitive"),
        }
    }
}

/// Which kinds of entries take part in the comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DataType {
    Files,
    Directories,
    #[default]
    FilesDirectories,
}

impl DataType {
    pub fn includes_files(&self) -> bool {
        matches!(self, DataType::Files | DataType::FilesDirectories)
    }

    pub fn includes_directories(&self) -> bool {
        matches!(self, DataType::Directories | DataType::FilesDirectories)
    }
}

impl FromStr for DataType {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "files" => Ok(DataType::Files),
            "directories" => Ok(DataType::Directories),
            "files-directories" | "filesdirectories" | "all" => Ok(DataType::FilesDirectories),
            _ => Err(invalid("data_type", s)),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Files => write!(f, "files"),
            DataType::Directories => write!(f, "directories"),
            DataType::FilesDirectories => write!(f, "files-directories"),
        }
    }
}

/// How eagerly content fingerprints are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    /// Fingerprint only the items whose size or timestamp already differ.
    #[default]
    Smart,
    /// Fingerprint every file.
    Checksum,
}

impl FromStr for AnalysisMode {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "smart" => Ok(AnalysisMode::Smart),
            "checksum" => Ok(AnalysisMode::Checksum),
            _ => Err(invalid("analysis_mode", s)),
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisMode::Smart => write!(f, "smart"),
            AnalysisMode::Checksum => write!(f, "checksum"),
        }
    }
}

/// Settings of one synchronization session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub matching_mode: MatchingMode,
    pub linking_case: LinkingCase,
    pub data_type: DataType,
    pub analysis_mode: AnalysisMode,
}

impl SessionSettings {
    /// Tree-mode settings with every other option at its default
    pub fn tree() -> Self {
        Self::default()
    }

    /// Flat-mode settings with every other option at its default
    pub fn flat() -> Self {
        Self {
            matching_mode: MatchingMode::Flat,
            ..Self::default()
        }
    }

    pub fn with_linking_case(mut self, linking_case: LinkingCase) -> Self {
        self.linking_case = linking_case;
        self
    }

    pub fn with_data_type(mut self, data_type: DataType) -> Self {
        self.data_type = data_type;
        self
    }

    pub fn with_analysis_mode(mut self, analysis_mode: AnalysisMode) -> Self {
        self.analysis_mode = analysis_mode;
        self
    }
}

fn invalid(setting: &str, value: &str) -> Error {
    Error::InvalidSetting {
        setting: setting.to_string(),
        value: value.to_string(),
    }
}
