//! References to an inventory or one of its parts

use std::fmt;
use std::str::FromStr;

use nodesync_meta::{Inventory, PartRef};
use serde::{Deserialize, Serialize};

use crate::Error;

/// Source or destination of a condition or action
///
/// Written as `A` for a whole inventory or `A/A1` for one of its parts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DataPart {
    pub inventory: String,
    pub part: Option<String>,
}

impl DataPart {
    pub fn for_inventory(code: impl Into<String>) -> Self {
        Self {
            inventory: code.into(),
            part: None,
        }
    }

    pub fn for_part(part: &PartRef) -> Self {
        Self {
            inventory: part.inventory.clone(),
            part: Some(part.part.clone()),
        }
    }

    /// Display name: the part code, or the inventory code for a whole inventory
    pub fn name(&self) -> &str {
        self.part.as_deref().unwrap_or(&self.inventory)
    }

    /// Whether `part` falls within this data part
    pub fn matches(&self, part: &PartRef) -> bool {
        self.inventory == part.inventory
            && self.part.as_deref().is_none_or(|code| code == part.part)
    }

    /// Check that this data part names something present in `inventories`
    pub fn resolve(&self, inventories: &[Inventory]) -> crate::Result<()> {
        let known = inventories
            .iter()
            .find(|inv| inv.code == self.inventory)
            .is_some_and(|inv| self.part.as_deref().is_none_or(|code| inv.part(code).is_some()));
        if known {
            Ok(())
        } else {
            Err(Error::UnknownDataPart {
                name: self.to_string(),
            })
        }
    }
}

impl fmt::Display for DataPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.part {
            Some(part) => write!(f, "{}/{}", self.inventory, part),
            None => write!(f, "{}", self.inventory),
        }
    }
}

impl FromStr for DataPart {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::UnknownDataPart {
            name: s.to_string(),
        };
        let (inventory, part) = match s.split_once('/') {
            Some((inventory, part)) => (inventory.trim(), Some(part.trim())),
            None => (s.trim(), None),
        };
        if inventory.is_empty() || part.is_some_and(str::is_empty) {
            return Err(invalid());
        }
        Ok(Self {
            inventory: inventory.to_string(),
            part: part.map(str::to_string),
        })
    }
}

impl TryFrom<String> for DataPart {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DataPart> for String {
    fn from(value: DataPart) -> Self {
        value.to_string()
    }
}

impl From<&PartRef> for DataPart {
    fn from(part: &PartRef) -> Self {
        Self::for_part(part)
    }
}
