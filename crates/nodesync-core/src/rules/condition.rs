//! Atomic conditions of synchronization rules

use std::fmt;

use chrono::{DateTime, Utc};
use globset::GlobBuilder;
use serde::{Deserialize, Serialize};

use super::DataPart;
use crate::{Error, Result};

/// Property of an item a condition compares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonProperty {
    Name,
    Size,
    Date,
    Content,
    Presence,
}

impl ComparisonProperty {
    /// Operators this property can be compared with
    pub fn supported_operators(&self) -> &'static [ConditionOperator] {
        use ConditionOperator::*;
        match self {
            ComparisonProperty::Name | ComparisonProperty::Content => &[Equals, NotEquals],
            ComparisonProperty::Size => &[Equals, NotEquals, IsBiggerThan, IsSmallerThan],
            ComparisonProperty::Date => &[Equals, NotEquals, IsNewerThan, IsOlderThan],
            ComparisonProperty::Presence => &[ExistsOn, NotExistsOn],
        }
    }

    pub fn supports(&self, operator: ConditionOperator) -> bool {
        self.supported_operators().contains(&operator)
    }
}

impl fmt::Display for ComparisonProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ComparisonProperty::Name => "name",
            ComparisonProperty::Size => "size",
            ComparisonProperty::Date => "date",
            ComparisonProperty::Content => "content",
            ComparisonProperty::Presence => "presence",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConditionOperator {
    Equals,
    NotEquals,
    IsNewerThan,
    IsOlderThan,
    IsBiggerThan,
    IsSmallerThan,
    ExistsOn,
    NotExistsOn,
}

impl fmt::Display for ConditionOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConditionOperator::Equals => "equals",
            ConditionOperator::NotEquals => "not-equals",
            ConditionOperator::IsNewerThan => "is-newer-than",
            ConditionOperator::IsOlderThan => "is-older-than",
            ConditionOperator::IsBiggerThan => "is-bigger-than",
            ConditionOperator::IsSmallerThan => "is-smaller-than",
            ConditionOperator::ExistsOn => "exists-on",
            ConditionOperator::NotExistsOn => "not-exists-on",
        };
        write!(f, "{name}")
    }
}

/// Unit of a literal size, 1024-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SizeUnit {
    #[default]
    B,
    KB,
    MB,
    GB,
    TB,
}

impl SizeUnit {
    pub fn multiplier(&self) -> u64 {
        match self {
            SizeUnit::B => 1,
            SizeUnit::KB => 1 << 10,
            SizeUnit::MB => 1 << 20,
            SizeUnit::GB => 1 << 30,
            SizeUnit::TB => 1 << 40,
        }
    }

    /// Size in bytes, saturating on overflow
    pub fn to_bytes(&self, value: u64) -> u64 {
        value.saturating_mul(self.multiplier())
    }
}

/// Right-hand side of a condition
///
/// Literal sizes and dates act as a "virtual" destination: the item is
/// compared against the literal instead of another data part.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ConditionOperand {
    #[default]
    None,
    DataPart { data_part: DataPart },
    Size { value: u64, unit: SizeUnit },
    DateTime { value: DateTime<Utc> },
    NamePattern { pattern: String },
}

impl ConditionOperand {
    pub fn data_part(&self) -> Option<&DataPart> {
        match self {
            ConditionOperand::DataPart { data_part } => Some(data_part),
            _ => None,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ConditionOperand::None => "none",
            ConditionOperand::DataPart { .. } => "data-part",
            ConditionOperand::Size { .. } => "size",
            ConditionOperand::DateTime { .. } => "date-time",
            ConditionOperand::NamePattern { .. } => "name-pattern",
        }
    }
}

impl fmt::Display for ConditionOperand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionOperand::None => Ok(()),
            ConditionOperand::DataPart { data_part } => write!(f, "{data_part}"),
            ConditionOperand::Size { value, unit } => write!(f, "{value} {unit:?}"),
            ConditionOperand::DateTime { value } => write!(f, "{}", value.to_rfc3339()),
            ConditionOperand::NamePattern { pattern } => write!(f, "\"{pattern}\""),
        }
    }
}

impl From<DataPart> for ConditionOperand {
    fn from(data_part: DataPart) -> Self {
        ConditionOperand::DataPart { data_part }
    }
}

/// One clause of a synchronization rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtomicCondition {
    pub source: DataPart,
    pub property: ComparisonProperty,
    pub operator: ConditionOperator,
    #[serde(default)]
    pub destination: ConditionOperand,
}

impl AtomicCondition {
    pub fn new(
        source: DataPart,
        property: ComparisonProperty,
        operator: ConditionOperator,
        destination: ConditionOperand,
    ) -> Self {
        Self {
            source,
            property,
            operator,
            destination,
        }
    }

    /// Check the operator and operand against the compared property
    ///
    /// # Errors
    ///
    /// `UnsupportedOperator` when the property can't be compared with the
    /// operator, `InvalidCondition` for a missing or mismatched operand and
    /// `InvalidPattern` for a name pattern that does not compile.
    pub fn validate(&self) -> Result<()> {
        if !self.property.supports(self.operator) {
            return Err(Error::UnsupportedOperator {
                property: self.property.to_string(),
                operator: self.operator.to_string(),
            });
        }

        let operand_fits = match (self.property, &self.destination) {
            (ComparisonProperty::Name, ConditionOperand::NamePattern { pattern }) => {
                compile_pattern(pattern)?;
                true
            }
            (ComparisonProperty::Size, ConditionOperand::DataPart { .. })
            | (ComparisonProperty::Size, ConditionOperand::Size { .. })
            | (ComparisonProperty::Date, ConditionOperand::DataPart { .. })
            | (ComparisonProperty::Date, ConditionOperand::DateTime { .. })
            | (ComparisonProperty::Content, ConditionOperand::DataPart { .. })
            | (ComparisonProperty::Presence, ConditionOperand::DataPart { .. })
            | (ComparisonProperty::Presence, ConditionOperand::None) => true,
            _ => false,
        };

        if !operand_fits {
            return Err(Error::InvalidCondition {
                property: self.property.to_string(),
                message: format!("operand of kind {} is not allowed", self.destination.kind()),
            });
        }

        if let Some(destination) = self.destination.data_part()
            && destination == &self.source
        {
            return Err(Error::InvalidCondition {
                property: self.property.to_string(),
                message: format!("source and destination are both {destination}"),
            });
        }

        Ok(())
    }

    /// Data parts referenced by this condition
    pub fn data_parts(&self) -> impl Iterator<Item = &DataPart> {
        std::iter::once(&self.source).chain(self.destination.data_part())
    }
}

impl fmt::Display for AtomicCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.source, self.property, self.operator)?;
        if self.destination != ConditionOperand::None {
            write!(f, " {}", self.destination)?;
        }
        Ok(())
    }
}

/// Compile a case-insensitive name glob
pub(crate) fn compile_pattern(pattern: &str) -> Result<globset::GlobMatcher> {
    GlobBuilder::new(pattern)
        .case_insensitive(true)
        .literal_separator(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|e| Error::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })
}
