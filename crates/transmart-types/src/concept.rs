//! Concept and modifier types.
//!
//! Concepts classify observations; modifiers classify metadata attached to
//! observations. Both are identified by their code.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use crate::ValueType;

/// A concept to classify observations.
///
/// Two concepts with the same `concept_code` are the same concept,
/// regardless of the other fields.
///
/// # Examples
///
/// ```
/// use transmart_types::{Concept, ValueType};
///
/// let age = Concept::new("test:age", "Age", "\\Test\\age", ValueType::Numeric);
/// let again = Concept::new("test:age", "Age (years)", "\\Test\\age", ValueType::Numeric);
/// assert_eq!(age, again);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Concept {
    /// Unique code for the concept, preferably prefixed with the coding system.
    pub concept_code: String,
    /// Descriptive label.
    pub name: String,
    /// Unique path for the concept. The concept code can be reused for this.
    pub concept_path: String,
    /// Value type of the values associated with the concept.
    pub value_type: ValueType,
}

impl Concept {
    /// Creates a new concept.
    pub fn new(
        concept_code: impl Into<String>,
        name: impl Into<String>,
        concept_path: impl Into<String>,
        value_type: ValueType,
    ) -> Self {
        Self {
            concept_code: concept_code.into(),
            name: name.into(),
            concept_path: concept_path.into(),
            value_type,
        }
    }
}

impl PartialEq for Concept {
    fn eq(&self, other: &Self) -> bool {
        self.concept_code == other.concept_code
    }
}

impl Eq for Concept {}

impl Hash for Concept {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.concept_code.hash(state);
    }
}

/// Metadata type for observations.
///
/// Examples are missing value codes, sample codes or the method of data
/// collection. A modifier can also back an extra [`Dimension`](crate::Dimension).
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Modifier {
    /// Unique code for the metadata type.
    pub modifier_code: String,
    /// Descriptive label.
    pub name: String,
    /// Unique path for the metadata type.
    pub modifier_path: String,
    /// Value type of the metadata values associated with the modifier.
    pub value_type: ValueType,
}

impl Modifier {
    /// Creates a new modifier.
    pub fn new(
        modifier_code: impl Into<String>,
        name: impl Into<String>,
        modifier_path: impl Into<String>,
        value_type: ValueType,
    ) -> Self {
        Self {
            modifier_code: modifier_code.into(),
            name: name.into(),
            modifier_path: modifier_path.into(),
            value_type,
        }
    }
}

impl PartialEq for Modifier {
    fn eq(&self, other: &Self) -> bool {
        self.modifier_code == other.modifier_code
    }
}

impl Eq for Modifier {}

impl Hash for Modifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.modifier_code.hash(state);
    }
}

impl PartialOrd for Modifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Modifier {
    fn cmp(&self, other: &Self) -> Ordering {
        self.modifier_code.cmp(&other.modifier_code)
    }
}
