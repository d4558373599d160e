//! Family and social relations between subjects.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::Patient;

/// A family or social relationship type, identified by its label.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RelationType {
    /// Short code for the relationship type.
    pub label: String,
    /// Descriptive label.
    pub description: Option<String>,
    /// Whether relations of this type are symmetrical,
    /// e.g. true for siblings, false for parent-of.
    pub symmetrical: Option<bool>,
    /// Whether relations of this type are biological,
    /// e.g. true for twins, false for guardian-of.
    pub biological: Option<bool>,
}

impl RelationType {
    /// Creates a relation type with only a label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            description: None,
            symmetrical: None,
            biological: None,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the symmetrical and biological flags.
    pub fn with_flags(mut self, symmetrical: bool, biological: bool) -> Self {
        self.symmetrical = Some(symmetrical);
        self.biological = Some(biological);
        self
    }
}

impl PartialEq for RelationType {
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label
    }
}

impl Eq for RelationType {}

impl Hash for RelationType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.label.hash(state);
    }
}

/// A binary relation between two subjects.
#[derive(Debug, Clone)]
pub struct Relation {
    /// One of the subjects.
    pub left: Arc<Patient>,
    /// The relationship type.
    pub relation_type: Arc<RelationType>,
    /// The other subject.
    pub right: Arc<Patient>,
    /// Whether the relation is biological, e.g. to tell biological
    /// siblings from non-biological ones.
    pub biological: Option<bool>,
    /// Whether the subjects share a household.
    pub share_household: Option<bool>,
}

impl Relation {
    /// Creates a relation without flags.
    pub fn new(left: Arc<Patient>, relation_type: Arc<RelationType>, right: Arc<Patient>) -> Self {
        Self {
            left,
            relation_type,
            right,
            biological: None,
            share_household: None,
        }
    }

    /// Sets the biological and shared household flags.
    pub fn with_flags(mut self, biological: Option<bool>, share_household: Option<bool>) -> Self {
        self.biological = biological;
        self.share_household = share_household;
        self
    }
}
