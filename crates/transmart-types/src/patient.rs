//! Patient and visit types.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::Timepoint;

/// A patient or visit identifier in a source system.
///
/// The combination of source and identifier must be unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IdentifierMapping {
    /// The source system the identifier originates from.
    pub source: String,
    /// The identifier in the source system.
    pub identifier: String,
}

impl IdentifierMapping {
    /// Creates a new identifier mapping.
    pub fn new(source: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            identifier: identifier.into(),
        }
    }
}

/// Subject properties.
///
/// The identifier always appears in the identifier mapping table with source
/// [`SUBJ_ID`](crate::well_known::SUBJ_ID), next to any explicit mappings.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Patient {
    /// Unique identifier for the subject.
    pub identifier: String,
    /// Sex of the subject. Interpreted case-insensitively, `m`/`f` or
    /// `male`/`female`; other values mean unknown.
    pub sex: String,
    /// Additional identifiers for the subject.
    pub mappings: Vec<IdentifierMapping>,
}

impl Patient {
    /// Creates a patient without additional identifiers.
    pub fn new(identifier: impl Into<String>, sex: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            sex: sex.into(),
            mappings: Vec::new(),
        }
    }

    /// Adds an identifier in another source system.
    pub fn with_mapping(mut self, mapping: IdentifierMapping) -> Self {
        self.mappings.push(mapping);
        self
    }
}

impl PartialEq for Patient {
    fn eq(&self, other: &Self) -> bool {
        self.identifier == other.identifier
    }
}

impl Eq for Patient {}

impl Hash for Patient {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identifier.hash(state);
    }
}

/// A clinical encounter of a patient.
///
/// Visits are identified by patient identifier and visit identifier. The
/// visit identifier always appears in the identifier mapping table with
/// source [`VISIT_ID`](crate::well_known::VISIT_ID).
#[derive(Debug, Clone)]
pub struct Visit {
    /// The patient.
    pub patient: Arc<Patient>,
    /// Identifier of the visit.
    pub identifier: String,
    /// Status of the event, together with the precision of the dates.
    pub active_status: Option<String>,
    /// Start of the visit.
    pub start_date: Option<Timepoint>,
    /// End of the visit.
    pub end_date: Option<Timepoint>,
    /// Code for the type of visit.
    pub inout: Option<String>,
    /// Location code.
    pub location: Option<String>,
    /// Duration of the visit.
    pub length_of_stay: Option<i64>,
    /// Additional identifiers for the visit.
    pub mappings: Vec<IdentifierMapping>,
}

impl Visit {
    /// Creates a visit with only a patient and identifier.
    pub fn new(patient: Arc<Patient>, identifier: impl Into<String>) -> Self {
        Self {
            patient,
            identifier: identifier.into(),
            active_status: None,
            start_date: None,
            end_date: None,
            inout: None,
            location: None,
            length_of_stay: None,
            mappings: Vec::new(),
        }
    }

    /// Sets the start and end of the visit.
    pub fn with_period(mut self, start: Option<Timepoint>, end: Option<Timepoint>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    /// Adds an identifier in another source system.
    pub fn with_mapping(mut self, mapping: IdentifierMapping) -> Self {
        self.mappings.push(mapping);
        self
    }

    /// Returns the natural key `(patient identifier, visit identifier)`.
    pub fn key(&self) -> (&str, &str) {
        (self.patient.identifier.as_str(), self.identifier.as_str())
    }
}

impl PartialEq for Visit {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Visit {}

impl Hash for Visit {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}
