//! # transmart-types
//!
//! Data model for tranSMART clinical data collections.
//!
//! This crate provides the entities that make up a [`DataCollection`]:
//! concepts, modifiers, dimensions, studies, trial visits, patients, visits,
//! observations, the ontology tree, and relations between subjects. It does
//! no I/O; serialization to transmart-copy files lives in `transmart-copy`.
//!
//! Entities with a natural key (concept code, patient identifier, ...)
//! compare and hash by that key only, so two instances with the same key are
//! the same entity.
//!
//! ## Features
//!
//! - `serde` (default): Enables serialization/deserialization support via serde.
//!   Required for writing study metadata blobs.
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use transmart_types::{
//!     Concept, DataCollection, Observation, Patient, Study, TrialVisit, Value, ValueType,
//! };
//!
//! let concept = Arc::new(Concept::new("test:age", "Age", "\\Test\\age", ValueType::Numeric));
//! let study = Arc::new(Study::new("test", "Test study"));
//! let trial_visit = Arc::new(TrialVisit::new(study.clone(), "Week 1").with_rel_time("Week", 1));
//! let patient = Arc::new(Patient::new("SUBJ0", "male"));
//!
//! let mut collection = DataCollection::new();
//! collection.observations.push(Observation::new(
//!     patient.clone(),
//!     concept.clone(),
//!     trial_visit.clone(),
//!     Value::numeric(28.0),
//! ));
//! collection.concepts.push(concept);
//! collection.studies.push(study);
//! collection.trial_visits.push(trial_visit);
//! collection.patients.push(patient);
//!
//! assert!(!collection.is_empty());
//! ```

#![warn(missing_docs)]

mod collection;
mod concept;
mod dimension;
mod enums;
mod observation;
pub mod ontology;
mod patient;
mod relation;
mod study;
mod value;
pub mod well_known;

// Re-export all public types at crate root
pub use collection::DataCollection;
pub use concept::{Concept, Modifier};
pub use dimension::Dimension;
pub use enums::{DimensionType, ParseValueTypeError, ValueType};
pub use observation::{Observation, ObservationMetadata};
pub use ontology::{NodeId, NodeKind, Ontology, TreeNode};
pub use patient::{IdentifierMapping, Patient, Visit};
pub use relation::{Relation, RelationType};
pub use study::{
    Measure, MissingValue, MissingValues, Study, StudyMetadata, TrialVisit, VariableDataType,
    VariableMetadata,
};
pub use value::{Timepoint, Value};

// Re-export chrono so producers use the same version for dates
pub use chrono;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_types_are_exported() {
        // Verify all types are accessible from crate root
        let _value_type = ValueType::Date;
        let _dimension_type = DimensionType::Subject;
        let _kind = NodeKind::Folder;
        let _mapping = IdentifierMapping::new(well_known::SUBJ_ID, "SUBJ0");
        let _measure = Measure::Nominal;
    }

    #[test]
    fn test_well_known_accessible() {
        assert_eq!(well_known::VISIT_ID, "VISIT_ID");
        assert_eq!(well_known::PATH_SEPARATOR, '\\');
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_roundtrip() {
        let concept = Concept::new("test:diagnosis", "Diagnosis", "\\Test\\diagnosis", ValueType::Categorical);

        let json = serde_json::to_string(&concept).unwrap();
        let parsed: Concept = serde_json::from_str(&json).unwrap();
        assert_eq!(concept, parsed);
        assert_eq!(parsed.value_type, ValueType::Categorical);
    }
}
