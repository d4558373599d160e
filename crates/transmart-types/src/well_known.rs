//! Well-known tranSMART names and codes.
//!
//! # Examples
//!
//! ```
//! use transmart_types::well_known;
//!
//! assert_eq!(well_known::SUBJ_ID, "SUBJ_ID");
//! assert_eq!(well_known::BUILT_IN_DIMENSIONS.len(), 5);
//! ```

use crate::Dimension;

// =============================================================================
// Identifier sources
// =============================================================================

/// Source under which every patient identifier is mapped.
pub const SUBJ_ID: &str = "SUBJ_ID";

/// Source under which every visit identifier is mapped.
pub const VISIT_ID: &str = "VISIT_ID";

// =============================================================================
// Dimensions
// =============================================================================

/// Study dimension.
pub const STUDY_DIMENSION: &str = "study";

/// Concept dimension.
pub const CONCEPT_DIMENSION: &str = "concept";

/// Patient dimension.
pub const PATIENT_DIMENSION: &str = "patient";

/// Start time dimension.
pub const START_TIME_DIMENSION: &str = "start time";

/// Visit dimension.
pub const VISIT_DIMENSION: &str = "visit";

/// Dimensions that exist regardless of the collection, in registration order.
pub const BUILT_IN_DIMENSIONS: [&str; 5] = [
    STUDY_DIMENSION,
    CONCEPT_DIMENSION,
    PATIENT_DIMENSION,
    START_TIME_DIMENSION,
    VISIT_DIMENSION,
];

/// Returns the built-in dimensions as [`Dimension`] values.
pub fn built_in_dimensions() -> Vec<Dimension> {
    BUILT_IN_DIMENSIONS.iter().map(|name| Dimension::new(*name)).collect()
}

// =============================================================================
// Ontology
// =============================================================================

/// Separator between the elements of an ontology path. Paths start and end
/// with it.
pub const PATH_SEPARATOR: char = '\\';

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_built_in_dimension_order() {
        let names: Vec<String> = built_in_dimensions().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["study", "concept", "patient", "start time", "visit"]);
    }
}
