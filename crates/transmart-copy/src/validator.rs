//! Structural validation of a data collection.

use transmart_types::{
    Concept, DataCollection, Dimension, Modifier, NodeId, Observation, Ontology, Patient,
    Relation, RelationType, Study, TrialVisit, Visit,
};

use crate::types::{CopyError, CopyResult};
use crate::visitor::CollectionVisitor;

/// Checks the structure of a collection before anything is written.
///
/// Only the ontology is checked: every declared root must be a real root,
/// i.e. have no parent.
#[derive(Debug, Default)]
pub struct CollectionValidator {
    errors: Vec<String>,
}

impl CollectionValidator {
    /// Validates a collection, failing with every violation found.
    pub fn validate(collection: &DataCollection) -> CopyResult<()> {
        let mut validator = Self::default();
        validator.visit(Some(collection))?;
        if validator.errors.is_empty() {
            return Ok(());
        }
        for error in &validator.errors {
            tracing::error!("{}", error);
        }
        Err(CopyError::StructuralInvalid {
            errors: validator.errors,
        })
    }

    /// Violations found so far.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }
}

impl CollectionVisitor for CollectionValidator {
    fn visit_concept(&mut self, _concept: &Concept) -> CopyResult<()> {
        Ok(())
    }

    fn visit_modifier(&mut self, _modifier: &Modifier) -> CopyResult<()> {
        Ok(())
    }

    fn visit_dimension(&mut self, _dimension: &Dimension) -> CopyResult<()> {
        Ok(())
    }

    fn visit_study(&mut self, _study: &Study) -> CopyResult<()> {
        Ok(())
    }

    fn visit_trial_visit(&mut self, _trial_visit: &TrialVisit) -> CopyResult<()> {
        Ok(())
    }

    fn visit_patient(&mut self, _patient: &Patient) -> CopyResult<()> {
        Ok(())
    }

    fn visit_visit(&mut self, _visit: &Visit) -> CopyResult<()> {
        Ok(())
    }

    fn visit_node(&mut self, ontology: &Ontology, node: NodeId) -> CopyResult<()> {
        let node = ontology.node(node);
        if !node.is_root() {
            self.errors
                .push(format!("Node {} is not a root node", node.name));
        }
        Ok(())
    }

    fn visit_observation(&mut self, _observation: &Observation) -> CopyResult<()> {
        Ok(())
    }

    fn visit_relation_type(&mut self, _relation_type: &RelationType) -> CopyResult<()> {
        Ok(())
    }

    fn visit_relation(&mut self, _relation: &Relation) -> CopyResult<()> {
        Ok(())
    }
}
