//! Traversal of a data collection.

use transmart_types::{
    Concept, DataCollection, Dimension, Modifier, NodeId, Observation, Ontology, Patient,
    Relation, RelationType, Study, TrialVisit, Visit,
};

use crate::types::CopyResult;

/// Receives every entity of a data collection, one kind at a time.
///
/// [`visit`](CollectionVisitor::visit) drives the walk in a fixed order:
/// concepts, modifiers, dimensions, studies, trial visits, patients, visits,
/// ontology roots, observations, relation types and relations. Entities
/// within a kind are visited in collection order. The first error stops the
/// walk.
pub trait CollectionVisitor {
    /// Visits a concept.
    fn visit_concept(&mut self, concept: &Concept) -> CopyResult<()>;

    /// Visits a modifier.
    fn visit_modifier(&mut self, modifier: &Modifier) -> CopyResult<()>;

    /// Visits a dimension.
    fn visit_dimension(&mut self, dimension: &Dimension) -> CopyResult<()>;

    /// Visits a study.
    fn visit_study(&mut self, study: &Study) -> CopyResult<()>;

    /// Visits a trial visit.
    fn visit_trial_visit(&mut self, trial_visit: &TrialVisit) -> CopyResult<()>;

    /// Visits a patient.
    fn visit_patient(&mut self, patient: &Patient) -> CopyResult<()>;

    /// Visits a visit.
    fn visit_visit(&mut self, visit: &Visit) -> CopyResult<()>;

    /// Visits a declared root of the ontology. Descendants are not visited
    /// by the driver.
    fn visit_node(&mut self, ontology: &Ontology, node: NodeId) -> CopyResult<()>;

    /// Visits an observation.
    fn visit_observation(&mut self, observation: &Observation) -> CopyResult<()>;

    /// Visits a relation type.
    fn visit_relation_type(&mut self, relation_type: &RelationType) -> CopyResult<()>;

    /// Visits a relation.
    fn visit_relation(&mut self, relation: &Relation) -> CopyResult<()>;

    /// Walks the collection. Does nothing when there is no collection.
    fn visit(&mut self, collection: Option<&DataCollection>) -> CopyResult<()> {
        let Some(collection) = collection else {
            return Ok(());
        };
        for concept in &collection.concepts {
            self.visit_concept(concept)?;
        }
        for modifier in &collection.modifiers {
            self.visit_modifier(modifier)?;
        }
        for dimension in &collection.dimensions {
            self.visit_dimension(dimension)?;
        }
        for study in &collection.studies {
            self.visit_study(study)?;
        }
        for trial_visit in &collection.trial_visits {
            self.visit_trial_visit(trial_visit)?;
        }
        for patient in &collection.patients {
            self.visit_patient(patient)?;
        }
        for visit in &collection.visits {
            self.visit_visit(visit)?;
        }
        for &root in collection.ontology.roots() {
            self.visit_node(&collection.ontology, root)?;
        }
        for observation in &collection.observations {
            self.visit_observation(observation)?;
        }
        for relation_type in &collection.relation_types {
            self.visit_relation_type(relation_type)?;
        }
        for relation in &collection.relations {
            self.visit_relation(relation)?;
        }
        Ok(())
    }
}
