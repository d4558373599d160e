//! The data collection aggregate.

use std::sync::Arc;

use crate::{
    Concept, Dimension, Modifier, Observation, Ontology, Patient, Relation, RelationType, Study,
    TrialVisit, Visit,
};

/// A data collection that can be loaded into tranSMART.
///
/// Every entity referenced by another entity must also be listed in its own
/// collection: the patient of a visit in `patients`, the study of a trial
/// visit in `studies`, and so on. Relation types and relations are optional
/// and default to empty lists.
#[derive(Debug, Clone, Default)]
pub struct DataCollection {
    /// All concepts linked to observations and tree nodes.
    pub concepts: Vec<Arc<Concept>>,
    /// All modifiers linked to observations and dimensions.
    pub modifiers: Vec<Arc<Modifier>>,
    /// Extra dimensions, based on modifiers.
    pub dimensions: Vec<Dimension>,
    /// All studies linked to trial visits and tree nodes.
    pub studies: Vec<Arc<Study>>,
    /// All trial visits linked to observations.
    pub trial_visits: Vec<Arc<TrialVisit>>,
    /// All visits linked to observations.
    pub visits: Vec<Arc<Visit>>,
    /// The ontology tree and its declared roots.
    pub ontology: Ontology,
    /// All subjects linked to observations, visits and relations.
    pub patients: Vec<Arc<Patient>>,
    /// All observations in the data set.
    pub observations: Vec<Observation>,
    /// All relation types linked to relations.
    pub relation_types: Vec<Arc<RelationType>>,
    /// All relations between subjects.
    pub relations: Vec<Relation>,
}

impl DataCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the collection holds no entities at all.
    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
            && self.modifiers.is_empty()
            && self.dimensions.is_empty()
            && self.studies.is_empty()
            && self.trial_visits.is_empty()
            && self.visits.is_empty()
            && self.ontology.roots().is_empty()
            && self.patients.is_empty()
            && self.observations.is_empty()
            && self.relation_types.is_empty()
            && self.relations.is_empty()
    }
}
