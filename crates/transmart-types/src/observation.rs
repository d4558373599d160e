//! Observation types.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::{Concept, Modifier, Patient, Timepoint, TrialVisit, Value, Visit};

/// Metadata about an observation, keyed by modifier.
///
/// Entries iterate in modifier code order. Inserting a value for a modifier
/// that is already present replaces the earlier value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationMetadata {
    values: BTreeMap<Modifier, Value>,
}

impl ObservationMetadata {
    /// Creates empty metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value for a modifier, returning the previous value.
    pub fn insert(&mut self, modifier: Modifier, value: Value) -> Option<Value> {
        self.values.insert(modifier, value)
    }

    /// Builder-style variant of [`insert`](Self::insert).
    pub fn with(mut self, modifier: Modifier, value: Value) -> Self {
        self.values.insert(modifier, value);
        self
    }

    /// Iterates over the entries in modifier code order.
    pub fn iter(&self) -> impl Iterator<Item = (&Modifier, &Value)> {
        self.values.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(Modifier, Value)> for ObservationMetadata {
    fn from_iter<I: IntoIterator<Item = (Modifier, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Data about an observed event or an attribute of a patient.
///
/// Patient, concept and trial visit are mandatory references; the visit is
/// optional. The start date is the moment of observation, not the observed
/// date itself (a birth date belongs in the value).
#[derive(Debug, Clone)]
pub struct Observation {
    /// The patient the observation is about.
    pub patient: Arc<Patient>,
    /// The concept defining the type of observation.
    pub concept: Arc<Concept>,
    /// The visit during which the observation was recorded.
    pub visit: Option<Arc<Visit>>,
    /// The trial visit the observation belongs to.
    pub trial_visit: Arc<TrialVisit>,
    /// Start of the observation.
    pub start_date: Option<Timepoint>,
    /// End of the observation.
    pub end_date: Option<Timepoint>,
    /// The observed value.
    pub value: Value,
    /// Metadata such as a missing value reason or a sample code.
    pub metadata: Option<ObservationMetadata>,
}

impl Observation {
    /// Creates an observation without visit, dates or metadata.
    pub fn new(
        patient: Arc<Patient>,
        concept: Arc<Concept>,
        trial_visit: Arc<TrialVisit>,
        value: Value,
    ) -> Self {
        Self {
            patient,
            concept,
            visit: None,
            trial_visit,
            start_date: None,
            end_date: None,
            value,
            metadata: None,
        }
    }

    /// Attaches a visit.
    pub fn with_visit(mut self, visit: Arc<Visit>) -> Self {
        self.visit = Some(visit);
        self
    }

    /// Sets start and end of the observation.
    pub fn with_period(mut self, start: Option<Timepoint>, end: Option<Timepoint>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    /// Attaches observation metadata.
    pub fn with_metadata(mut self, metadata: ObservationMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}
