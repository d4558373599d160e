//! Serialization of data collections to transmart-copy tables.
//!
//! The writer walks a collection once. Every entity with a natural key gets a
//! 0-based surrogate key the first time it is seen; later encounters write
//! nothing and reuse the key. Entities that refer to other entities look up
//! the surrogate keys of what they refer to, so referenced entities must be
//! visited first (see [`CollectionVisitor::visit`] for the order).
//!
//! ```no_run
//! use transmart_copy::{write_collection, CopyConfig};
//! use transmart_types::DataCollection;
//!
//! let collection = DataCollection::new();
//! let stats = write_collection(&collection, &CopyConfig::new("/tmp/transmart"))?;
//! println!("{} rows written", stats.total_rows());
//! # Ok::<(), transmart_copy::CopyError>(())
//! ```

use std::collections::HashSet;
use std::time::Instant;

use transmart_types::ontology::{NodeId, NodeKind, Ontology, TreeNode};
use transmart_types::well_known::{self, PATH_SEPARATOR, SUBJ_ID, VISIT_ID};
use transmart_types::{
    Concept, DataCollection, Dimension, Modifier, Observation, Patient, Relation, RelationType,
    Study, TrialVisit, Value, Visit,
};

use crate::format::{
    encode_value, format_bool, format_optional, format_optional_timepoint, observation_type_code,
};
use crate::registry::KeyRegistry;
use crate::tables::{prepare_output_dir, OutputTables, Table};
use crate::types::{CopyConfig, CopyError, CopyResult, WriteStats};
use crate::validator::CollectionValidator;
use crate::visitor::CollectionVisitor;

/// Secure object token of all written studies and ontology nodes.
pub const PUBLIC_TOKEN: &str = "PUBLIC";

/// Provider and modifier code of observation rows without a provider or
/// modifier.
pub const NO_VALUE: &str = "@";

/// Encounter number of observations without a visit.
pub const NO_VISIT: i64 = -1;

/// Validates a collection and writes it to `config.output_dir`.
///
/// Nothing is created if the collection is invalid. The output directory is
/// created if absent and must be empty.
pub fn write_collection(collection: &DataCollection, config: &CopyConfig) -> CopyResult<WriteStats> {
    CollectionValidator::validate(collection)?;
    let mut writer = CopyWriter::create(config.clone())?;
    writer.write(collection)?;
    writer.finish()
}

/// Bookkeeping for one write: surrogate keys, seen paths and counters.
#[derive(Debug, Default)]
pub(crate) struct WriteContext {
    concepts: KeyRegistry<String>,
    modifiers: KeyRegistry<String>,
    dimensions: KeyRegistry<String>,
    studies: KeyRegistry<String>,
    trial_visits: KeyRegistry<(String, String)>,
    patients: KeyRegistry<String>,
    visits: KeyRegistry<(String, String)>,
    relation_types: KeyRegistry<String>,
    paths: HashSet<String>,
    tags: HashSet<(String, String)>,
    instance_num: usize,
    stats: WriteStats,
}

impl WriteContext {
    fn patient_num(&self, patient: &Patient) -> CopyResult<usize> {
        self.patients
            .get(patient.identifier.as_str())
            .ok_or_else(|| unresolved("patient", &patient.identifier))
    }

    fn study_num(&self, study: &Study) -> CopyResult<usize> {
        self.studies
            .get(study.study_id.as_str())
            .ok_or_else(|| unresolved("study", &study.study_id))
    }

    fn trial_visit_num(&self, trial_visit: &TrialVisit) -> CopyResult<usize> {
        let key = owned_key(trial_visit.key());
        self.trial_visits
            .get(&key)
            .ok_or_else(|| unresolved("trial visit", &format!("{}/{}", key.0, key.1)))
    }

    /// Looks up a visit under the given patient, not the visit's own.
    fn encounter_num(&self, patient: &Patient, visit: &Visit) -> CopyResult<usize> {
        let key = owned_key((patient.identifier.as_str(), visit.identifier.as_str()));
        self.visits
            .get(&key)
            .ok_or_else(|| unresolved("visit", &format!("{}/{}", key.0, key.1)))
    }

    fn require_concept(&self, concept: &Concept) -> CopyResult<()> {
        if self.concepts.contains(concept.concept_code.as_str()) {
            Ok(())
        } else {
            Err(unresolved("concept", &concept.concept_code))
        }
    }

    fn require_modifier(&self, modifier: &Modifier) -> CopyResult<()> {
        if self.modifiers.contains(modifier.modifier_code.as_str()) {
            Ok(())
        } else {
            Err(unresolved("modifier", &modifier.modifier_code))
        }
    }
}

fn unresolved(kind: &'static str, key: &str) -> CopyError {
    CopyError::UnresolvedReference {
        kind,
        key: key.to_string(),
    }
}

fn owned_key((a, b): (&str, &str)) -> (String, String) {
    (a.to_string(), b.to_string())
}

/// Writes data collections to a fresh transmart-copy directory.
///
/// Create the writer, write one or more collections, then call
/// [`finish`](CopyWriter::finish). Entities shared between collections are
/// written once. If the writer is dropped without finishing, buffered rows
/// are still flushed.
pub struct CopyWriter {
    config: CopyConfig,
    tables: OutputTables,
    context: WriteContext,
    started: Instant,
}

impl CopyWriter {
    /// Prepares the output directory, opens every table and writes the
    /// built-in dimensions.
    pub fn create(config: CopyConfig) -> CopyResult<Self> {
        let started = Instant::now();
        prepare_output_dir(&config.output_dir)?;
        let tables = OutputTables::create(&config.output_dir)?;

        let mut writer = Self {
            config,
            tables,
            context: WriteContext::default(),
            started,
        };
        for dimension in well_known::built_in_dimensions() {
            writer.write_dimension(&dimension)?;
        }
        Ok(writer)
    }

    /// Writes every entity of a collection.
    ///
    /// The collection is not validated; use [`write_collection`] or
    /// [`CollectionValidator::validate`] first.
    pub fn write(&mut self, collection: &DataCollection) -> CopyResult<()> {
        tracing::info!(
            "Writing collection to {}: {} patients, {} observations",
            self.config.output_dir.display(),
            collection.patients.len(),
            collection.observations.len()
        );
        self.visit(Some(collection))
    }

    /// Statistics so far.
    pub fn stats(&self) -> &WriteStats {
        &self.context.stats
    }

    /// Flushes and closes every table.
    pub fn finish(self) -> CopyResult<WriteStats> {
        self.tables.finish()?;
        let mut stats = self.context.stats;
        stats.write_time_ms = self.started.elapsed().as_millis() as u64;

        for table in Table::ALL {
            tracing::debug!("{}: {} rows", table.file_name(), stats.rows(table));
        }
        tracing::info!(
            "Wrote {} rows ({} observations) in {}ms",
            stats.total_rows(),
            stats.observations,
            stats.write_time_ms
        );
        if stats.skipped_nodes > 0 {
            tracing::info!("Skipped {} ontology nodes", stats.skipped_nodes);
        }
        Ok(stats)
    }

    fn emit(&mut self, table: Table, row: Vec<String>) -> CopyResult<()> {
        self.tables.write_row(table, &row)?;
        self.context.stats.record_row(table);
        Ok(())
    }

    fn write_dimension(&mut self, dimension: &Dimension) -> CopyResult<()> {
        if self.context.dimensions.contains(dimension.name.as_str()) {
            return Ok(());
        }
        let (modifier_code, value_type) = match &dimension.modifier {
            Some(modifier) => {
                self.context.require_modifier(modifier)?;
                (
                    modifier.modifier_code.clone(),
                    observation_type_code(modifier.value_type).to_string(),
                )
            }
            None => (String::new(), String::new()),
        };
        let (id, _) = self.context.dimensions.register(dimension.name.clone());
        self.emit(
            Table::Dimensions,
            vec![
                id.to_string(),
                dimension.name.clone(),
                modifier_code,
                value_type,
                format_optional(dimension.dimension_type.map(|t| t.code())),
                format_optional(dimension.sort_index),
            ],
        )
    }

    fn write_study_dimensions(&mut self, study_num: usize) -> CopyResult<()> {
        for dimension_id in self.context.dimensions.values() {
            self.emit(
                Table::StudyDimensions,
                vec![study_num.to_string(), dimension_id.to_string()],
            )?;
        }
        Ok(())
    }

    fn write_mappings(
        &mut self,
        table: Table,
        num: usize,
        identifier: &str,
        implicit_source: &str,
        mappings: &[transmart_types::IdentifierMapping],
    ) -> CopyResult<()> {
        self.emit(
            table,
            vec![identifier.to_string(), implicit_source.to_string(), num.to_string()],
        )?;
        for mapping in mappings.iter().filter(|m| m.source != implicit_source) {
            self.emit(
                table,
                vec![mapping.identifier.clone(), mapping.source.clone(), num.to_string()],
            )?;
        }
        Ok(())
    }

    fn write_tree_node(
        &mut self,
        ontology: &Ontology,
        id: NodeId,
        level: usize,
        parent_path: &str,
        ancestors: &mut Vec<NodeId>,
    ) -> CopyResult<()> {
        let node = ontology.node(id);
        let path = format!("{}{}{}", parent_path, node.name, PATH_SEPARATOR);

        let row = match &node.kind {
            NodeKind::Study(study) => {
                self.context.study_num(study)?;
                study_node_row(node, study, level, &path)
            }
            NodeKind::Concept(concept) => {
                self.context.require_concept(concept)?;
                concept_node_row(node, concept, level, &path)
            }
            NodeKind::Folder if !node.is_leaf() => folder_node_row(node, level, &path),
            NodeKind::Folder => {
                tracing::warn!("Skipping node {}", path);
                self.context.stats.skipped_nodes += 1;
                return Ok(());
            }
        };
        if !self.context.paths.insert(path.clone()) {
            return Ok(());
        }
        if path.chars().count() > self.config.max_path_length {
            tracing::warn!(
                "Path exceeds {} characters: {}",
                self.config.max_path_length,
                path
            );
            self.context.stats.long_paths += 1;
        }

        self.write_tags(node, &path)?;
        self.emit(Table::TreeNodes, row)?;

        ancestors.push(id);
        for &child in &node.children {
            if ancestors.contains(&child) {
                tracing::warn!(
                    "Skipping node {}: it is an ancestor of {}",
                    ontology.node(child).name,
                    path
                );
                continue;
            }
            self.write_tree_node(ontology, child, level + 1, &path, ancestors)?;
        }
        ancestors.pop();
        Ok(())
    }

    fn write_tags(&mut self, node: &TreeNode, path: &str) -> CopyResult<()> {
        let Some(metadata) = &node.metadata else {
            return Ok(());
        };
        for (index, (tag_type, tag)) in metadata.iter().enumerate() {
            if !self
                .context
                .tags
                .insert((path.to_string(), tag_type.clone()))
            {
                continue;
            }
            let tag_id = self.context.tags.len() - 1;
            self.emit(
                Table::Tags,
                vec![
                    tag_id.to_string(),
                    path.to_string(),
                    tag.clone(),
                    tag_type.clone(),
                    index.to_string(),
                    String::new(),
                ],
            )?;
        }
        Ok(())
    }

    fn observation_row(
        &self,
        observation: &Observation,
        modifier_code: &str,
        value: &Value,
        instance_num: usize,
    ) -> CopyResult<Vec<String>> {
        let encounter_num = match &observation.visit {
            Some(visit) => self.context.encounter_num(&observation.patient, visit)? as i64,
            None => NO_VISIT,
        };
        let encoded = encode_value(value);
        Ok(vec![
            encounter_num.to_string(),
            self.context.patient_num(&observation.patient)?.to_string(),
            observation.concept.concept_code.clone(),
            NO_VALUE.to_string(),
            format_optional_timepoint(observation.start_date.as_ref()),
            format_optional_timepoint(observation.end_date.as_ref()),
            modifier_code.to_string(),
            instance_num.to_string(),
            self.context
                .trial_visit_num(&observation.trial_visit)?
                .to_string(),
            encoded.value_type.to_string(),
            encoded.text,
            encoded.number,
            encoded.blob,
        ])
    }
}

fn visual_attributes(node: &TreeNode, kind: char, suffix: char) -> String {
    let shape = if node.is_leaf() { 'L' } else { 'F' };
    [shape, kind, suffix].iter().collect()
}

fn study_node_row(node: &TreeNode, study: &Study, level: usize, path: &str) -> Vec<String> {
    vec![
        level.to_string(),
        path.to_string(),
        node.name.clone(),
        visual_attributes(node, 'A', 'S'),
        String::new(),
        NO_VALUE.to_string(),
        NO_VALUE.to_string(),
        NO_VALUE.to_string(),
        "T".to_string(),
        "=".to_string(),
        study.study_id.clone(),
        PUBLIC_TOKEN.to_string(),
    ]
}

fn concept_node_row(node: &TreeNode, concept: &Concept, level: usize, path: &str) -> Vec<String> {
    vec![
        level.to_string(),
        path.to_string(),
        node.name.clone(),
        visual_attributes(node, 'A', concept.value_type.code()),
        concept.concept_code.clone(),
        "CONCEPT_CD".to_string(),
        "CONCEPT_DIMENSION".to_string(),
        "CONCEPT_PATH".to_string(),
        "T".to_string(),
        "LIKE".to_string(),
        concept.concept_path.clone(),
        PUBLIC_TOKEN.to_string(),
    ]
}

fn folder_node_row(node: &TreeNode, level: usize, path: &str) -> Vec<String> {
    vec![
        level.to_string(),
        path.to_string(),
        node.name.clone(),
        "CA ".to_string(),
        String::new(),
        String::new(),
        String::new(),
        String::new(),
        "T".to_string(),
        "LIKE".to_string(),
        String::new(),
        PUBLIC_TOKEN.to_string(),
    ]
}

impl CollectionVisitor for CopyWriter {
    fn visit_concept(&mut self, concept: &Concept) -> CopyResult<()> {
        let (_, is_new) = self.context.concepts.register(concept.concept_code.clone());
        if !is_new {
            return Ok(());
        }
        self.emit(
            Table::Concepts,
            vec![
                concept.concept_code.clone(),
                concept.concept_path.clone(),
                concept.name.clone(),
            ],
        )
    }

    fn visit_modifier(&mut self, modifier: &Modifier) -> CopyResult<()> {
        let (_, is_new) = self.context.modifiers.register(modifier.modifier_code.clone());
        if !is_new {
            return Ok(());
        }
        self.emit(
            Table::Modifiers,
            vec![
                modifier.modifier_code.clone(),
                modifier.modifier_path.clone(),
                modifier.name.clone(),
            ],
        )
    }

    fn visit_dimension(&mut self, dimension: &Dimension) -> CopyResult<()> {
        self.write_dimension(dimension)
    }

    fn visit_study(&mut self, study: &Study) -> CopyResult<()> {
        if self.context.studies.contains(study.study_id.as_str()) {
            return Ok(());
        }
        let blob = match &study.metadata {
            Some(metadata) => serde_json::to_string(metadata)?,
            None => String::new(),
        };
        let (study_num, _) = self.context.studies.register(study.study_id.clone());
        self.emit(
            Table::Studies,
            vec![
                study_num.to_string(),
                study.study_id.clone(),
                PUBLIC_TOKEN.to_string(),
                blob,
            ],
        )?;
        self.write_study_dimensions(study_num)
    }

    fn visit_trial_visit(&mut self, trial_visit: &TrialVisit) -> CopyResult<()> {
        let key = owned_key(trial_visit.key());
        if self.context.trial_visits.contains(&key) {
            return Ok(());
        }
        let study_num = self.context.study_num(&trial_visit.study)?;
        let (num, _) = self.context.trial_visits.register(key);
        self.emit(
            Table::TrialVisits,
            vec![
                num.to_string(),
                study_num.to_string(),
                format_optional(trial_visit.rel_time_unit.as_ref()),
                format_optional(trial_visit.rel_time),
                trial_visit.rel_time_label.clone(),
            ],
        )
    }

    fn visit_patient(&mut self, patient: &Patient) -> CopyResult<()> {
        let (patient_num, is_new) = self.context.patients.register(patient.identifier.clone());
        if !is_new {
            return Ok(());
        }
        self.emit(
            Table::Patients,
            vec![patient_num.to_string(), patient.sex.clone()],
        )?;
        self.write_mappings(
            Table::PatientMappings,
            patient_num,
            &patient.identifier,
            SUBJ_ID,
            &patient.mappings,
        )
    }

    fn visit_visit(&mut self, visit: &Visit) -> CopyResult<()> {
        let key = owned_key(visit.key());
        if self.context.visits.contains(&key) {
            return Ok(());
        }
        let patient_num = self.context.patient_num(&visit.patient)?;
        let (encounter_num, _) = self.context.visits.register(key);
        self.emit(
            Table::Visits,
            vec![
                encounter_num.to_string(),
                patient_num.to_string(),
                format_optional(visit.active_status.as_ref()),
                format_optional_timepoint(visit.start_date.as_ref()),
                format_optional_timepoint(visit.end_date.as_ref()),
                format_optional(visit.inout.as_ref()),
                format_optional(visit.location.as_ref()),
                String::new(),
                format_optional(visit.length_of_stay),
                String::new(),
            ],
        )?;
        self.write_mappings(
            Table::VisitMappings,
            encounter_num,
            &visit.identifier,
            VISIT_ID,
            &visit.mappings,
        )
    }

    fn visit_node(&mut self, ontology: &Ontology, node: NodeId) -> CopyResult<()> {
        let root = PATH_SEPARATOR.to_string();
        self.write_tree_node(ontology, node, 0, &root, &mut Vec::new())
    }

    fn visit_observation(&mut self, observation: &Observation) -> CopyResult<()> {
        self.context.require_concept(&observation.concept)?;
        if let Some(metadata) = &observation.metadata {
            for (modifier, _) in metadata.iter() {
                self.context.require_modifier(modifier)?;
            }
        }

        let instance_num = self.context.instance_num;
        let mut rows = vec![self.observation_row(
            observation,
            NO_VALUE,
            &observation.value,
            instance_num,
        )?];
        if let Some(metadata) = &observation.metadata {
            for (modifier, value) in metadata.iter() {
                rows.push(self.observation_row(
                    observation,
                    &modifier.modifier_code,
                    value,
                    instance_num,
                )?);
            }
        }
        for row in rows {
            self.emit(Table::Observations, row)?;
        }
        self.context.instance_num += 1;
        self.context.stats.observations += 1;
        Ok(())
    }

    fn visit_relation_type(&mut self, relation_type: &RelationType) -> CopyResult<()> {
        let (id, is_new) = self.context.relation_types.register(relation_type.label.clone());
        if !is_new {
            return Ok(());
        }
        self.emit(
            Table::RelationTypes,
            vec![
                id.to_string(),
                relation_type.label.clone(),
                format_optional(relation_type.description.as_ref()),
                format_bool(relation_type.symmetrical),
                format_bool(relation_type.biological),
            ],
        )
    }

    fn visit_relation(&mut self, relation: &Relation) -> CopyResult<()> {
        let left = self.context.patient_num(&relation.left)?;
        let right = self.context.patient_num(&relation.right)?;
        let relation_type = self
            .context
            .relation_types
            .get(relation.relation_type.label.as_str())
            .ok_or_else(|| unresolved("relation type", &relation.relation_type.label))?;
        self.emit(
            Table::Relations,
            vec![
                left.to_string(),
                relation_type.to_string(),
                right.to_string(),
                format_bool(relation.biological),
                format_bool(relation.share_household),
            ],
        )
    }
}
