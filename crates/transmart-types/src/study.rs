//! Study, study metadata and trial visit types.

use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Variable data types in SPSS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum VariableDataType {
    /// Numeric variable.
    Numeric,
    /// Date variable.
    Date,
    /// Date-time variable.
    DateTime,
    /// String variable.
    String,
}

/// Measure types in SPSS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum Measure {
    /// Unordered categories.
    Nominal,
    /// Ordered categories.
    Ordinal,
    /// Continuous scale.
    Scale,
}

/// A single declared missing value, numeric or textual.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum MissingValue {
    /// Numeric missing value code.
    Number(f64),
    /// Textual missing value code.
    Text(String),
}

/// Missing value declaration of an SPSS variable.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MissingValues {
    /// Lower bound of a missing value range.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub lower: Option<f64>,
    /// Upper bound of a missing value range.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub upper: Option<f64>,
    /// Discrete missing values.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub values: Option<Vec<MissingValue>>,
    /// Single missing value.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub value: Option<MissingValue>,
}

/// Variable metadata used when exporting study data to SPSS.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct VariableMetadata {
    /// SPSS data type.
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub data_type: VariableDataType,
    /// Variable name.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub name: Option<String>,
    /// Measure type.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub measure: Option<Measure>,
    /// Variable description.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub description: Option<String>,
    /// Display width.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub width: Option<u32>,
    /// Number of decimals.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub decimals: Option<u32>,
    /// Column width.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub columns: Option<u32>,
    /// Labels for coded values, keyed by the code as text.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub value_labels: Option<BTreeMap<String, String>>,
    /// Missing value declaration.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub missing_values: Option<MissingValues>,
}

impl VariableMetadata {
    /// Creates variable metadata with only a data type.
    pub fn new(data_type: VariableDataType) -> Self {
        Self {
            data_type,
            name: None,
            measure: None,
            description: None,
            width: None,
            decimals: None,
            columns: None,
            value_labels: None,
            missing_values: None,
        }
    }
}

/// Metadata about a study.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct StudyMetadata {
    /// Map from concept code to variable metadata, enabling study specific
    /// exports of variables and values to SPSS.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub concept_code_to_variable_metadata: Option<BTreeMap<String, VariableMetadata>>,
}

/// A study, identified by its study id.
#[derive(Debug, Clone)]
pub struct Study {
    /// Unique identifier for the study.
    pub study_id: String,
    /// Display label.
    pub name: String,
    /// Optional variable metadata, only used to enable exports to SPSS.
    pub metadata: Option<StudyMetadata>,
}

impl Study {
    /// Creates a study without metadata.
    pub fn new(study_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            study_id: study_id.into(),
            name: name.into(),
            metadata: None,
        }
    }

    /// Attaches study metadata.
    pub fn with_metadata(mut self, metadata: StudyMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

impl PartialEq for Study {
    fn eq(&self, other: &Self) -> bool {
        self.study_id == other.study_id
    }
}

impl Eq for Study {}

impl Hash for Study {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.study_id.hash(state);
    }
}

/// Relative time within a clinical trial.
///
/// `TrialVisit::new(study, "Week 1").with_rel_time("Week", 1)` marks
/// observations in the first week of the trial period. If the data set does
/// not represent a clinical trial, a placeholder such as
/// `TrialVisit::new(study, "NA")` can be used.
///
/// A trial visit is identified by its study and label.
#[derive(Debug, Clone)]
pub struct TrialVisit {
    /// The study the trial visit belongs to.
    pub study: Arc<Study>,
    /// Display label.
    pub rel_time_label: String,
    /// Unit of the relative time, e.g. `hour` or `week`.
    pub rel_time_unit: Option<String>,
    /// Value of the relative time.
    pub rel_time: Option<i32>,
}

impl TrialVisit {
    /// Creates a trial visit with only a label.
    pub fn new(study: Arc<Study>, rel_time_label: impl Into<String>) -> Self {
        Self {
            study,
            rel_time_label: rel_time_label.into(),
            rel_time_unit: None,
            rel_time: None,
        }
    }

    /// Sets the relative time unit and value.
    pub fn with_rel_time(mut self, unit: impl Into<String>, rel_time: i32) -> Self {
        self.rel_time_unit = Some(unit.into());
        self.rel_time = Some(rel_time);
        self
    }

    /// Returns the natural key `(study_id, rel_time_label)`.
    pub fn key(&self) -> (&str, &str) {
        (self.study.study_id.as_str(), self.rel_time_label.as_str())
    }
}

impl PartialEq for TrialVisit {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for TrialVisit {}

impl Hash for TrialVisit {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}
