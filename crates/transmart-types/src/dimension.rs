//! Dimension metadata.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::{DimensionType, Modifier};

/// Dimension metadata.
///
/// Next to the built-in study, concept, patient, start time and visit
/// dimensions (see [`well_known::BUILT_IN_DIMENSIONS`](crate::well_known::BUILT_IN_DIMENSIONS)),
/// extra dimensions can be declared. To add one, create a [`Modifier`], add a
/// dimension linked to the modifier, and attach metadata values to
/// observations using the modifier as key.
///
/// Dimensions are identified by name.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use transmart_types::{Dimension, DimensionType, Modifier, ValueType};
///
/// let sample = Arc::new(Modifier::new("SAMPLE", "Sample", "\\sample", ValueType::Categorical));
/// let dimension = Dimension::new("sample")
///     .with_modifier(sample)
///     .with_dimension_type(DimensionType::Attribute)
///     .with_sort_index(2);
///
/// assert_eq!(dimension.modifier_code(), Some("SAMPLE"));
/// ```
#[derive(Debug, Clone)]
pub struct Dimension {
    /// Name of the dimension.
    pub name: String,
    /// Modifier used as key to add a dimension value to an observation.
    pub modifier: Option<Arc<Modifier>>,
    /// Dimension type.
    pub dimension_type: Option<DimensionType>,
    /// Display order of subject dimensions.
    pub sort_index: Option<i32>,
}

impl Dimension {
    /// Creates a dimension with only a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modifier: None,
            dimension_type: None,
            sort_index: None,
        }
    }

    /// Sets the modifier backing this dimension.
    pub fn with_modifier(mut self, modifier: Arc<Modifier>) -> Self {
        self.modifier = Some(modifier);
        self
    }

    /// Sets the dimension type.
    pub fn with_dimension_type(mut self, dimension_type: DimensionType) -> Self {
        self.dimension_type = Some(dimension_type);
        self
    }

    /// Sets the sort index.
    pub fn with_sort_index(mut self, sort_index: i32) -> Self {
        self.sort_index = Some(sort_index);
        self
    }

    /// Returns the code of the backing modifier, if any.
    pub fn modifier_code(&self) -> Option<&str> {
        self.modifier.as_deref().map(|m| m.modifier_code.as_str())
    }
}

impl PartialEq for Dimension {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Dimension {}

impl Hash for Dimension {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}
