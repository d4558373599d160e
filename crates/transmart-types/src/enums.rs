//! tranSMART enumeration types.
//!
//! This module provides enum representations for the coded values used in
//! a data collection: the value type of concepts and observations, and the
//! type of an extra dimension.

use std::fmt;
use std::str::FromStr;

/// Type of an observed value.
///
/// # Examples
///
/// ```
/// use transmart_types::ValueType;
///
/// let value_type: ValueType = "C".parse().unwrap();
/// assert_eq!(value_type, ValueType::Categorical);
/// assert_eq!(value_type.code(), 'C');
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValueType {
    /// Numerical value.
    Numeric,
    /// Categorical value, one of a limited set of labels.
    Categorical,
    /// Free text value.
    Text,
    /// Date or date-time value.
    Date,
}

impl ValueType {
    /// All supported value types.
    pub const ALL: [ValueType; 4] = [
        ValueType::Numeric,
        ValueType::Categorical,
        ValueType::Text,
        ValueType::Date,
    ];

    /// Creates a ValueType from its one-letter code.
    ///
    /// Returns `None` if the code doesn't match a supported value type.
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'N' => Some(Self::Numeric),
            'C' => Some(Self::Categorical),
            'T' => Some(Self::Text),
            'D' => Some(Self::Date),
            _ => None,
        }
    }

    /// Returns the one-letter code of this value type.
    ///
    /// This is the code used in ontology visual attributes.
    pub fn code(self) -> char {
        match self {
            Self::Numeric => 'N',
            Self::Categorical => 'C',
            Self::Text => 'T',
            Self::Date => 'D',
        }
    }

    /// Returns the display name of this value type.
    pub fn name(self) -> &'static str {
        match self {
            Self::Numeric => "Numeric",
            Self::Categorical => "Categorical",
            Self::Text => "Text",
            Self::Date => "Date",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a value type code or name is not supported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseValueTypeError {
    /// The rejected input.
    pub value: String,
}

impl fmt::Display for ParseValueTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value type not supported: {}", self.value)
    }
}

impl std::error::Error for ParseValueTypeError {}

impl FromStr for ValueType {
    type Err = ParseValueTypeError;

    /// Parses a value type from its one-letter code or its name
    /// (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if let Some(value_type) = Self::from_code(c.to_ascii_uppercase()) {
                return Ok(value_type);
            }
        }
        Self::ALL
            .into_iter()
            .find(|value_type| value_type.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseValueTypeError {
                value: s.to_string(),
            })
    }
}

/// Type of a dimension.
///
/// Subject dimensions can be used for subselection, attribute dimensions
/// only appear as additional dimension in the retrieved data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DimensionType {
    /// Dimension usable for subject selection.
    Subject,
    /// Dimension that only annotates observations.
    Attribute,
}

impl DimensionType {
    /// Code for subject dimensions.
    pub const SUBJECT_CODE: &'static str = "SUBJECT";
    /// Code for attribute dimensions.
    pub const ATTRIBUTE_CODE: &'static str = "ATTRIBUTE";

    /// Creates a DimensionType from its code.
    ///
    /// Returns `None` if the code is not recognized.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            Self::SUBJECT_CODE => Some(Self::Subject),
            Self::ATTRIBUTE_CODE => Some(Self::Attribute),
            _ => None,
        }
    }

    /// Returns the code for this dimension type.
    pub fn code(self) -> &'static str {
        match self {
            Self::Subject => Self::SUBJECT_CODE,
            Self::Attribute => Self::ATTRIBUTE_CODE,
        }
    }
}

impl fmt::Display for DimensionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_type_code_conversion() {
        for value_type in ValueType::ALL {
            assert_eq!(ValueType::from_code(value_type.code()), Some(value_type));
        }
        assert_eq!(ValueType::from_code('X'), None);
        assert_eq!(ValueType::Text.code(), 'T');
    }

    #[test]
    fn test_value_type_from_str() {
        assert_eq!("N".parse::<ValueType>(), Ok(ValueType::Numeric));
        assert_eq!("d".parse::<ValueType>(), Ok(ValueType::Date));
        assert_eq!("categorical".parse::<ValueType>(), Ok(ValueType::Categorical));
        assert_eq!(" Text ".parse::<ValueType>(), Ok(ValueType::Text));

        let err = "Blob".parse::<ValueType>().unwrap_err();
        assert_eq!(err.value, "Blob");
        assert_eq!(err.to_string(), "Value type not supported: Blob");
    }

    #[test]
    fn test_dimension_type_conversion() {
        assert_eq!(
            DimensionType::from_code("SUBJECT"),
            Some(DimensionType::Subject)
        );
        assert_eq!(
            DimensionType::from_code("ATTRIBUTE"),
            Some(DimensionType::Attribute)
        );
        assert_eq!(DimensionType::from_code("subject"), None);
        assert_eq!(DimensionType::Attribute.to_string(), "ATTRIBUTE");
    }
}
