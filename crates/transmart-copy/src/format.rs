//! Field formatting for output rows.
//!
//! Every column is written as text. Absent values become an empty field.

use chrono::Timelike;
use transmart_types::{Timepoint, Value, ValueType};

/// Date format for date-only values.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Date-time format, without the sub-second part.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Formats a timepoint.
///
/// Dates render as `YYYY-MM-DD`. Date-times render in UTC as
/// `YYYY-MM-DD HH:MM:SS`, followed by `.ffffff` only when the sub-second part
/// is non-zero.
///
/// # Examples
///
/// ```
/// use chrono::{NaiveDate, TimeZone, Utc};
/// use transmart_copy::format::format_timepoint;
/// use transmart_types::Timepoint;
///
/// let day = Timepoint::from(NaiveDate::from_ymd_opt(2019, 6, 28).unwrap());
/// assert_eq!(format_timepoint(&day), "2019-06-28");
///
/// let moment = Timepoint::from(Utc.with_ymd_and_hms(2019, 6, 28, 13, 2, 58).unwrap());
/// assert_eq!(format_timepoint(&moment), "2019-06-28 13:02:58");
/// ```
pub fn format_timepoint(timepoint: &Timepoint) -> String {
    match timepoint {
        Timepoint::Date(date) => date.format(DATE_FORMAT).to_string(),
        Timepoint::DateTime(datetime) => {
            let micros = datetime.nanosecond() % 1_000_000_000 / 1_000;
            if micros == 0 {
                datetime.format(DATE_TIME_FORMAT).to_string()
            } else {
                format!("{}.{:06}", datetime.format(DATE_TIME_FORMAT), micros)
            }
        }
    }
}

/// Formats an optional timepoint, empty when absent.
pub fn format_optional_timepoint(timepoint: Option<&Timepoint>) -> String {
    timepoint.map(format_timepoint).unwrap_or_default()
}

/// Formats a boolean as `t` or `f`, empty when absent.
pub fn format_bool(value: Option<bool>) -> String {
    match value {
        Some(true) => "t".to_string(),
        Some(false) => "f".to_string(),
        None => String::new(),
    }
}

/// Formats an optional displayable value, empty when absent.
pub fn format_optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Observation value type code (`valtype_cd`).
///
/// This differs from the visual attribute code of concept nodes: categorical
/// values are stored as text (`T`) and text values as blobs (`B`).
pub fn observation_type_code(value_type: ValueType) -> &'static str {
    match value_type {
        ValueType::Numeric => "N",
        ValueType::Categorical => "T",
        ValueType::Text => "B",
        ValueType::Date => "D",
    }
}

/// The value columns of an observation row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EncodedValue {
    /// `valtype_cd`
    pub value_type: &'static str,
    /// `tval_char`
    pub text: String,
    /// `nval_num`
    pub number: String,
    /// `observation_blob`
    pub blob: String,
}

/// Spreads a value over the value columns of an observation row.
///
/// Numeric values go to `nval_num`, categorical values to `tval_char`, text
/// to `observation_blob`. Dates go to `nval_num` as milliseconds since the
/// Unix epoch, with date-only values taken at midnight UTC. Infinite and
/// NaN numbers cannot be loaded into a numeric column and are left empty.
pub fn encode_value(value: &Value) -> EncodedValue {
    let mut encoded = EncodedValue {
        value_type: observation_type_code(value.value_type()),
        ..Default::default()
    };
    match value {
        Value::Numeric(Some(number)) if !number.is_finite() => {
            tracing::warn!("Non-finite numeric value {} written as empty", number);
        }
        Value::Numeric(number) => encoded.number = format_optional(*number),
        Value::Categorical(text) => encoded.text = text.clone().unwrap_or_default(),
        Value::Text(blob) => encoded.blob = blob.clone().unwrap_or_default(),
        Value::Date(date) => {
            encoded.number = format_optional(date.as_ref().map(Timepoint::timestamp_millis))
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};

    fn make_datetime(micros: u32) -> Timepoint {
        let datetime = Utc
            .with_ymd_and_hms(2019, 6, 28, 13, 2, 58)
            .unwrap()
            .with_nanosecond(micros * 1_000)
            .unwrap();
        Timepoint::from(datetime)
    }

    #[test]
    fn test_format_date() {
        let day = Timepoint::from(NaiveDate::from_ymd_opt(2019, 6, 28).unwrap());
        assert_eq!(format_timepoint(&day), "2019-06-28");
    }

    #[test]
    fn test_format_datetime_sub_seconds() {
        assert_eq!(format_timepoint(&make_datetime(0)), "2019-06-28 13:02:58");
        assert_eq!(
            format_timepoint(&make_datetime(12_345)),
            "2019-06-28 13:02:58.012345"
        );
    }

    #[test]
    fn test_format_datetime_with_offset() {
        let amsterdam = FixedOffset::east_opt(2 * 3600).unwrap();
        let local = amsterdam.with_ymd_and_hms(2019, 6, 28, 13, 2, 58).unwrap();
        assert_eq!(format_timepoint(&Timepoint::from(local)), "2019-06-28 11:02:58");
    }

    #[test]
    fn test_format_absent() {
        assert_eq!(format_optional_timepoint(None), "");
        assert_eq!(format_optional::<i32>(None), "");
        assert_eq!(format_optional(Some(3)), "3");
        assert_eq!(format_bool(Some(true)), "t");
        assert_eq!(format_bool(Some(false)), "f");
        assert_eq!(format_bool(None), "");
    }

    #[test]
    fn test_encode_numeric() {
        let encoded = encode_value(&Value::numeric(28.5));
        assert_eq!(encoded.value_type, "N");
        assert_eq!(encoded.number, "28.5");
        assert_eq!(encoded.text, "");
        assert_eq!(encoded.blob, "");
    }

    #[test]
    fn test_encode_non_finite_numeric() {
        for number in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            let encoded = encode_value(&Value::numeric(number));
            assert_eq!(encoded.value_type, "N");
            assert_eq!(encoded.number, "");
        }
    }

    #[test]
    fn test_encode_categorical_and_text() {
        let encoded = encode_value(&Value::categorical("Influenza"));
        assert_eq!(encoded.value_type, "T");
        assert_eq!(encoded.text, "Influenza");
        assert_eq!(encoded.number, "");

        let encoded = encode_value(&Value::text("Lorem ipsum"));
        assert_eq!(encoded.value_type, "B");
        assert_eq!(encoded.blob, "Lorem ipsum");
        assert_eq!(encoded.text, "");
    }

    #[test]
    fn test_encode_date() {
        let day = NaiveDate::from_ymd_opt(2019, 6, 28).unwrap();
        let encoded = encode_value(&Value::date(day));
        assert_eq!(encoded.value_type, "D");
        assert_eq!(encoded.number, "1561680000000");

        let moment = Utc.with_ymd_and_hms(2019, 6, 28, 13, 2, 58).unwrap();
        let encoded = encode_value(&Value::date(moment));
        assert_eq!(encoded.number, "1561726978000");
    }

    #[test]
    fn test_encode_missing_value() {
        let encoded = encode_value(&Value::Numeric(None));
        assert_eq!(encoded.value_type, "N");
        assert_eq!(encoded.number, "");

        let encoded = encode_value(&Value::Date(None));
        assert_eq!(encoded.value_type, "D");
        assert_eq!(encoded.number, "");
    }
}
