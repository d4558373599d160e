//! Observed values and points in time.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::ValueType;

/// A date or a UTC date-time.
///
/// Date-times in any time zone convert into UTC on construction, so every
/// timepoint has a single unambiguous position on the time line. Date-only
/// values are interpreted as midnight UTC when a timestamp is needed.
///
/// # Examples
///
/// ```
/// use chrono::{FixedOffset, NaiveDate, TimeZone};
/// use transmart_types::Timepoint;
///
/// let amsterdam = FixedOffset::east_opt(2 * 3600).unwrap();
/// let local = amsterdam.with_ymd_and_hms(2019, 6, 28, 13, 2, 58).unwrap();
/// let point = Timepoint::from(local);
/// assert_eq!(point.to_datetime().to_rfc3339(), "2019-06-28T11:02:58+00:00");
///
/// let day = Timepoint::from(NaiveDate::from_ymd_opt(1970, 1, 2).unwrap());
/// assert_eq!(day.timestamp_millis(), 86_400_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Timepoint {
    /// Calendar date without time of day.
    Date(NaiveDate),
    /// Date and time in UTC.
    DateTime(DateTime<Utc>),
}

impl Timepoint {
    /// Returns the timepoint as a UTC date-time, using midnight for dates.
    pub fn to_datetime(&self) -> DateTime<Utc> {
        match self {
            Self::Date(date) => Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)),
            Self::DateTime(datetime) => *datetime,
        }
    }

    /// Returns milliseconds since the Unix epoch.
    pub fn timestamp_millis(&self) -> i64 {
        self.to_datetime().timestamp_millis()
    }

    /// Returns true if this is a date without time of day.
    pub fn is_date_only(&self) -> bool {
        matches!(self, Self::Date(_))
    }
}

impl From<NaiveDate> for Timepoint {
    fn from(date: NaiveDate) -> Self {
        Self::Date(date)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Timepoint {
    fn from(datetime: DateTime<Tz>) -> Self {
        Self::DateTime(datetime.with_timezone(&Utc))
    }
}

/// An observed value.
///
/// Exactly one variant is active and it determines the [`ValueType`]. The
/// inner option represents a value that was observed to be absent.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    /// Numerical value.
    Numeric(Option<f64>),
    /// Categorical value.
    Categorical(Option<String>),
    /// Free text value.
    Text(Option<String>),
    /// Date or date-time value.
    Date(Option<Timepoint>),
}

impl Value {
    /// Creates a numerical value.
    pub fn numeric(value: f64) -> Self {
        Self::Numeric(Some(value))
    }

    /// Creates a categorical value.
    pub fn categorical(value: impl Into<String>) -> Self {
        Self::Categorical(Some(value.into()))
    }

    /// Creates a text value.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(Some(value.into()))
    }

    /// Creates a date value.
    pub fn date(value: impl Into<Timepoint>) -> Self {
        Self::Date(Some(value.into()))
    }

    /// Returns the type tag of this value.
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Numeric(_) => ValueType::Numeric,
            Self::Categorical(_) => ValueType::Categorical,
            Self::Text(_) => ValueType::Text,
            Self::Date(_) => ValueType::Date,
        }
    }

    /// Returns true if the value is observed to be absent.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Numeric(v) => v.is_none(),
            Self::Categorical(v) | Self::Text(v) => v.is_none(),
            Self::Date(v) => v.is_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_value_type_tags() {
        assert_eq!(Value::numeric(28.0).value_type(), ValueType::Numeric);
        assert_eq!(Value::categorical("Influenza").value_type(), ValueType::Categorical);
        assert_eq!(Value::text("long text").value_type(), ValueType::Text);
        assert_eq!(Value::Date(None).value_type(), ValueType::Date);
        assert!(Value::Date(None).is_empty());
        assert!(!Value::numeric(0.0).is_empty());
    }

    #[test]
    fn test_timepoint_normalizes_to_utc() {
        let offset = FixedOffset::west_opt(5 * 3600).unwrap();
        let local = offset.with_ymd_and_hms(2019, 6, 28, 20, 0, 0).unwrap();
        let point = Timepoint::from(local);

        assert!(!point.is_date_only());
        assert_eq!(
            point.to_datetime(),
            Utc.with_ymd_and_hms(2019, 6, 29, 1, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_date_is_midnight_utc() {
        let date = NaiveDate::from_ymd_opt(2019, 6, 28).unwrap();
        let point = Timepoint::from(date);

        assert!(point.is_date_only());
        assert_eq!(
            point.timestamp_millis(),
            Utc.with_ymd_and_hms(2019, 6, 28, 0, 0, 0)
                .unwrap()
                .timestamp_millis()
        );
    }
}
