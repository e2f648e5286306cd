//! Bind values and result rows
//!
//! `SqlValue` is the only currency between the mapping layer and storage.
//! Query-string input is coerced into it before binding; rows come back as
//! ordered lists of it.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::field::parse_timestamp;

/// A value bound to a placeholder or read from a result column
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl SqlValue {
    /// Coerces raw query-string input: integer, else finite float, else text.
    pub fn coerce(raw: &str) -> Self {
        if let Ok(value) = raw.parse::<i64>() {
            return SqlValue::Integer(value);
        }
        if let Ok(value) = raw.parse::<f64>() {
            if value.is_finite() {
                return SqlValue::Real(value);
            }
        }
        SqlValue::Text(raw.to_string())
    }

    /// Coerces input compared against a timestamp column.
    ///
    /// Parseable timestamps become `Timestamp`, so drivers bind them in the
    /// same form they store; anything else falls back to [`SqlValue::coerce`].
    pub fn coerce_timestamp(raw: &str) -> Self {
        match parse_timestamp(raw) {
            Ok(value) => SqlValue::Timestamp(value),
            Err(_) => Self::coerce(raw),
        }
    }

    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            SqlValue::Null => "null",
            SqlValue::Integer(_) => "integer",
            SqlValue::Real(_) => "real",
            SqlValue::Text(_) => "text",
            SqlValue::Timestamp(_) => "timestamp",
        }
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Integer(value)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Real(value)
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<DateTime<Utc>> for SqlValue {
    fn from(value: DateTime<Utc>) -> Self {
        SqlValue::Timestamp(value)
    }
}

/// One result row, columns in SELECT-list order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    values: Vec<SqlValue>,
}

impl Row {
    pub fn new(values: Vec<SqlValue>) -> Self {
        Self { values }
    }

    /// Number of columns in the row
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SqlValue> {
        self.values.get(index)
    }

    pub fn into_values(self) -> Vec<SqlValue> {
        self.values
    }
}

impl From<Vec<SqlValue>> for Row {
    fn from(values: Vec<SqlValue>) -> Self {
        Self::new(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_integer() {
        assert_eq!(SqlValue::coerce("25"), SqlValue::Integer(25));
        assert_eq!(SqlValue::coerce("-3"), SqlValue::Integer(-3));
    }

    #[test]
    fn test_coerce_float() {
        assert_eq!(SqlValue::coerce("2.5"), SqlValue::Real(2.5));
    }

    #[test]
    fn test_coerce_text() {
        assert_eq!(
            SqlValue::coerce("Test Event"),
            SqlValue::Text("Test Event".to_string())
        );
        assert_eq!(SqlValue::coerce(""), SqlValue::Text(String::new()));
    }

    #[test]
    fn test_non_finite_stays_text() {
        assert_eq!(SqlValue::coerce("NaN"), SqlValue::Text("NaN".to_string()));
        assert_eq!(SqlValue::coerce("inf"), SqlValue::Text("inf".to_string()));
    }

    #[test]
    fn test_coerce_timestamp() {
        use chrono::TimeZone;

        let expected = Utc.with_ymd_and_hms(2025, 6, 1, 18, 0, 0).unwrap();
        assert_eq!(
            SqlValue::coerce_timestamp("2025-06-01T18:00:00Z"),
            SqlValue::Timestamp(expected)
        );
        assert_eq!(
            SqlValue::coerce_timestamp("2025-06-01T20:00:00+02:00"),
            SqlValue::Timestamp(expected)
        );
        assert_eq!(SqlValue::coerce_timestamp("2025"), SqlValue::Integer(2025));
        assert_eq!(
            SqlValue::coerce_timestamp("June"),
            SqlValue::Text("June".to_string())
        );
    }

    #[test]
    fn test_serialize_untagged() {
        let values = vec![
            SqlValue::Integer(1),
            SqlValue::Text("a".to_string()),
            SqlValue::Null,
        ];
        let json = serde_json::to_value(&values).unwrap();
        assert_eq!(json, serde_json::json!([1, "a", null]));
    }
}
