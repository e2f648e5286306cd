//! Field metadata and scan slots

use chrono::{DateTime, NaiveDateTime, Utc};

use super::value::SqlValue;

/// Static metadata for one declared field of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    external: &'static str,
    column: &'static str,
    read_only: bool,
    identifier: bool,
}

impl Field {
    /// A writable field with the given external (API) name and column name
    pub const fn new(external: &'static str, column: &'static str) -> Self {
        Self {
            external,
            column,
            read_only: false,
            identifier: false,
        }
    }

    /// Marks the field as owned by storage; writes never supply it
    pub const fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Marks the field as the record identifier. Identifiers are read-only.
    pub const fn identifier(mut self) -> Self {
        self.identifier = true;
        self.read_only = true;
        self
    }

    pub fn external(&self) -> &'static str {
        self.external
    }

    pub fn column(&self) -> &'static str {
        self.column
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn is_identifier(&self) -> bool {
        self.identifier
    }
}

/// A writable reference to one field of a record, filled from a result column
#[derive(Debug)]
pub enum Slot<'a> {
    Integer(&'a mut i64),
    Real(&'a mut f64),
    Text(&'a mut String),
    Timestamp(&'a mut DateTime<Utc>),
}

impl Slot<'_> {
    /// Returns the slot kind for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Slot::Integer(_) => "integer",
            Slot::Real(_) => "real",
            Slot::Text(_) => "text",
            Slot::Timestamp(_) => "timestamp",
        }
    }

    /// Stores `value` in the slot.
    ///
    /// Integers widen into real slots and text parses into timestamp slots;
    /// any other pairing is rejected.
    pub fn assign(self, value: SqlValue) -> Result<(), String> {
        match (self, value) {
            (Slot::Integer(target), SqlValue::Integer(v)) => *target = v,
            (Slot::Real(target), SqlValue::Real(v)) => *target = v,
            (Slot::Real(target), SqlValue::Integer(v)) => *target = v as f64,
            (Slot::Text(target), SqlValue::Text(v)) => *target = v,
            (Slot::Timestamp(target), SqlValue::Timestamp(v)) => *target = v,
            (Slot::Timestamp(target), SqlValue::Text(v)) => *target = parse_timestamp(&v)?,
            (slot, value) => {
                return Err(format!(
                    "cannot scan {} value into {} field",
                    value.type_name(),
                    slot.kind()
                ))
            }
        }
        Ok(())
    }
}

/// Parses RFC 3339 text, falling back to the `YYYY-MM-DD HH:MM:SS[.f]` form
/// some engines use for their default timestamps.
pub(crate) fn parse_timestamp(text: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| format!("invalid timestamp '{}': {}", text, e))
}

/// Rust types that can back a record field
pub trait ColumnType {
    /// The bind value for this field
    fn to_sql(&self) -> SqlValue;

    /// A scan slot pointing at this field
    fn slot(&mut self) -> Slot<'_>;
}

impl ColumnType for i64 {
    fn to_sql(&self) -> SqlValue {
        SqlValue::Integer(*self)
    }

    fn slot(&mut self) -> Slot<'_> {
        Slot::Integer(self)
    }
}

impl ColumnType for f64 {
    fn to_sql(&self) -> SqlValue {
        SqlValue::Real(*self)
    }

    fn slot(&mut self) -> Slot<'_> {
        Slot::Real(self)
    }
}

impl ColumnType for String {
    fn to_sql(&self) -> SqlValue {
        SqlValue::Text(self.clone())
    }

    fn slot(&mut self) -> Slot<'_> {
        Slot::Text(self)
    }
}

impl ColumnType for DateTime<Utc> {
    fn to_sql(&self) -> SqlValue {
        SqlValue::Timestamp(*self)
    }

    fn slot(&mut self) -> Slot<'_> {
        Slot::Timestamp(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_identifier_implies_read_only() {
        let field = Field::new("id", "id").identifier();
        assert!(field.is_identifier());
        assert!(field.is_read_only());

        let field = Field::new("createdAt", "created_at").read_only();
        assert!(!field.is_identifier());
        assert!(field.is_read_only());
    }

    #[test]
    fn test_assign_matching_types() {
        let mut n = 0i64;
        Slot::Integer(&mut n).assign(SqlValue::Integer(42)).unwrap();
        assert_eq!(n, 42);

        let mut s = String::new();
        Slot::Text(&mut s).assign(SqlValue::from("hello")).unwrap();
        assert_eq!(s, "hello");

        let mut f = 0.0f64;
        Slot::Real(&mut f).assign(SqlValue::Integer(3)).unwrap();
        assert_eq!(f, 3.0);
    }

    #[test]
    fn test_assign_timestamp_from_text() {
        let mut ts = DateTime::<Utc>::default();
        Slot::Timestamp(&mut ts)
            .assign(SqlValue::from("2024-05-01T10:30:00.000000Z"))
            .unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 5, 1, 10, 30, 0).unwrap());

        let mut ts = DateTime::<Utc>::default();
        Slot::Timestamp(&mut ts)
            .assign(SqlValue::from("2024-05-01 10:30:00"))
            .unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 5, 1, 10, 30, 0).unwrap());
    }

    #[test]
    fn test_assign_mismatch() {
        let mut n = 0i64;
        let err = Slot::Integer(&mut n)
            .assign(SqlValue::from("abc"))
            .unwrap_err();
        assert_eq!(err, "cannot scan text value into integer field");

        let mut s = String::new();
        assert!(Slot::Text(&mut s).assign(SqlValue::Null).is_err());
    }
}
