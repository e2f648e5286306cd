//! Record descriptor and field resolver
//!
//! A descriptor is derived from a record type's static metadata. It is the
//! single source of column order for INSERT/UPDATE value lists, SELECT lists
//! and scan slots, so those can never drift apart.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::marker::PhantomData;
use std::sync::OnceLock;

use regex::Regex;

use super::field::{Field, Slot};
use super::value::SqlValue;
use super::Record;
use crate::error::{RepoError, RepoResult};

/// True when `name` can be inlined into SQL text without quoting
fn is_sql_identifier(name: &str) -> bool {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(name))
}

/// Checks a record type's static metadata
fn validate(table: &str, fields: &[Field]) -> RepoResult<()> {
    if !is_sql_identifier(table) {
        return Err(RepoError::type_mismatch(format!(
            "table name '{}' is not a plain SQL identifier",
            table
        )));
    }
    if fields.is_empty() {
        return Err(RepoError::type_mismatch(format!(
            "record for table '{}' declares no fields",
            table
        )));
    }

    let mut externals = HashSet::new();
    let mut columns = HashSet::new();
    for field in fields {
        if !is_sql_identifier(field.column()) {
            return Err(RepoError::type_mismatch(format!(
                "column '{}' of table '{}' is not a plain SQL identifier",
                field.column(),
                table
            )));
        }
        if !externals.insert(field.external()) {
            return Err(RepoError::type_mismatch(format!(
                "external name '{}' declared twice on table '{}'",
                field.external(),
                table
            )));
        }
        if !columns.insert(field.column()) {
            return Err(RepoError::type_mismatch(format!(
                "column '{}' declared twice on table '{}'",
                field.column(),
                table
            )));
        }
    }

    match fields.iter().filter(|f| f.is_identifier()).count() {
        1 => Ok(()),
        0 => Err(RepoError::type_mismatch(format!(
            "record for table '{}' declares no identifier field",
            table
        ))),
        _ => Err(RepoError::type_mismatch(format!(
            "record for table '{}' declares more than one identifier field",
            table
        ))),
    }
}

/// Storage shape of a record type
pub struct Descriptor<R> {
    table: &'static str,
    fields: &'static [Field],
    identifier: &'static Field,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> Descriptor<R> {
    /// Derives and checks the descriptor for `R`.
    ///
    /// Fails with `TypeMismatch` when the table or a column is not a plain
    /// SQL identifier, when names repeat, or when there is not exactly one
    /// identifier field.
    pub fn resolve() -> RepoResult<Self> {
        let table = R::table_name();
        let fields = R::fields();

        validate(table, fields)?;

        let identifier = fields
            .iter()
            .find(|f| f.is_identifier())
            .ok_or_else(|| {
                RepoError::type_mismatch(format!(
                    "record for table '{}' declares no identifier field",
                    table
                ))
            })?;

        Ok(Self {
            table,
            fields,
            identifier,
            _record: PhantomData,
        })
    }

    pub fn table_name(&self) -> &'static str {
        self.table
    }

    /// Declared fields in declaration order
    pub fn fields(&self) -> &'static [Field] {
        self.fields
    }

    /// Column holding the record identifier
    pub fn identifier_column(&self) -> &'static str {
        self.identifier.column()
    }

    /// Column names in declaration order, optionally without read-only fields
    pub fn columns(&self, exclude_read_only: bool) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|f| !(exclude_read_only && f.is_read_only()))
            .map(|f| f.column())
            .collect()
    }

    /// Mapping from external (API-facing) names to column names
    pub fn external_to_column(&self) -> HashMap<&'static str, &'static str> {
        self.fields
            .iter()
            .map(|f| (f.external(), f.column()))
            .collect()
    }

    /// Columns whose fields hold timestamps
    pub fn timestamp_columns(&self) -> HashSet<&'static str> {
        self.fields
            .iter()
            .zip(R::default().values())
            .filter(|(_, value)| matches!(value, SqlValue::Timestamp(_)))
            .map(|(field, _)| field.column())
            .collect()
    }

    /// Pairs every writable field with the record's current value for it
    pub fn writable_values(&self, record: &R) -> RepoResult<Vec<(&'static Field, SqlValue)>> {
        let values = record.values();
        if values.len() != self.fields.len() {
            return Err(RepoError::type_mismatch(format!(
                "record for table '{}' produced {} values for {} fields",
                self.table,
                values.len(),
                self.fields.len()
            )));
        }
        Ok(self
            .fields
            .iter()
            .zip(values)
            .filter(|(field, _)| !field.is_read_only())
            .collect())
    }

    /// Pairs every field with a writable slot into `record`
    pub fn slots<'r>(&self, record: &'r mut R) -> RepoResult<Vec<(&'static Field, Slot<'r>)>> {
        let slots = record.slots();
        if slots.len() != self.fields.len() {
            return Err(RepoError::type_mismatch(format!(
                "record for table '{}' produced {} slots for {} fields",
                self.table,
                slots.len(),
                self.fields.len()
            )));
        }
        Ok(self.fields.iter().zip(slots).collect())
    }
}

impl<R> Clone for Descriptor<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for Descriptor<R> {}

impl<R> PartialEq for Descriptor<R> {
    fn eq(&self, other: &Self) -> bool {
        self.table == other.table && self.fields == other.fields
    }
}

impl<R> fmt::Debug for Descriptor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("table", &self.table)
            .field("fields", &self.fields)
            .field("identifier", &self.identifier.column())
            .finish()
    }
}
