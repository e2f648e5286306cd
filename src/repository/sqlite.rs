//! SQLite storage driver
//!
//! SQLite reads `$1..$n` as named parameters numbered in order of first
//! appearance. Generated statements always introduce placeholders in
//! ascending order, so positional binding lines up.
//!
//! Timestamps are stored as RFC 3339 text with microsecond precision.

use std::path::Path;

use chrono::SecondsFormat;
use rusqlite::types::{ToSqlOutput, Value, ValueRef};
use rusqlite::{params_from_iter, Connection, ToSql};

use super::executor::{Executor, StorageError, StorageResult};
use crate::record::{Row, SqlValue};

impl ToSql for SqlValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            SqlValue::Null => ToSqlOutput::Owned(Value::Null),
            SqlValue::Integer(v) => ToSqlOutput::Owned(Value::Integer(*v)),
            SqlValue::Real(v) => ToSqlOutput::Owned(Value::Real(*v)),
            SqlValue::Text(v) => ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes())),
            SqlValue::Timestamp(v) => ToSqlOutput::Owned(Value::Text(
                v.to_rfc3339_opts(SecondsFormat::Micros, true),
            )),
        })
    }
}

/// [`Executor`] over a single SQLite connection
#[derive(Debug)]
pub struct SqliteExecutor {
    conn: Connection,
}

impl SqliteExecutor {
    pub fn open(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| StorageError::Open(format!("{}: {}", path.display(), e)))?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| StorageError::Open(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Runs one or more unparameterized statements, e.g. schema DDL
    pub fn execute_batch(&self, sql: &str) -> StorageResult<()> {
        self.conn
            .execute_batch(sql)
            .map_err(|e| StorageError::Execute(e.to_string()))
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl Executor for SqliteExecutor {
    fn execute(&self, sql: &str, params: &[SqlValue]) -> StorageResult<u64> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| StorageError::Prepare(e.to_string()))?;
        let affected = stmt
            .execute(params_from_iter(params.iter()))
            .map_err(|e| StorageError::Execute(e.to_string()))?;
        Ok(affected as u64)
    }

    fn query(&self, sql: &str, params: &[SqlValue]) -> StorageResult<Vec<Row>> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| StorageError::Prepare(e.to_string()))?;
        let width = stmt.column_count();
        let mut rows = stmt
            .query(params_from_iter(params.iter()))
            .map_err(|e| StorageError::Execute(e.to_string()))?;

        let mut collected = Vec::new();
        while let Some(row) = rows.next().map_err(|e| StorageError::Fetch(e.to_string()))? {
            let mut values = Vec::with_capacity(width);
            for index in 0..width {
                let value = row
                    .get_ref(index)
                    .map_err(|e| StorageError::Fetch(e.to_string()))?;
                values.push(decode(value)?);
            }
            collected.push(Row::new(values));
        }
        Ok(collected)
    }
}

fn decode(value: ValueRef<'_>) -> StorageResult<SqlValue> {
    match value {
        ValueRef::Null => Ok(SqlValue::Null),
        ValueRef::Integer(v) => Ok(SqlValue::Integer(v)),
        ValueRef::Real(v) => Ok(SqlValue::Real(v)),
        ValueRef::Text(bytes) => String::from_utf8(bytes.to_vec())
            .map(SqlValue::Text)
            .map_err(|e| StorageError::Fetch(format!("text column is not UTF-8: {}", e))),
        ValueRef::Blob(bytes) => Err(StorageError::Unsupported(format!(
            "blob of {} bytes",
            bytes.len()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn executor() -> SqliteExecutor {
        let executor = SqliteExecutor::open_in_memory().unwrap();
        executor
            .execute_batch("CREATE TABLE t (id INTEGER PRIMARY KEY, name TEXT, score REAL, at TEXT);")
            .unwrap();
        executor
    }

    #[test]
    fn test_dollar_placeholders_bind_in_order() {
        let executor = executor();
        let affected = executor
            .execute(
                "INSERT INTO t (name, score) VALUES ($1, $2)",
                &[SqlValue::from("a"), SqlValue::Real(1.5)],
            )
            .unwrap();
        assert_eq!(affected, 1);

        let rows = executor
            .query("SELECT id, name, score FROM t WHERE name = $1", &[SqlValue::from("a")])
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0].clone().into_values(),
            vec![SqlValue::Integer(1), SqlValue::from("a"), SqlValue::Real(1.5)]
        );
    }

    #[test]
    fn test_returning_through_query() {
        let executor = executor();
        let rows = executor
            .query("INSERT INTO t (name) VALUES ($1) RETURNING id", &[SqlValue::from("x")])
            .unwrap();
        assert_eq!(rows[0].get(0), Some(&SqlValue::Integer(1)));
    }

    #[test]
    fn test_timestamp_stored_as_rfc3339() {
        let executor = executor();
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        executor
            .execute("INSERT INTO t (at) VALUES ($1)", &[SqlValue::Timestamp(at)])
            .unwrap();
        let rows = executor.query("SELECT at FROM t", &[]).unwrap();
        assert_eq!(
            rows[0].get(0),
            Some(&SqlValue::from("2024-03-01T12:30:00.000000Z"))
        );
    }

    #[test]
    fn test_prepare_error_kind() {
        let executor = executor();
        let err = executor.query("SELEC id FROM t", &[]).unwrap_err();
        assert!(matches!(err, StorageError::Prepare(_)));

        let err = executor.execute("SELECT nope FROM t", &[]).unwrap_err();
        assert!(matches!(err, StorageError::Prepare(_)));
    }

    #[test]
    fn test_blob_is_unsupported() {
        let executor = executor();
        let err = executor.query("SELECT x'00ff'", &[]).unwrap_err();
        assert!(matches!(err, StorageError::Unsupported(_)));
    }

    #[test]
    fn test_open_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rowmap.db");
        let executor = SqliteExecutor::open(&path).unwrap();
        executor.execute_batch("CREATE TABLE t (id INTEGER PRIMARY KEY);").unwrap();
        assert!(path.exists());
    }
}
