//! Storage facade
//!
//! The engine talks to storage only through [`Executor`]: prepared text plus
//! positional bind values in, affected counts or fully buffered rows out.

use thiserror::Error;

use crate::record::{Row, SqlValue};

/// Failures reported by a storage driver
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("open failed: {0}")]
    Open(String),

    #[error("prepare failed: {0}")]
    Prepare(String),

    #[error("execute failed: {0}")]
    Execute(String),

    #[error("row fetch failed: {0}")]
    Fetch(String),

    #[error("unsupported column value: {0}")]
    Unsupported(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Runs parameterized statements.
///
/// Placeholders are `$1..$n`; `params[i]` binds `$(i + 1)`.
pub trait Executor {
    /// Runs a statement that returns no rows, returning the affected row count
    fn execute(&self, sql: &str, params: &[SqlValue]) -> StorageResult<u64>;

    /// Runs a statement and collects every result row.
    ///
    /// An error while stepping through rows is returned instead of a
    /// truncated result.
    fn query(&self, sql: &str, params: &[SqlValue]) -> StorageResult<Vec<Row>>;
}

impl<E: Executor + ?Sized> Executor for &E {
    fn execute(&self, sql: &str, params: &[SqlValue]) -> StorageResult<u64> {
        (**self).execute(sql, params)
    }

    fn query(&self, sql: &str, params: &[SqlValue]) -> StorageResult<Vec<Row>> {
        (**self).query(sql, params)
    }
}
