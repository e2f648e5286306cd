//! Error types for the mapping layer
//!
//! Error codes:
//! - ROWMAP_TYPE_MISMATCH
//! - ROWMAP_INVALID_QUERY_PARAMETER
//! - ROWMAP_INVALID_PAGINATION
//! - ROWMAP_PREPARE_FAILED
//! - ROWMAP_EXECUTE_FAILED
//! - ROWMAP_SCAN_FAILED
//! - ROWMAP_NOT_FOUND
//!
//! Every error reaches the immediate caller unchanged in kind. Nothing is
//! retried and nothing is swallowed.

use std::fmt;

use thiserror::Error;

use crate::repository::StorageError;

/// Stable error codes, one per error kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoErrorCode {
    /// Record capability is malformed
    TypeMismatch,
    /// Filter or sort key does not resolve to a column
    InvalidQueryParameter,
    /// `limit` or `offset` is not a usable integer
    InvalidPagination,
    /// Storage rejected the statement text
    PrepareFailed,
    /// Storage failed while running the statement
    ExecuteFailed,
    /// Row shape does not match the record's slots
    ScanFailed,
    /// Lookup by identifier matched no row
    NotFound,
}

impl RepoErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            Self::TypeMismatch => "ROWMAP_TYPE_MISMATCH",
            Self::InvalidQueryParameter => "ROWMAP_INVALID_QUERY_PARAMETER",
            Self::InvalidPagination => "ROWMAP_INVALID_PAGINATION",
            Self::PrepareFailed => "ROWMAP_PREPARE_FAILED",
            Self::ExecuteFailed => "ROWMAP_EXECUTE_FAILED",
            Self::ScanFailed => "ROWMAP_SCAN_FAILED",
            Self::NotFound => "ROWMAP_NOT_FOUND",
        }
    }

    /// True when the failure was caused by caller input rather than storage
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidQueryParameter | Self::InvalidPagination | Self::NotFound
        )
    }
}

impl fmt::Display for RepoErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors raised by descriptors, the clause builder, the engine and the materializer
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    #[error("invalid query parameter: {0}")]
    InvalidQueryParameter(String),

    #[error("invalid pagination: {field} {reason}")]
    InvalidPagination { field: &'static str, reason: String },

    #[error("error preparing {intent}: {source}")]
    Prepare {
        intent: String,
        #[source]
        source: StorageError,
    },

    #[error("error executing {intent}: {source}")]
    Execute {
        intent: String,
        #[source]
        source: StorageError,
    },

    #[error("error scanning {table} row: {reason}")]
    Scan { table: &'static str, reason: String },

    #[error("no {table} record with id {id}")]
    NotFound { table: &'static str, id: i64 },
}

impl RepoError {
    /// Create a type mismatch error
    pub fn type_mismatch(reason: impl Into<String>) -> Self {
        Self::TypeMismatch(reason.into())
    }

    /// Create a pagination error for `limit` or `offset`
    pub fn invalid_pagination(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidPagination {
            field,
            reason: reason.into(),
        }
    }

    /// Create a scan error for the given table
    pub fn scan(table: &'static str, reason: impl Into<String>) -> Self {
        Self::Scan {
            table,
            reason: reason.into(),
        }
    }

    /// Wrap a storage failure with the intent of the statement that failed.
    ///
    /// Prepare failures keep their kind; everything else is an execute failure.
    pub fn storage(intent: impl Into<String>, source: StorageError) -> Self {
        let intent = intent.into();
        match source {
            StorageError::Prepare(_) => Self::Prepare { intent, source },
            _ => Self::Execute { intent, source },
        }
    }

    /// Returns the error code
    pub fn code(&self) -> RepoErrorCode {
        match self {
            Self::TypeMismatch(_) => RepoErrorCode::TypeMismatch,
            Self::InvalidQueryParameter(_) => RepoErrorCode::InvalidQueryParameter,
            Self::InvalidPagination { .. } => RepoErrorCode::InvalidPagination,
            Self::Prepare { .. } => RepoErrorCode::PrepareFailed,
            Self::Execute { .. } => RepoErrorCode::ExecuteFailed,
            Self::Scan { .. } => RepoErrorCode::ScanFailed,
            Self::NotFound { .. } => RepoErrorCode::NotFound,
        }
    }

    /// True for a lookup that matched no row
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result type for mapping-layer operations
pub type RepoResult<T> = Result<T, RepoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(RepoErrorCode::TypeMismatch.code(), "ROWMAP_TYPE_MISMATCH");
        assert_eq!(
            RepoErrorCode::InvalidQueryParameter.code(),
            "ROWMAP_INVALID_QUERY_PARAMETER"
        );
        assert_eq!(
            RepoErrorCode::InvalidPagination.code(),
            "ROWMAP_INVALID_PAGINATION"
        );
        assert_eq!(RepoErrorCode::NotFound.code(), "ROWMAP_NOT_FOUND");
    }

    #[test]
    fn test_storage_wrapping_keeps_prepare_kind() {
        let err = RepoError::storage(
            "insert into events",
            StorageError::Prepare("syntax error".to_string()),
        );
        assert_eq!(err.code(), RepoErrorCode::PrepareFailed);
        assert_eq!(
            err.to_string(),
            "error preparing insert into events: prepare failed: syntax error"
        );

        let err = RepoError::storage(
            "delete from events",
            StorageError::Execute("disk full".to_string()),
        );
        assert_eq!(err.code(), RepoErrorCode::ExecuteFailed);
    }

    #[test]
    fn test_invalid_query_parameter_display() {
        let err = RepoError::InvalidQueryParameter("noSuchThing".to_string());
        assert_eq!(err.to_string(), "invalid query parameter: noSuchThing");
        assert!(err.code().is_client_error());
    }

    #[test]
    fn test_not_found() {
        let err = RepoError::NotFound {
            table: "events",
            id: 7,
        };
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "no events record with id 7");
        assert!(!RepoError::type_mismatch("x").is_not_found());
    }
}
