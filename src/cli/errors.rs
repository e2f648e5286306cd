//! CLI-specific error types

use std::fmt;
use std::io;

use crate::config::ConfigError;
use crate::error::{RepoError, RepoErrorCode};

/// CLI error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdin/stdout)
    IoError,
    /// Database could not be opened
    StorageUnavailable,
    /// Request JSON does not have the expected shape
    InvalidRequest,
    /// Repository operation failed
    Repository(RepoErrorCode),
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "ROWMAP_CLI_CONFIG_ERROR",
            Self::IoError => "ROWMAP_CLI_IO_ERROR",
            Self::StorageUnavailable => "ROWMAP_CLI_STORAGE_UNAVAILABLE",
            Self::InvalidRequest => "ROWMAP_CLI_INVALID_REQUEST",
            Self::Repository(code) => code.code(),
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn storage_unavailable(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::StorageUnavailable, msg)
    }

    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InvalidRequest, msg)
    }

    /// Get the error code
    pub fn code(&self) -> CliErrorCode {
        self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// True for failures reported in the JSON response rather than on stderr
    pub fn is_request_error(&self) -> bool {
        matches!(
            self.code,
            CliErrorCode::InvalidRequest | CliErrorCode::Repository(_)
        )
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::config_error(e.to_string())
    }
}

impl From<RepoError> for CliError {
    fn from(e: RepoError) -> Self {
        Self::new(CliErrorCode::Repository(e.code()), e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_codes_pass_through() {
        let err = CliError::from(RepoError::InvalidQueryParameter("bogus".to_string()));
        assert_eq!(err.code_str(), "ROWMAP_INVALID_QUERY_PARAMETER");
        assert_eq!(err.message(), "invalid query parameter: bogus");
        assert!(err.is_request_error());
    }

    #[test]
    fn test_config_errors_are_not_request_errors() {
        let err = CliError::from(ConfigError::Invalid("database_path must not be empty".into()));
        assert_eq!(err.code(), CliErrorCode::ConfigError);
        assert!(!err.is_request_error());
        assert_eq!(
            err.to_string(),
            "ROWMAP_CLI_CONFIG_ERROR: Invalid config: database_path must not be empty"
        );
    }
}
