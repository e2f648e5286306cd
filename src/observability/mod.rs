//! Observability
//!
//! - Structured JSON logging with a process-wide minimum severity
//! - Begin/complete scopes around repository operations
//! - Per-repository counters
//!
//! Observability never changes the outcome of an operation: log write
//! failures are ignored and counters are advisory.
//!
//! ```ignore
//! use rowmap::observability::{Logger, ObservationScope, Severity};
//!
//! Logger::set_min_severity(Severity::Trace);
//! Logger::info("CONFIG_LOADED", &[("database_path", "./events.db")]);
//!
//! let scope = ObservationScope::new("RECORD_QUERY", &[("table", "events")]);
//! scope.complete(&[("rows", "10")]);
//! ```

mod logger;
mod metrics;
mod scope;

pub use logger::{Logger, Severity};
pub use metrics::{MetricsSnapshot, RepoMetrics};
pub use scope::ObservationScope;
