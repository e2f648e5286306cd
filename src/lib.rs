//! rowmap - typed records over a relational store
//!
//! Records declare their table, columns and identifier once (see
//! [`record!`]); the repository derives INSERT/UPDATE/DELETE/SELECT
//! statements from that declaration, turns query-string maps into
//! parameterized filter, sort and pagination clauses, and scans result rows
//! back into typed values.
//!
//! ```ignore
//! use rowmap::models::Event;
//! use rowmap::repository::{Repository, SqliteExecutor};
//!
//! let repo = Repository::new(SqliteExecutor::open_in_memory()?);
//! let id = repo.create(&event)?;
//! let stored: Event = repo.get_by_id(id)?;
//! let page: Vec<Event> = repo.query_many(&params)?;
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod observability;
pub mod query;
pub mod record;
pub mod repository;

pub use config::{QueryConfig, RepoConfig};
pub use error::{RepoError, RepoErrorCode, RepoResult};
pub use record::{Descriptor, Record, SqlValue};
pub use repository::{Executor, Repository, SqliteExecutor, Statement};
