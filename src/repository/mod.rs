//! Repository: CRUD engine, statements, materializer and storage drivers

mod engine;
mod executor;
mod materializer;
mod sqlite;
mod statement;

pub use engine::Repository;
pub use executor::{Executor, StorageError, StorageResult};
pub use materializer::{initial_capacity, scan_many, scan_one};
pub use sqlite::SqliteExecutor;
pub use statement::Statement;
