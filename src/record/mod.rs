//! Record capability and storage descriptors
//!
//! Anything persisted through the repository implements [`Record`]. The
//! trait exposes static storage metadata plus ordered value and slot lists;
//! [`Descriptor`] derives column lists and name mappings from it.
//!
//! # Invariants
//!
//! - Field order is declaration order, every time
//! - `values()` and `slots()` are index-aligned with `fields()`
//! - Table and column names are plain SQL identifiers

mod descriptor;
mod field;
mod macros;
mod value;

pub use descriptor::Descriptor;
pub use field::{ColumnType, Field, Slot};
pub use value::{Row, SqlValue};

/// A typed entity eligible for persistence
pub trait Record: Default + 'static {
    /// Storage table name
    fn table_name() -> &'static str;

    /// Declared fields in declaration order
    fn fields() -> &'static [Field];

    /// Numeric identifier of this instance
    fn id(&self) -> i64;

    /// Current field values, index-aligned with `fields()`
    fn values(&self) -> Vec<SqlValue>;

    /// Writable slots for every field, index-aligned with `fields()`
    fn slots(&mut self) -> Vec<Slot<'_>>;
}
