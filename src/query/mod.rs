//! Query-string language
//!
//! ```text
//! key    := fieldName ( "_ne" | "_lt" | "_gt" | "_lte" | "_gte" | "_contains" | "_anyOf" )?
//! value  := any string; for "_anyOf" a comma-separated list
//! sortBy := ["-"] fieldName
//! limit, offset := decimal integer string
//! ```
//!
//! Placeholders are positional and 1-indexed (`$1, $2, ...`). The LIMIT and
//! OFFSET placeholders continue the numbering after the last filter.

mod builder;
mod operator;
mod plan;

pub use builder::{ClauseBuilder, LIMIT_KEY, OFFSET_KEY, RESERVED_KEYS, SORT_KEY};
pub use operator::FilterOperator;
pub use plan::QueryPlan;
