//! Query plan: the parameterized clause text for one QueryMany call

use serde::Serialize;

use crate::record::SqlValue;

/// Filter, sort and pagination clauses plus their bind values.
///
/// `params()` is index-aligned with the placeholder numbers in the clause
/// text: `$1` binds `params()[0]`, and the LIMIT/OFFSET placeholders are the
/// last two.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryPlan {
    filters: Vec<String>,
    params: Vec<SqlValue>,
    order_by: String,
    pagination: String,
    limit: i64,
    offset: i64,
}

impl QueryPlan {
    pub(crate) fn new(
        filters: Vec<String>,
        params: Vec<SqlValue>,
        order_by: String,
        pagination: String,
        limit: i64,
        offset: i64,
    ) -> Self {
        Self {
            filters,
            params,
            order_by,
            pagination,
            limit,
            offset,
        }
    }

    /// Individual filter fragments, combined with AND
    pub fn filters(&self) -> &[String] {
        &self.filters
    }

    /// `WHERE ...` or `None` when there are no filters
    pub fn where_clause(&self) -> Option<String> {
        if self.filters.is_empty() {
            None
        } else {
            Some(format!("WHERE {}", self.filters.join(" AND ")))
        }
    }

    pub fn order_clause(&self) -> &str {
        &self.order_by
    }

    pub fn pagination_clause(&self) -> &str {
        &self.pagination
    }

    /// All clauses joined, ready to follow `SELECT ... FROM table`
    pub fn clauses(&self) -> String {
        match self.where_clause() {
            Some(filter) => format!("{} {} {}", filter, self.order_by, self.pagination),
            None => format!("{} {}", self.order_by, self.pagination),
        }
    }

    pub fn params(&self) -> &[SqlValue] {
        &self.params
    }

    pub fn into_params(self) -> Vec<SqlValue> {
        self.params
    }

    /// Effective row limit
    pub fn limit(&self) -> i64 {
        self.limit
    }

    /// Effective row offset
    pub fn offset(&self) -> i64 {
        self.offset
    }
}
