//! Query clause builder
//!
//! Turns an untyped query-parameter map into a [`QueryPlan`]. Column names
//! come from the record descriptor only; every value taken from the map is
//! a bind parameter.
//!
//! Construction is all-or-nothing: the first unresolved key aborts the build
//! and no partial clause is returned.

use std::collections::{BTreeMap, HashMap, HashSet};

use super::operator::FilterOperator;
use super::plan::QueryPlan;
use crate::config::QueryConfig;
use crate::error::{RepoError, RepoResult};
use crate::record::{Descriptor, Record, SqlValue};

/// Sort key; a leading `-` selects descending order
pub const SORT_KEY: &str = "sortBy";

/// Row limit key
pub const LIMIT_KEY: &str = "limit";

/// Row offset key
pub const OFFSET_KEY: &str = "offset";

/// Keys that are never filters
pub const RESERVED_KEYS: [&str; 3] = [SORT_KEY, LIMIT_KEY, OFFSET_KEY];

/// Builds query plans against one record type's columns
#[derive(Debug)]
pub struct ClauseBuilder<'a> {
    columns: HashMap<&'static str, &'static str>,
    timestamps: HashSet<&'static str>,
    identifier: &'static str,
    config: &'a QueryConfig,
}

impl<'a> ClauseBuilder<'a> {
    pub fn new<R: Record>(descriptor: &Descriptor<R>, config: &'a QueryConfig) -> Self {
        Self {
            columns: descriptor.external_to_column(),
            timestamps: descriptor.timestamp_columns(),
            identifier: descriptor.identifier_column(),
            config,
        }
    }

    /// Builds the plan for `params`.
    ///
    /// Filters are visited in ascending key order, so the same map always
    /// yields the same SQL text.
    pub fn build(&self, params: &HashMap<String, String>) -> RepoResult<QueryPlan> {
        let params: BTreeMap<&str, &str> = params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();

        let mut placeholder = 1usize;
        let mut filters = Vec::new();
        let mut values = Vec::new();

        for (key, value) in &params {
            if RESERVED_KEYS.contains(key) {
                continue;
            }

            let (field, operator) = FilterOperator::split_key(key);
            let column = self.resolve(field)?;

            match operator {
                FilterOperator::AnyOf => {
                    let mut placeholders = Vec::new();
                    for element in value.split(',') {
                        placeholders.push(format!("${}", placeholder));
                        values.push(self.bind_value(column, element));
                        placeholder += 1;
                    }
                    filters.push(format!("{} IN ({})", column, placeholders.join(",")));
                }
                FilterOperator::Contains => {
                    filters.push(format!("{} LIKE ${}", column, placeholder));
                    values.push(SqlValue::coerce(&format!("%{}%", value)));
                    placeholder += 1;
                }
                _ => {
                    filters.push(format!("{} {} ${}", column, operator.sql(), placeholder));
                    values.push(self.bind_value(column, value));
                    placeholder += 1;
                }
            }
        }

        let order_by = self.order_clause(params.get(SORT_KEY).copied())?;

        let limit = self.limit(params.get(LIMIT_KEY).copied())?;
        let offset = parse_bound(OFFSET_KEY, params.get(OFFSET_KEY).copied(), 0)?;
        let pagination = format!("LIMIT ${} OFFSET ${}", placeholder, placeholder + 1);
        values.push(SqlValue::Integer(limit));
        values.push(SqlValue::Integer(offset));

        Ok(QueryPlan::new(
            filters, values, order_by, pagination, limit, offset,
        ))
    }

    /// Maps an external field name to its column
    fn resolve(&self, field: &str) -> RepoResult<&'static str> {
        self.columns
            .get(field)
            .copied()
            .ok_or_else(|| RepoError::InvalidQueryParameter(field.to_string()))
    }

    /// Timestamp columns compare against timestamps; everything else is coerced
    fn bind_value(&self, column: &str, raw: &str) -> SqlValue {
        if self.timestamps.contains(column) {
            SqlValue::coerce_timestamp(raw)
        } else {
            SqlValue::coerce(raw)
        }
    }

    /// `ORDER BY` for the `sortBy` value, identifier ascending when absent
    fn order_clause(&self, sort: Option<&str>) -> RepoResult<String> {
        let sort = sort.unwrap_or("");
        let (field, direction) = match sort.strip_prefix('-') {
            Some(field) => (field, "DESC"),
            None => (sort, "ASC"),
        };
        let column = if field.is_empty() {
            self.identifier
        } else {
            self.resolve(field)?
        };
        Ok(format!("ORDER BY {} {}", column, direction))
    }

    fn limit(&self, raw: Option<&str>) -> RepoResult<i64> {
        let limit = parse_bound(LIMIT_KEY, raw, self.config.default_limit)?;
        if let Some(max) = self.config.max_limit {
            if limit > max {
                return Err(RepoError::invalid_pagination(
                    LIMIT_KEY,
                    format!("{} exceeds maximum {}", limit, max),
                ));
            }
        }
        Ok(limit)
    }
}

/// Parses an optional non-negative integer, falling back to `default`
fn parse_bound(field: &'static str, raw: Option<&str>, default: i64) -> RepoResult<i64> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    let value: i64 = raw.parse().map_err(|_| {
        RepoError::invalid_pagination(field, format!("must be a number, got '{}'", raw))
    })?;
    if value < 0 {
        return Err(RepoError::invalid_pagination(
            field,
            format!("must not be negative, got {}", value),
        ));
    }
    Ok(value)
}
