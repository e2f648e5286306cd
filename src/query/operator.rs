//! Filter operators of the query-string language
//!
//! An operator is selected by a suffix on the query key, e.g.
//! `maxAttendees_gte=50` or `name_contains=gala`.

use serde::{Deserialize, Serialize};

/// Filter operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOperator {
    /// Equals (no suffix)
    #[serde(rename = "eq")]
    Eq,

    /// Not equals
    #[serde(rename = "ne")]
    Ne,

    /// Less than
    #[serde(rename = "lt")]
    Lt,

    /// Greater than
    #[serde(rename = "gt")]
    Gt,

    /// Less than or equal
    #[serde(rename = "lte")]
    Lte,

    /// Greater than or equal
    #[serde(rename = "gte")]
    Gte,

    /// Substring match (LIKE %value%)
    #[serde(rename = "contains")]
    Contains,

    /// Value in comma-separated list
    #[serde(rename = "anyOf")]
    AnyOf,
}

impl FilterOperator {
    /// Operators selected by a key suffix, in matching order
    const SUFFIXED: [FilterOperator; 7] = [
        FilterOperator::Lte,
        FilterOperator::Gte,
        FilterOperator::Ne,
        FilterOperator::Lt,
        FilterOperator::Gt,
        FilterOperator::Contains,
        FilterOperator::AnyOf,
    ];

    /// Key suffix that selects this operator
    pub fn suffix(&self) -> &'static str {
        match self {
            FilterOperator::Eq => "",
            FilterOperator::Ne => "_ne",
            FilterOperator::Lt => "_lt",
            FilterOperator::Gt => "_gt",
            FilterOperator::Lte => "_lte",
            FilterOperator::Gte => "_gte",
            FilterOperator::Contains => "_contains",
            FilterOperator::AnyOf => "_anyOf",
        }
    }

    /// SQL comparison operator
    pub fn sql(&self) -> &'static str {
        match self {
            FilterOperator::Eq => "=",
            FilterOperator::Ne => "!=",
            FilterOperator::Lt => "<",
            FilterOperator::Gt => ">",
            FilterOperator::Lte => "<=",
            FilterOperator::Gte => ">=",
            FilterOperator::Contains => "LIKE",
            FilterOperator::AnyOf => "IN",
        }
    }

    /// Splits a query key into the field name and its operator.
    ///
    /// Keys without a known suffix are equality filters on the whole key.
    pub fn split_key(key: &str) -> (&str, FilterOperator) {
        for operator in Self::SUFFIXED {
            if let Some(field) = key.strip_suffix(operator.suffix()) {
                return (field, operator);
            }
        }
        (key, FilterOperator::Eq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_plain_key() {
        assert_eq!(FilterOperator::split_key("name"), ("name", FilterOperator::Eq));
    }

    #[test]
    fn test_split_suffixed_keys() {
        assert_eq!(
            FilterOperator::split_key("maxAttendees_lte"),
            ("maxAttendees", FilterOperator::Lte)
        );
        assert_eq!(
            FilterOperator::split_key("maxAttendees_lt"),
            ("maxAttendees", FilterOperator::Lt)
        );
        assert_eq!(
            FilterOperator::split_key("name_ne"),
            ("name", FilterOperator::Ne)
        );
        assert_eq!(
            FilterOperator::split_key("name_contains"),
            ("name", FilterOperator::Contains)
        );
        assert_eq!(
            FilterOperator::split_key("id_anyOf"),
            ("id", FilterOperator::AnyOf)
        );
    }

    #[test]
    fn test_suffix_is_case_sensitive() {
        assert_eq!(
            FilterOperator::split_key("id_anyof"),
            ("id_anyof", FilterOperator::Eq)
        );
    }

    #[test]
    fn test_sql_operators() {
        assert_eq!(FilterOperator::Eq.sql(), "=");
        assert_eq!(FilterOperator::Ne.sql(), "!=");
        assert_eq!(FilterOperator::Contains.sql(), "LIKE");
        assert_eq!(FilterOperator::AnyOf.sql(), "IN");
    }
}
