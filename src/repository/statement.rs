//! Statement text for each engine operation
//!
//! Table and column names come from the descriptor; every value is a bind
//! parameter.

use serde::Serialize;

use crate::error::{RepoError, RepoResult};
use crate::query::QueryPlan;
use crate::record::{Descriptor, Record, SqlValue};

/// SQL text plus its positional bind values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statement {
    sql: String,
    params: Vec<SqlValue>,
}

impl Statement {
    /// `INSERT ... RETURNING <identifier>` over the writable columns
    pub fn insert<R: Record>(descriptor: &Descriptor<R>, record: &R) -> RepoResult<Self> {
        let values = descriptor.writable_values(record)?;
        let mut columns = Vec::with_capacity(values.len());
        let mut placeholders = Vec::with_capacity(values.len());
        let mut params = Vec::with_capacity(values.len());
        for (index, (field, value)) in values.into_iter().enumerate() {
            columns.push(field.column());
            placeholders.push(format!("${}", index + 1));
            params.push(value);
        }

        let sql = if columns.is_empty() {
            format!(
                "INSERT INTO {} DEFAULT VALUES RETURNING {}",
                descriptor.table_name(),
                descriptor.identifier_column()
            )
        } else {
            format!(
                "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
                descriptor.table_name(),
                columns.join(", "),
                placeholders.join(", "),
                descriptor.identifier_column()
            )
        };
        Ok(Self { sql, params })
    }

    /// Full-replace `UPDATE` of every writable column, keyed by the record's identifier.
    ///
    /// Fails with `TypeMismatch` when the record has no writable columns.
    pub fn update<R: Record>(descriptor: &Descriptor<R>, record: &R) -> RepoResult<Self> {
        let values = descriptor.writable_values(record)?;
        if values.is_empty() {
            return Err(RepoError::type_mismatch(format!(
                "record for table '{}' has no writable columns to update",
                descriptor.table_name()
            )));
        }
        let mut assignments = Vec::with_capacity(values.len());
        let mut params = Vec::with_capacity(values.len() + 1);
        for (index, (field, value)) in values.into_iter().enumerate() {
            assignments.push(format!("{} = ${}", field.column(), index + 1));
            params.push(value);
        }
        params.push(SqlValue::Integer(record.id()));

        let sql = format!(
            "UPDATE {} SET {} WHERE {} = ${}",
            descriptor.table_name(),
            assignments.join(", "),
            descriptor.identifier_column(),
            params.len()
        );
        Ok(Self { sql, params })
    }

    pub fn delete<R: Record>(descriptor: &Descriptor<R>, id: i64) -> Self {
        Self {
            sql: format!(
                "DELETE FROM {} WHERE {} = $1",
                descriptor.table_name(),
                descriptor.identifier_column()
            ),
            params: vec![SqlValue::Integer(id)],
        }
    }

    /// `SELECT` of every column for one identifier
    pub fn select_by_id<R: Record>(descriptor: &Descriptor<R>, id: i64) -> Self {
        Self {
            sql: format!(
                "SELECT {} FROM {} WHERE {} = $1",
                descriptor.columns(false).join(", "),
                descriptor.table_name(),
                descriptor.identifier_column()
            ),
            params: vec![SqlValue::Integer(id)],
        }
    }

    /// `SELECT` of every column followed by the plan's clauses
    pub fn select_many<R: Record>(descriptor: &Descriptor<R>, plan: QueryPlan) -> Self {
        let sql = format!(
            "SELECT {} FROM {} {}",
            descriptor.columns(false).join(", "),
            descriptor.table_name(),
            plan.clauses()
        );
        Self {
            sql,
            params: plan.into_params(),
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[SqlValue] {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QueryConfig;
    use crate::models::{Event, User};
    use crate::query::ClauseBuilder;
    use chrono::{TimeZone, Utc};
    use std::collections::HashMap;

    fn event() -> Event {
        Event {
            id: 7,
            user_id: 2,
            name: "Launch party".to_string(),
            description: "Celebrating the launch".to_string(),
            start_date: Utc.with_ymd_and_hms(2025, 1, 1, 18, 0, 0).unwrap(),
            max_attendees: 40,
            ..Default::default()
        }
    }

    #[test]
    fn test_insert_skips_read_only_columns() {
        let descriptor = Descriptor::<Event>::resolve().unwrap();
        let statement = Statement::insert(&descriptor, &event()).unwrap();
        assert_eq!(
            statement.sql(),
            "INSERT INTO events (user_id, name, description, start_date, max_attendees) \
             VALUES ($1, $2, $3, $4, $5) RETURNING id"
        );
        assert_eq!(statement.params().len(), 5);
        assert_eq!(statement.params()[0], SqlValue::Integer(2));
        assert_eq!(statement.params()[4], SqlValue::Integer(40));
    }

    #[test]
    fn test_update_binds_identifier_last() {
        let descriptor = Descriptor::<User>::resolve().unwrap();
        let user = User {
            id: 3,
            email: "a@example.com".to_string(),
            password: "secret".to_string(),
            ..Default::default()
        };
        let statement = Statement::update(&descriptor, &user).unwrap();
        assert_eq!(
            statement.sql(),
            "UPDATE users SET email = $1, password = $2 WHERE id = $3"
        );
        assert_eq!(statement.params()[2], SqlValue::Integer(3));
    }

    crate::record! {
        #[derive(Debug, Default)]
        struct Stamp in "stamps" {
            id: i64 => "id" as "id" [identifier],
            created_at: chrono::DateTime<chrono::Utc> => "createdAt" as "created_at" [read_only],
        }
    }

    #[test]
    fn test_update_without_writable_columns() {
        let descriptor = Descriptor::<Stamp>::resolve().unwrap();
        let stamp = Stamp {
            id: 1,
            ..Default::default()
        };
        let err = Statement::update(&descriptor, &stamp).unwrap_err();
        assert!(matches!(err, RepoError::TypeMismatch(_)));

        let insert = Statement::insert(&descriptor, &stamp).unwrap();
        assert_eq!(
            insert.sql(),
            "INSERT INTO stamps DEFAULT VALUES RETURNING id"
        );
    }

    #[test]
    fn test_delete_and_select_by_id() {
        let descriptor = Descriptor::<User>::resolve().unwrap();
        assert_eq!(
            Statement::delete(&descriptor, 9).sql(),
            "DELETE FROM users WHERE id = $1"
        );
        let select = Statement::select_by_id(&descriptor, 9);
        assert_eq!(
            select.sql(),
            "SELECT id, email, password, created_at FROM users WHERE id = $1"
        );
        assert_eq!(select.params(), &[SqlValue::Integer(9)]);
    }

    #[test]
    fn test_select_many_appends_clauses() {
        let descriptor = Descriptor::<Event>::resolve().unwrap();
        let config = QueryConfig::default();
        let params: HashMap<String, String> =
            [("name_contains".to_string(), "party".to_string())].into_iter().collect();
        let plan = ClauseBuilder::new(&descriptor, &config).build(&params).unwrap();
        let statement = Statement::select_many(&descriptor, plan);
        assert_eq!(
            statement.sql(),
            "SELECT id, user_id, name, description, start_date, created_at, max_attendees \
             FROM events WHERE name LIKE $1 ORDER BY id ASC LIMIT $2 OFFSET $3"
        );
        assert_eq!(statement.params().len(), 3);
    }
}
