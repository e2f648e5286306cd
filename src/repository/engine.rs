//! Generic CRUD engine
//!
//! Every operation resolves the record's descriptor, builds one statement,
//! runs it through the [`Executor`] and, for reads, hands the rows to the
//! materializer. Each call is logged inside its own observation scope.

use std::collections::HashMap;

use super::executor::Executor;
use super::materializer::{scan_many, scan_one};
use super::statement::Statement;
use crate::config::QueryConfig;
use crate::error::{RepoError, RepoResult};
use crate::observability::{Logger, ObservationScope, RepoMetrics, Severity};
use crate::query::ClauseBuilder;
use crate::record::{Descriptor, Record, Row, SqlValue};

/// Record repository over a storage executor
#[derive(Debug)]
pub struct Repository<E> {
    executor: E,
    config: QueryConfig,
    metrics: RepoMetrics,
}

impl<E: Executor> Repository<E> {
    pub fn new(executor: E) -> Self {
        Self::with_config(executor, QueryConfig::default())
    }

    pub fn with_config(executor: E, config: QueryConfig) -> Self {
        Self {
            executor,
            config,
            metrics: RepoMetrics::new(),
        }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    pub fn metrics(&self) -> &RepoMetrics {
        &self.metrics
    }

    /// Inserts `record`'s writable fields and returns the generated identifier
    pub fn create<R: Record>(&self, record: &R) -> RepoResult<i64> {
        let scope = open_scope::<R>("RECORD_CREATE", None);
        let result = Descriptor::<R>::resolve().and_then(|descriptor| {
            let statement = Statement::insert(&descriptor, record)?;
            let intent = format!("insert into {}", descriptor.table_name());
            let rows = self.run_query(&intent, &statement)?;
            let id = generated_id(descriptor.table_name(), rows)?;
            self.metrics.increment_creates();
            Ok(id)
        });
        self.finish(scope, result, |id| vec![("id", id.to_string())])
    }

    /// Overwrites every writable column of the row matching `record`'s identifier.
    ///
    /// Matching no row is not an error.
    pub fn update<R: Record>(&self, record: &R) -> RepoResult<()> {
        let scope = open_scope::<R>("RECORD_UPDATE", Some(record.id()));
        let result = Descriptor::<R>::resolve().and_then(|descriptor| {
            let statement = Statement::update(&descriptor, record)?;
            let intent = format!("update {}", descriptor.table_name());
            let affected = self.run_execute(&intent, &statement)?;
            self.metrics.increment_updates();
            Ok(affected)
        });
        self.finish(scope, result, |affected| {
            vec![("affected", affected.to_string())]
        })
        .map(|_| ())
    }

    /// Deletes the row matching `record`'s identifier.
    ///
    /// Matching no row is not an error.
    pub fn delete<R: Record>(&self, record: &R) -> RepoResult<()> {
        let scope = open_scope::<R>("RECORD_DELETE", Some(record.id()));
        let result = Descriptor::<R>::resolve().and_then(|descriptor| {
            let statement = Statement::delete(&descriptor, record.id());
            let intent = format!("delete from {}", descriptor.table_name());
            let affected = self.run_execute(&intent, &statement)?;
            self.metrics.increment_deletes();
            Ok(affected)
        });
        self.finish(scope, result, |affected| {
            vec![("affected", affected.to_string())]
        })
        .map(|_| ())
    }

    /// Reads the row with identifier `id` into `record`.
    ///
    /// Fails with `NotFound` when no row matches; `record` is left untouched
    /// in that case.
    pub fn fill_by_id<R: Record>(&self, record: &mut R, id: i64) -> RepoResult<()> {
        let scope = open_scope::<R>("RECORD_GET", Some(id));
        let result = Descriptor::<R>::resolve().and_then(|descriptor| {
            let statement = Statement::select_by_id(&descriptor, id);
            let intent = format!("select from {}", descriptor.table_name());
            let row = self
                .run_query(&intent, &statement)?
                .into_iter()
                .next()
                .ok_or(RepoError::NotFound {
                    table: descriptor.table_name(),
                    id,
                })?;
            scan_one(&descriptor, record, row)?;
            self.metrics.increment_lookups();
            self.metrics.add_rows_materialized(1);
            Ok(())
        });
        self.finish(scope, result, |_| Vec::new())
    }

    /// Returns a new `R` read from the row with identifier `id`
    pub fn get_by_id<R: Record>(&self, id: i64) -> RepoResult<R> {
        let mut record = R::default();
        self.fill_by_id(&mut record, id)?;
        Ok(record)
    }

    /// Runs a filtered, sorted, paginated read and materializes every row.
    ///
    /// See [`crate::query`] for the parameter grammar.
    pub fn query_many<R: Record>(&self, params: &HashMap<String, String>) -> RepoResult<Vec<R>> {
        let scope = open_scope::<R>("RECORD_QUERY", None);
        let result = Descriptor::<R>::resolve().and_then(|descriptor| {
            let plan = ClauseBuilder::new(&descriptor, &self.config).build(params)?;
            let expected = plan.limit();
            let statement = Statement::select_many(&descriptor, plan);
            let intent = format!("select from {}", descriptor.table_name());
            let rows = self.run_query(&intent, &statement)?;
            let records = scan_many(&descriptor, rows, expected)?;
            self.metrics.increment_queries();
            self.metrics.add_rows_materialized(records.len() as u64);
            Ok(records)
        });
        self.finish(scope, result, |records| {
            vec![("rows", records.len().to_string())]
        })
    }

    /// The statement `query_many` would run for `params`, without running it
    pub fn explain<R: Record>(&self, params: &HashMap<String, String>) -> RepoResult<Statement> {
        let descriptor = Descriptor::<R>::resolve()?;
        let plan = ClauseBuilder::new(&descriptor, &self.config).build(params)?;
        Ok(Statement::select_many(&descriptor, plan))
    }

    fn run_execute(&self, intent: &str, statement: &Statement) -> RepoResult<u64> {
        trace_statement(intent, statement);
        self.executor
            .execute(statement.sql(), statement.params())
            .map_err(|e| RepoError::storage(intent, e))
    }

    fn run_query(&self, intent: &str, statement: &Statement) -> RepoResult<Vec<Row>> {
        trace_statement(intent, statement);
        self.executor
            .query(statement.sql(), statement.params())
            .map_err(|e| RepoError::storage(intent, e))
    }

    /// Resolves the scope from `result` and counts failures
    fn finish<T>(
        &self,
        scope: ObservationScope,
        result: RepoResult<T>,
        detail: impl FnOnce(&T) -> Vec<(&'static str, String)>,
    ) -> RepoResult<T> {
        match &result {
            Ok(value) => {
                let fields = detail(value);
                let refs: Vec<(&str, &str)> =
                    fields.iter().map(|(k, v)| (*k, v.as_str())).collect();
                scope.complete(&refs);
            }
            Err(err) => {
                self.metrics.increment_failures();
                let reason = err.to_string();
                if err.code().is_client_error() {
                    scope.reject(&reason);
                } else {
                    scope.fail(&reason);
                }
            }
        }
        result
    }
}

fn open_scope<R: Record>(name: &'static str, id: Option<i64>) -> ObservationScope {
    let id = id.map(|id| id.to_string());
    let mut fields = vec![("table", R::table_name())];
    if let Some(id) = &id {
        fields.push(("id", id.as_str()));
    }
    ObservationScope::new(name, &fields)
}

/// Logs statement text and parameter count; bind values are never logged
fn trace_statement(intent: &str, statement: &Statement) {
    if Logger::enabled(Severity::Trace) {
        let count = statement.params().len().to_string();
        Logger::trace(
            "STATEMENT",
            &[
                ("intent", intent),
                ("sql", statement.sql()),
                ("params", count.as_str()),
            ],
        );
    }
}

/// Reads the identifier returned by `INSERT ... RETURNING`
fn generated_id(table: &'static str, rows: Vec<Row>) -> RepoResult<i64> {
    let row = rows
        .into_iter()
        .next()
        .ok_or_else(|| RepoError::scan(table, "insert returned no identifier row"))?;
    match row.get(0) {
        Some(SqlValue::Integer(id)) => Ok(*id),
        Some(other) => Err(RepoError::scan(
            table,
            format!("generated identifier is {}, not integer", other.type_name()),
        )),
        None => Err(RepoError::scan(table, "generated identifier row is empty")),
    }
}
