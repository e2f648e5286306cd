//! CLI command implementations
//!
//! Each command loads the config, opens the database, reads one request
//! and writes one response. Configuration, I/O and connection failures go
//! to stderr with a non-zero exit; request and repository failures are
//! reported in the JSON response. Log lines go to stderr so stdout carries
//! only the response.

use std::collections::HashMap;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::config::RepoConfig;
use crate::models::{Event, User};
use crate::observability::Logger;
use crate::record::Record;
use crate::repository::{Executor, Repository, SqliteExecutor};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{read_request, write_error, write_response};

/// Operation selected by the subcommand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Get,
    Query,
    Create,
    Update,
    Delete,
    Explain,
}

/// Record types reachable from the CLI, by table name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Events,
    Users,
}

/// One stdin request
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Request {
    pub record: RecordKind,
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub params: Map<String, Value>,
    #[serde(default)]
    pub data: Option<Value>,
}

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Get { config } => run_operation(&config, Operation::Get),
        Command::Query { config } => run_operation(&config, Operation::Query),
        Command::Create { config } => run_operation(&config, Operation::Create),
        Command::Update { config } => run_operation(&config, Operation::Update),
        Command::Delete { config } => run_operation(&config, Operation::Delete),
        Command::Explain { config } => run_operation(&config, Operation::Explain),
    }
}

fn run_operation(config_path: &Path, operation: Operation) -> CliResult<()> {
    let config = RepoConfig::load(config_path)?;
    Logger::route_all_to_stderr(true);
    Logger::set_min_severity(config.severity()?);
    Logger::info(
        "CONFIG_LOADED",
        &[("database_path", config.database_path.as_str())],
    );

    let executor = SqliteExecutor::open(config.database_path())
        .map_err(|e| CliError::storage_unavailable(e.to_string()))?;
    let repo = Repository::with_config(executor, config.query.clone());

    let request = read_request()?;
    match dispatch(&repo, operation, request) {
        Ok(data) => write_response(data),
        Err(e) if e.is_request_error() => write_error(e.code_str(), e.message()),
        Err(e) => Err(e),
    }
}

/// Decodes `request` and runs `operation` against the requested record type
pub fn dispatch<E: Executor>(
    repo: &Repository<E>,
    operation: Operation,
    request: Value,
) -> CliResult<Value> {
    let request: Request = serde_json::from_value(request)
        .map_err(|e| CliError::invalid_request(e.to_string()))?;
    match request.record {
        RecordKind::Events => apply::<Event, E>(repo, operation, request),
        RecordKind::Users => apply::<User, E>(repo, operation, request),
    }
}

fn apply<R, E>(repo: &Repository<E>, operation: Operation, request: Request) -> CliResult<Value>
where
    R: Record + Serialize + DeserializeOwned,
    E: Executor,
{
    match operation {
        Operation::Get => {
            let record: R = repo.get_by_id(required_id(&request)?)?;
            Ok(serde_json::to_value(record)?)
        }
        Operation::Query => {
            let records: Vec<R> = repo.query_many(&query_params(request.params)?)?;
            Ok(serde_json::to_value(records)?)
        }
        Operation::Create => {
            let record: R = record_from(request.data)?;
            let id = repo.create(&record)?;
            Ok(json!({ "id": id }))
        }
        Operation::Update => {
            let record: R = record_from(request.data)?;
            if record.id() <= 0 {
                return Err(CliError::invalid_request("update requires data.id"));
            }
            repo.update(&record)?;
            Ok(json!({ "id": record.id() }))
        }
        Operation::Delete => {
            let record: R = repo.get_by_id(required_id(&request)?)?;
            repo.delete(&record)?;
            Ok(serde_json::to_value(record)?)
        }
        Operation::Explain => {
            let statement = repo.explain::<R>(&query_params(request.params)?)?;
            Ok(serde_json::to_value(statement)?)
        }
    }
}

fn required_id(request: &Request) -> CliResult<i64> {
    request
        .id
        .ok_or_else(|| CliError::invalid_request("missing field `id`"))
}

fn record_from<R: DeserializeOwned>(data: Option<Value>) -> CliResult<R> {
    let data = data.ok_or_else(|| CliError::invalid_request("missing field `data`"))?;
    serde_json::from_value(data).map_err(|e| CliError::invalid_request(e.to_string()))
}

/// Flattens JSON scalars to the string values the query grammar expects
fn query_params(params: Map<String, Value>) -> CliResult<HashMap<String, String>> {
    params
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                other => {
                    return Err(CliError::invalid_request(format!(
                        "query parameter '{}' must be a string or number, got {}",
                        key, other
                    )))
                }
            };
            Ok((key, value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::super::errors::CliErrorCode;
    use super::*;
    use crate::error::RepoErrorCode;

    const SCHEMA: &str = "
        CREATE TABLE users (
            id INTEGER PRIMARY KEY,
            email TEXT NOT NULL,
            password TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%f', 'now') || '000Z')
        );
    ";

    fn repo() -> Repository<SqliteExecutor> {
        let executor = SqliteExecutor::open_in_memory().unwrap();
        executor.execute_batch(SCHEMA).unwrap();
        Repository::new(executor)
    }

    fn create_user(repo: &Repository<SqliteExecutor>, email: &str) -> i64 {
        let data = dispatch(
            repo,
            Operation::Create,
            json!({"record": "users", "data": {"email": email, "password": "hunter22"}}),
        )
        .unwrap();
        data["id"].as_i64().unwrap()
    }

    #[test]
    fn test_create_then_get() {
        let repo = repo();
        let id = create_user(&repo, "ada@example.com");
        assert_eq!(id, 1);

        let user = dispatch(&repo, Operation::Get, json!({"record": "users", "id": id})).unwrap();
        assert_eq!(user["email"], "ada@example.com");
        assert_eq!(user["id"], 1);
        assert!(user["createdAt"].as_str().is_some());
    }

    #[test]
    fn test_query_accepts_numeric_params() {
        let repo = repo();
        for i in 0..3 {
            create_user(&repo, &format!("user{}@example.com", i));
        }
        let users = dispatch(
            &repo,
            Operation::Query,
            json!({"record": "users", "params": {"limit": 2, "sortBy": "-id"}}),
        )
        .unwrap();
        let ids: Vec<i64> = users
            .as_array()
            .unwrap()
            .iter()
            .map(|u| u["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![3, 2]);
    }

    #[test]
    fn test_update_and_delete() {
        let repo = repo();
        let id = create_user(&repo, "old@example.com");
        dispatch(
            &repo,
            Operation::Update,
            json!({"record": "users", "data": {"id": id, "email": "new@example.com", "password": "x"}}),
        )
        .unwrap();

        let deleted = dispatch(&repo, Operation::Delete, json!({"record": "users", "id": id})).unwrap();
        assert_eq!(deleted["email"], "new@example.com");

        let err = dispatch(&repo, Operation::Get, json!({"record": "users", "id": id})).unwrap_err();
        assert_eq!(err.code(), CliErrorCode::Repository(RepoErrorCode::NotFound));
    }

    #[test]
    fn test_explain() {
        let repo = repo();
        let statement = dispatch(
            &repo,
            Operation::Explain,
            json!({"record": "events", "params": {"name": "Rust meetup"}}),
        )
        .unwrap();
        assert_eq!(
            statement["sql"],
            "SELECT id, user_id, name, description, start_date, created_at, max_attendees \
             FROM events WHERE name = $1 ORDER BY id ASC LIMIT $2 OFFSET $3"
        );
        assert_eq!(statement["params"], json!(["Rust meetup", 10, 0]));
    }

    #[test]
    fn test_invalid_requests() {
        let repo = repo();
        let cases = [
            (Operation::Get, json!({"record": "users"})),
            (Operation::Get, json!({"record": "widgets", "id": 1})),
            (Operation::Create, json!({"record": "users"})),
            (Operation::Update, json!({"record": "users", "data": {"email": "a@b.c"}})),
            (Operation::Query, json!({"record": "users", "params": {"email": ["a"]}})),
            (Operation::Query, json!({"record": "users", "extra": true})),
        ];
        for (operation, request) in cases {
            let err = dispatch(&repo, operation, request.clone()).unwrap_err();
            assert_eq!(err.code(), CliErrorCode::InvalidRequest, "{}", request);
        }
    }

    #[test]
    fn test_repository_errors_surface_with_codes() {
        let repo = repo();
        let err = dispatch(
            &repo,
            Operation::Query,
            json!({"record": "users", "params": {"noSuchThing": "x"}}),
        )
        .unwrap_err();
        assert_eq!(err.code_str(), "ROWMAP_INVALID_QUERY_PARAMETER");
        assert!(err.is_request_error());
    }
}
