//! Mock database client for testing.
//!
//! Records every statement it receives instead of running it, and can be
//! told to fail at connect, execute, or close.

use super::{
    ColumnInfo, Connector, DatabaseClient, ExecuteOptions, QueryResult, Record, Value,
};
use crate::bind::BindMap;
use crate::config::Credentials;
use crate::error::{NodeError, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Where a mock client should fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockFailure {
    Connect(String),
    Execute(String),
    Close(String),
}

/// A statement received by the mock client.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutedStatement {
    pub sql: String,
    pub binds: BindMap,
    pub options: ExecuteOptions,
}

#[derive(Debug, Default)]
struct MockState {
    connects: usize,
    executed: Vec<ExecutedStatement>,
    closes: usize,
}

/// A mock database client that returns predefined results.
///
/// Clones share the recorded state, so a test can keep one handle while the
/// connector hands out others.
#[derive(Debug, Clone, Default)]
pub struct MockDatabaseClient {
    result: Option<QueryResult>,
    failures: Vec<MockFailure>,
    state: Arc<Mutex<MockState>>,
}

impl MockDatabaseClient {
    /// Creates a new mock client with the default canned behavior.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `result` from every execute call.
    pub fn with_result(mut self, result: QueryResult) -> Self {
        self.result = Some(result);
        self
    }

    /// Returns `rows` from every execute call.
    pub fn with_rows(self, rows: Vec<Record>) -> Self {
        let columns = rows
            .first()
            .map(|row| row.column_names().map(|name| ColumnInfo::new(name, "VARCHAR2")).collect())
            .unwrap_or_default();
        self.with_result(QueryResult::with_rows(columns, rows))
    }

    /// Fails at the given step. Can be chained to fail at several steps.
    pub fn failing(mut self, failure: MockFailure) -> Self {
        self.failures.push(failure);
        self
    }

    /// Statements received so far, in order.
    pub fn executed(&self) -> Vec<ExecutedStatement> {
        self.state().executed.clone()
    }

    /// Number of successful connects made through a `MockConnector`.
    pub fn connect_count(&self) -> usize {
        self.state().connects
    }

    /// Number of close calls, including failed ones.
    pub fn close_count(&self) -> usize {
        self.state().closes
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn connect_failure(&self) -> Option<String> {
        self.failures.iter().find_map(|f| match f {
            MockFailure::Connect(msg) => Some(msg.clone()),
            _ => None,
        })
    }

    fn execute_failure(&self) -> Option<String> {
        self.failures.iter().find_map(|f| match f {
            MockFailure::Execute(msg) => Some(msg.clone()),
            _ => None,
        })
    }

    fn close_failure(&self) -> Option<String> {
        self.failures.iter().find_map(|f| match f {
            MockFailure::Close(msg) => Some(msg.clone()),
            _ => None,
        })
    }

    fn canned_result(&self, sql: &str) -> QueryResult {
        if let Some(result) = &self.result {
            return result.clone();
        }

        if sql.trim_start().to_uppercase().starts_with("SELECT") {
            // Return a simple result with one row
            let row = Record::new().with("RESULT", Value::String(format!("Mock result for: {sql}")));
            QueryResult::with_rows(vec![ColumnInfo::new("RESULT", "VARCHAR2")], vec![row])
        } else {
            // For non-SELECT statements, return no rows
            QueryResult::with_rows_affected(0)
        }
    }
}

#[async_trait]
impl DatabaseClient for MockDatabaseClient {
    async fn execute(
        &self,
        sql: &str,
        binds: &BindMap,
        options: ExecuteOptions,
    ) -> Result<QueryResult> {
        self.state().executed.push(ExecutedStatement {
            sql: sql.to_string(),
            binds: binds.clone(),
            options,
        });

        if let Some(msg) = self.execute_failure() {
            return Err(NodeError::query(msg));
        }

        Ok(self
            .canned_result(sql)
            .with_execution_time(Duration::from_millis(1)))
    }

    async fn close(&self) -> Result<()> {
        self.state().closes += 1;

        if let Some(msg) = self.close_failure() {
            return Err(NodeError::connection(msg));
        }
        Ok(())
    }
}

/// Hands out clones of one `MockDatabaseClient`.
#[derive(Debug, Clone, Default)]
pub struct MockConnector {
    client: MockDatabaseClient,
}

impl MockConnector {
    pub fn new(client: MockDatabaseClient) -> Self {
        Self { client }
    }

    /// The shared client, for inspecting what was executed.
    pub fn client(&self) -> &MockDatabaseClient {
        &self.client
    }
}

#[async_trait]
impl Connector for MockConnector {
    async fn connect(&self, _credentials: &Credentials) -> Result<Box<dyn DatabaseClient>> {
        if let Some(msg) = self.client.connect_failure() {
            return Err(NodeError::connection(msg));
        }

        self.client.state().connects += 1;
        Ok(Box::new(self.client.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bind::{bind_parameters, DataType, ParameterDescriptor};

    #[tokio::test]
    async fn test_mock_select() {
        let client = MockDatabaseClient::new();
        let result = client
            .execute("SELECT 1 FROM dual", &BindMap::new(), ExecuteOptions::default())
            .await
            .unwrap();
        assert_eq!(result.row_count(), 1);
        assert_eq!(result.columns.len(), 1);
    }

    #[tokio::test]
    async fn test_mock_insert() {
        let client = MockDatabaseClient::new();
        let result = client
            .execute(
                "INSERT INTO test VALUES (1)",
                &BindMap::new(),
                ExecuteOptions::default(),
            )
            .await
            .unwrap();
        assert_eq!(result.row_count(), 0);
        assert_eq!(result.rows_affected, Some(0));
    }

    #[tokio::test]
    async fn test_mock_records_statements() {
        let client = MockDatabaseClient::new();
        let bound = bind_parameters(
            "SELECT id FROM t WHERE id = :x",
            &[ParameterDescriptor::new("x", "5", DataType::Number)],
        );

        client
            .execute(&bound.sql, &bound.binds, ExecuteOptions::default())
            .await
            .unwrap();

        let executed = client.executed();
        assert_eq!(executed.len(), 1);
        assert_eq!(executed[0].sql, "SELECT id FROM t WHERE id = :x");
        assert_eq!(executed[0].binds, bound.binds);
        assert!(executed[0].options.auto_commit);
    }

    #[tokio::test]
    async fn test_mock_canned_rows() {
        let client = MockDatabaseClient::new().with_rows(vec![
            Record::new().with("ID", 1i64).with("NAME", "a"),
            Record::new().with("ID", 2i64).with("NAME", "b"),
        ]);

        let result = client
            .execute("SELECT id, name FROM t", &BindMap::new(), ExecuteOptions::default())
            .await
            .unwrap();

        assert_eq!(result.row_count(), 2);
        assert_eq!(result.columns[1].name, "NAME");
        assert_eq!(result.rows[1].get("ID"), Some(&Value::Int(2)));
    }

    #[tokio::test]
    async fn test_mock_failures() {
        let connector = MockConnector::new(
            MockDatabaseClient::new().failing(MockFailure::Connect("ORA-12541".to_string())),
        );
        let err = connector.connect(&Credentials::default()).await.err().unwrap();
        assert!(matches!(err, NodeError::Connection(_)));
        assert_eq!(connector.client().connect_count(), 0);

        let client = MockDatabaseClient::new().failing(MockFailure::Execute("ORA-00942".to_string()));
        let err = client
            .execute("SELECT * FROM missing", &BindMap::new(), ExecuteOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Query error: ORA-00942");
        assert_eq!(client.executed().len(), 1);

        let client = MockDatabaseClient::new().failing(MockFailure::Close("ORA-03113".to_string()));
        assert!(client.close().await.is_err());
        assert_eq!(client.close_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_fails_at_several_steps() {
        let client = MockDatabaseClient::new()
            .failing(MockFailure::Execute("ORA-00942".to_string()))
            .failing(MockFailure::Close("ORA-03113".to_string()));

        let err = client
            .execute("SELECT * FROM missing", &BindMap::new(), ExecuteOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Query error: ORA-00942");

        let err = client.close().await.unwrap_err();
        assert_eq!(err.to_string(), "Connection error: ORA-03113");
        assert_eq!(client.close_count(), 1);
    }

    #[tokio::test]
    async fn test_connector_shares_state_with_handle() {
        let connector = MockConnector::default();
        let conn = connector.connect(&Credentials::default()).await.unwrap();
        conn.execute("DELETE FROM t", &BindMap::new(), ExecuteOptions::default())
            .await
            .unwrap();
        conn.close().await.unwrap();

        assert_eq!(connector.client().connect_count(), 1);
        assert_eq!(connector.client().executed().len(), 1);
        assert_eq!(connector.client().close_count(), 1);
    }
}
