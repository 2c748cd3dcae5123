//! End-to-end node invocations against the mock client.

use ora_bind::bind::{BindValue, DataType, ParameterDescriptor};
use ora_bind::config::{Credentials, NodeDefinition};
use ora_bind::db::{MockConnector, MockDatabaseClient, MockFailure, Record, Value};
use ora_bind::error::NodeError;
use ora_bind::node::{OracleDatabaseNode, StaticContext};
use pretty_assertions::assert_eq;

fn context(query: &str, params: Vec<ParameterDescriptor>) -> StaticContext {
    StaticContext::new(
        NodeDefinition {
            query: query.to_string(),
            params,
        },
        Credentials::new("scott", "tiger", "localhost:1521/FREEPDB1"),
    )
}

#[tokio::test]
async fn test_scalar_bind_reaches_driver_unchanged() {
    let connector = MockConnector::new(
        MockDatabaseClient::new().with_rows(vec![Record::new().with("ID", 5i64)]),
    );
    let ctx = context(
        "SELECT id FROM t WHERE id = :x",
        vec![ParameterDescriptor::new("x", "5", DataType::Number)],
    );

    let items = OracleDatabaseNode.execute(&ctx, &connector).await.unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].json.get("ID"), Some(&Value::Int(5)));

    let executed = connector.client().executed();
    assert_eq!(executed.len(), 1);
    assert_eq!(executed[0].sql, "SELECT id FROM t WHERE id = :x");
    assert_eq!(executed[0].binds.len(), 1);
    assert_eq!(executed[0].binds["x"].value, BindValue::Number(5.0));
    assert_eq!(executed[0].binds["x"].data_type, DataType::Number);
}

#[tokio::test]
async fn test_in_list_bind_reaches_driver_expanded() {
    let connector = MockConnector::default();
    let ctx = context(
        "SELECT * FROM t WHERE id IN (:ids)",
        vec![ParameterDescriptor::list("ids", "1,2,3", DataType::Number)],
    );

    OracleDatabaseNode.execute(&ctx, &connector).await.unwrap();

    let executed = connector.client().executed();
    let stmt = &executed[0];

    let mut values: Vec<f64> = stmt
        .binds
        .values()
        .filter_map(|p| p.value.as_number())
        .collect();
    values.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(values, vec![1.0, 2.0, 3.0]);

    let expected_list: Vec<String> = stmt.binds.keys().map(|k| format!(":{k}")).collect();
    for placeholder in &expected_list {
        assert!(stmt.sql.contains(placeholder.as_str()));
    }
    assert!(stmt.sql.starts_with("SELECT * FROM t WHERE id IN ((:ids"));
}

#[tokio::test]
async fn test_driver_failure_is_wrapped_and_connection_released() {
    let connector = MockConnector::new(
        MockDatabaseClient::new()
            .failing(MockFailure::Execute("ORA-00904: \"NAMEE\": invalid identifier".to_string())),
    );
    let ctx = context("SELECT namee FROM t", vec![]);

    let err = OracleDatabaseNode.execute(&ctx, &connector).await.unwrap_err();

    assert!(matches!(err, NodeError::Database(_)));
    assert!(err.to_string().starts_with("Oracle Database Error: "));
    assert!(err.to_string().contains("ORA-00904: \"NAMEE\": invalid identifier"));
    assert_eq!(connector.client().close_count(), 1);
}

#[tokio::test]
async fn test_empty_in_list_value_binds_one_entry() {
    let connector = MockConnector::default();
    let ctx = context(
        "SELECT * FROM t WHERE name IN :names",
        vec![ParameterDescriptor::list("names", "", DataType::String)],
    );

    OracleDatabaseNode.execute(&ctx, &connector).await.unwrap();

    let executed = connector.client().executed();
    assert_eq!(executed[0].binds.len(), 1);
    let only = executed[0].binds.values().next().unwrap();
    assert_eq!(only.value, BindValue::Text(String::new()));
}

#[tokio::test]
async fn test_close_failure_still_returns_rows() {
    let connector = MockConnector::new(
        MockDatabaseClient::new()
            .with_rows(vec![Record::new().with("OK", 1i64)])
            .failing(MockFailure::Close("ORA-03135: connection lost contact".to_string())),
    );
    let ctx = context("SELECT 1 AS ok FROM dual", vec![]);

    let items = OracleDatabaseNode.execute(&ctx, &connector).await.unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(connector.client().close_count(), 1);
}

#[tokio::test]
async fn test_execute_error_wins_over_close_error() {
    let connector = MockConnector::new(
        MockDatabaseClient::new()
            .failing(MockFailure::Execute("ORA-01722: invalid number".to_string()))
            .failing(MockFailure::Close("ORA-03135: connection lost contact".to_string())),
    );
    let ctx = context(
        "SELECT * FROM t WHERE id = :id",
        vec![ParameterDescriptor::new("id", "abc", DataType::Number)],
    );

    let err = OracleDatabaseNode.execute(&ctx, &connector).await.unwrap_err();

    assert_eq!(err.to_string(), "Oracle Database Error: ORA-01722: invalid number");
    assert_eq!(connector.client().close_count(), 1);
}

#[tokio::test]
async fn test_each_invocation_owns_its_connection() {
    let connector = MockConnector::default();
    let ctx = context("SELECT 1 FROM dual", vec![]);

    OracleDatabaseNode.execute(&ctx, &connector).await.unwrap();
    OracleDatabaseNode.execute(&ctx, &connector).await.unwrap();

    assert_eq!(connector.client().connect_count(), 2);
    assert_eq!(connector.client().close_count(), 2);
}
