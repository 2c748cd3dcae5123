//! Node invocations against a live Oracle database.

use ora_bind::bind::{DataType, ParameterDescriptor};
use ora_bind::config::{Credentials, NodeDefinition};
use ora_bind::db::{OracleConnector, Value};
use ora_bind::node::{OracleDatabaseNode, StaticContext};

/// Helper to get test credentials from environment.
fn get_test_credentials() -> Option<Credentials> {
    Some(Credentials::new(
        std::env::var("ORACLE_TEST_USER").ok()?,
        std::env::var("ORACLE_TEST_PASSWORD").ok()?,
        std::env::var("ORACLE_TEST_CONNECT_STRING").ok()?,
    ))
}

#[tokio::test]
async fn test_select_with_scalar_bind() {
    let Some(credentials) = get_test_credentials() else {
        eprintln!("Skipping test: ORACLE_TEST_* not set");
        return;
    };

    let ctx = StaticContext::new(
        NodeDefinition {
            query: "SELECT :x AS val FROM dual".to_string(),
            params: vec![ParameterDescriptor::new("x", "5", DataType::Number)],
        },
        credentials,
    );

    let items = OracleDatabaseNode
        .execute(&ctx, &OracleConnector)
        .await
        .unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].json.get("VAL"), Some(&Value::Int(5)));
}

#[tokio::test]
async fn test_select_with_in_list() {
    let Some(credentials) = get_test_credentials() else {
        eprintln!("Skipping test: ORACLE_TEST_* not set");
        return;
    };

    let ctx = StaticContext::new(
        NodeDefinition {
            query: "SELECT level AS n FROM dual WHERE level IN (:ids) CONNECT BY level <= 10 ORDER BY n"
                .to_string(),
            params: vec![ParameterDescriptor::list("ids", "3, 7, 9", DataType::Number)],
        },
        credentials,
    );

    let items = OracleDatabaseNode
        .execute(&ctx, &OracleConnector)
        .await
        .unwrap();

    let values: Vec<&Value> = items.iter().filter_map(|i| i.json.get("N")).collect();
    assert_eq!(values, vec![&Value::Int(3), &Value::Int(7), &Value::Int(9)]);
}

#[tokio::test]
async fn test_sql_error_is_wrapped() {
    let Some(credentials) = get_test_credentials() else {
        eprintln!("Skipping test: ORACLE_TEST_* not set");
        return;
    };

    let ctx = StaticContext::new(
        NodeDefinition {
            query: "SELECT * FROM ora_bind_missing_table_xyz".to_string(),
            params: vec![],
        },
        credentials,
    );

    let err = OracleDatabaseNode
        .execute(&ctx, &OracleConnector)
        .await
        .unwrap_err();

    let message = err.to_string();
    assert!(message.starts_with("Oracle Database Error: "));
    assert!(message.contains("ORA-00942"));
}

#[tokio::test]
async fn test_bad_listener_is_wrapped() {
    let ctx = StaticContext::new(
        NodeDefinition {
            query: "SELECT 1 FROM dual".to_string(),
            params: vec![],
        },
        Credentials::new("scott", "tiger", "nonexistent.invalid.host:1521/NOPE"),
    );

    // Without an Oracle client library installed this fails too, with a
    // DPI error instead of a TNS error; either way it is wrapped.
    let err = OracleDatabaseNode
        .execute(&ctx, &OracleConnector)
        .await
        .unwrap_err();

    assert!(err.to_string().starts_with("Oracle Database Error: "));
}
