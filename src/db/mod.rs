//! Database abstraction layer for ora-bind.
//!
//! Provides a trait-based interface over the database driver so the node can
//! run against Oracle or an in-memory mock interchangeably.

mod mock;
mod oracle_client;
mod types;

pub use mock::{ExecutedStatement, MockConnector, MockDatabaseClient, MockFailure};
pub use oracle_client::{OracleClient, OracleConnector};
pub use types::{ColumnInfo, ExecuteOptions, QueryResult, Record, Value};

use crate::bind::BindMap;
use crate::config::Credentials;
use crate::error::Result;
use async_trait::async_trait;

/// Supported database backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseBackend {
    Oracle,
    /// In-memory client that records statements instead of running them.
    Mock,
}

impl DatabaseBackend {
    /// Returns the backend as a string for logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Oracle => "oracle",
            Self::Mock => "mock",
        }
    }
}

/// Creates the connector for the given backend.
///
/// This is the central factory for database connections.
pub fn connector(backend: DatabaseBackend) -> Box<dyn Connector> {
    match backend {
        DatabaseBackend::Oracle => Box::new(OracleConnector),
        DatabaseBackend::Mock => Box::new(MockConnector::default()),
    }
}

/// Opens connections from credentials.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Opens a new connection owned by the caller.
    async fn connect(&self, credentials: &Credentials) -> Result<Box<dyn DatabaseClient>>;
}

/// Trait defining the interface for an open database connection.
///
/// All database operations are async and return Results with NodeError.
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// Executes a statement with named binds and returns rows as records.
    async fn execute(
        &self,
        sql: &str,
        binds: &BindMap,
        options: ExecuteOptions,
    ) -> Result<QueryResult>;

    /// Closes the database connection.
    async fn close(&self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_names() {
        assert_eq!(DatabaseBackend::Oracle.as_str(), "oracle");
        assert_eq!(DatabaseBackend::Mock.as_str(), "mock");
    }

    #[tokio::test]
    async fn test_mock_connector_from_factory() {
        let connector = connector(DatabaseBackend::Mock);
        let client = connector.connect(&Credentials::default()).await.unwrap();
        let result = client
            .execute("SELECT 1 FROM dual", &BindMap::new(), ExecuteOptions::default())
            .await
            .unwrap();
        assert_eq!(result.row_count(), 1);
        client.close().await.unwrap();
    }
}
