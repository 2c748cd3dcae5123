//! The Oracle node: binds the configured parameters, runs the statement, and
//! hands rows back to the host as output items.

mod description;

pub use description::{NodeDescription, CREDENTIALS_NAME};

use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

use crate::bind::{bind_parameters, ParameterDescriptor};
use crate::config::{Credentials, NodeDefinition};
use crate::db::{Connector, Record};
use crate::error::{NodeError, Result};
use crate::query::QueryExecutor;

/// What the node needs from the host for one invocation.
#[async_trait]
pub trait NodeContext: Send + Sync {
    /// Resolves the named credential set.
    async fn credentials(&self, name: &str) -> Result<Credentials>;

    /// The SQL template.
    fn query(&self) -> Result<String>;

    /// Parameter descriptors in the order they were entered.
    fn parameters(&self) -> Vec<ParameterDescriptor>;
}

/// A context backed by an already-loaded definition and credential set.
#[derive(Debug, Clone)]
pub struct StaticContext {
    definition: NodeDefinition,
    credentials: Credentials,
}

impl StaticContext {
    pub fn new(definition: NodeDefinition, credentials: Credentials) -> Self {
        Self {
            definition,
            credentials,
        }
    }
}

#[async_trait]
impl NodeContext for StaticContext {
    async fn credentials(&self, _name: &str) -> Result<Credentials> {
        Ok(self.credentials.clone())
    }

    fn query(&self) -> Result<String> {
        if self.definition.query.trim().is_empty() {
            return Err(NodeError::config("SQL Statement is required"));
        }
        Ok(self.definition.query.clone())
    }

    fn parameters(&self) -> Vec<ParameterDescriptor> {
        self.definition.params.clone()
    }
}

/// One item on the node's main output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputItem {
    pub json: Record,
}

/// Wraps each record as its own output item.
pub fn return_json_array(records: Vec<Record>) -> Vec<OutputItem> {
    records.into_iter().map(|json| OutputItem { json }).collect()
}

/// Executes parameterized SQL against Oracle.
#[derive(Debug, Clone, Copy, Default)]
pub struct OracleDatabaseNode;

impl OracleDatabaseNode {
    pub fn description(&self) -> NodeDescription {
        NodeDescription::oracle_database()
    }

    /// Runs one invocation. Every failure is reported as a single
    /// `NodeError::Database`.
    pub async fn execute(
        &self,
        ctx: &dyn NodeContext,
        connector: &dyn Connector,
    ) -> Result<Vec<OutputItem>> {
        let credentials = ctx
            .credentials(CREDENTIALS_NAME)
            .await
            .map_err(NodeError::wrap_database)?;
        let query = ctx.query().map_err(NodeError::wrap_database)?;
        let bound = bind_parameters(&query, &ctx.parameters());

        let outcome = QueryExecutor::new(connector)
            .run(&credentials, &bound)
            .await?;

        info!(
            "Statement returned {} row(s) in {:?}",
            outcome.result.row_count(),
            outcome.execution_time
        );

        Ok(return_json_array(outcome.result.rows))
    }
}
