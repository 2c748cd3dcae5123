//! Statement execution over a single owned connection.
//!
//! Acquires a connection, runs one bound statement, and releases the
//! connection on every exit path. Any failure is surfaced as one
//! `NodeError::Database` carrying the driver's message.

use std::fmt;
use std::time::{Duration, Instant};

use tracing::{debug, error};

use crate::bind::BoundQuery;
use crate::config::Credentials;
use crate::db::{Connector, DatabaseClient, ExecuteOptions, QueryResult};
use crate::error::{NodeError, Result};

/// Lifecycle of one execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionState {
    Idle,
    Connecting,
    Executing,
    Closing,
    Done,
    Failed,
}

impl fmt::Display for ExecutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Connecting => "connecting",
            Self::Executing => "executing",
            Self::Closing => "closing",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Runs bound statements against connections opened by a `Connector`.
pub struct QueryExecutor<'a> {
    connector: &'a dyn Connector,
    options: ExecuteOptions,
    state: ExecutionState,
}

impl<'a> QueryExecutor<'a> {
    /// Creates an executor that commits as part of every execute call.
    pub fn new(connector: &'a dyn Connector) -> Self {
        Self {
            connector,
            options: ExecuteOptions::default(),
            state: ExecutionState::Idle,
        }
    }

    /// Overrides the execute options.
    pub fn with_options(mut self, options: ExecuteOptions) -> Self {
        self.options = options;
        self
    }

    /// Current lifecycle state; `Done` or `Failed` after `run` returns.
    pub fn state(&self) -> ExecutionState {
        self.state
    }

    /// Connects, executes `bound`, and closes the connection.
    ///
    /// No retry and no partial results. A close failure is logged and never
    /// replaces the execute outcome.
    pub async fn run(
        &mut self,
        credentials: &Credentials,
        bound: &BoundQuery,
    ) -> Result<QueryOutcome> {
        let outcome = self.run_once(credentials, bound).await;

        match &outcome {
            Ok(_) => self.transition(ExecutionState::Done),
            Err(e) => {
                self.transition(ExecutionState::Failed);
                debug!("Execution failed: {}", e);
            }
        }

        outcome.map_err(NodeError::wrap_database)
    }

    async fn run_once(
        &mut self,
        credentials: &Credentials,
        bound: &BoundQuery,
    ) -> Result<QueryOutcome> {
        self.transition(ExecutionState::Connecting);
        let client = self.connector.connect(credentials).await?;

        self.transition(ExecutionState::Executing);
        debug!("Executing: {}", bound.describe());
        let start = Instant::now();
        let result = client.execute(&bound.sql, &bound.binds, self.options).await;
        let execution_time = start.elapsed();

        self.transition(ExecutionState::Closing);
        release(client.as_ref()).await;

        let result = result?;
        debug!(
            "Statement finished in {:?} with {} row(s)",
            execution_time,
            result.row_count()
        );

        Ok(QueryOutcome {
            result,
            execution_time,
        })
    }

    fn transition(&mut self, next: ExecutionState) {
        debug!("Execution state: {} -> {}", self.state, next);
        self.state = next;
    }
}

/// Closes `client`, logging instead of propagating a failure.
async fn release(client: &dyn DatabaseClient) {
    if let Err(e) = client.close().await {
        error!("Failed to close the database connection: {}", e);
    }
}

/// Successful execution outcome.
#[derive(Debug)]
pub struct QueryOutcome {
    /// The statement result.
    pub result: QueryResult,
    /// How long the execute call took, excluding connect and close.
    pub execution_time: Duration,
}
