//! Error types for ora-bind.
//!
//! Defines the main error enum used throughout the crate.

use thiserror::Error;

/// Prefix attached to every failure surfaced to the host.
pub const DATABASE_ERROR_PREFIX: &str = "Oracle Database Error";

/// Main error type for ora-bind operations.
#[derive(Error, Debug)]
pub enum NodeError {
    /// Database connection errors (listener unreachable, auth failed, etc.)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Statement execution errors (syntax errors, constraint violations, bind mismatches, etc.)
    #[error("Query error: {0}")]
    Query(String),

    /// Configuration errors (invalid config file, missing credentials, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// User-facing operational error raised by the node for any failed invocation.
    #[error("Oracle Database Error: {0}")]
    Database(String),

    /// Internal errors (join failures, poisoned locks, bugs, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl NodeError {
    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a query error with the given message.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a database error with the given message.
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Wraps any error into the single user-facing database error.
    ///
    /// An error that is already a `Database` error is returned unchanged so the
    /// prefix never appears twice.
    pub fn wrap_database(self) -> Self {
        match self {
            Self::Database(_) => self,
            other => Self::Database(other.message().to_string()),
        }
    }

    /// Returns the inner message without the category prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Connection(msg)
            | Self::Query(msg)
            | Self::Config(msg)
            | Self::Database(msg)
            | Self::Internal(msg) => msg,
        }
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Connection(_) => "Connection Error",
            Self::Query(_) => "Query Error",
            Self::Config(_) => "Configuration Error",
            Self::Database(_) => DATABASE_ERROR_PREFIX,
            Self::Internal(_) => "Internal Error",
        }
    }
}

/// Result type alias using NodeError.
pub type Result<T> = std::result::Result<T, NodeError>;
