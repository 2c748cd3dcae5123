//! ora-bind - parameterized Oracle SQL execution for workflow nodes.
//!
//! Binds named parameters (with optional IN-list expansion), executes the
//! statement over a single owned connection, and returns rows as output items.

pub mod bind;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod node;
pub mod query;
