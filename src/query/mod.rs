//! Statement execution for ora-bind.
//!
//! This module isolates connection handling and execution from the node's
//! host-facing glue.

pub mod executor;

pub use executor::{ExecutionState, QueryExecutor, QueryOutcome};
