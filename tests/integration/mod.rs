//! Integration tests for ora-bind.

pub mod binding_test;
pub mod node_test;
pub mod oracle_test;
