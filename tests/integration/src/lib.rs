//! Integration test utilities for the query guard
//!
//! This crate provides helpers for running end-to-end tests against
//! the HTTP API with in-memory executors and audit sinks.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
