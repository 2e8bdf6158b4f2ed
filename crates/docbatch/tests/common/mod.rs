//! Shared test utilities for docbatch integration tests.
//!
//! This module provides:
//! - `TestHarness` for isolated test execution with temp directories
//! - `ScriptedProcessor`, an instrumented step processor with configurable
//!   delays, failures and gating
//! - Builders for workflows

pub mod builders;
pub mod harness;
pub mod processors;

pub use builders::*;
pub use harness::TestHarness;
pub use processors::ScriptedProcessor;
