//! Test utilities
//!
//! Manual mock implementations and test fixtures for unit testing.
//! The mocks record their calls and can be gated so tests control
//! exactly when an in-flight request completes.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
