//! Test utilities
//!
//! Manual mock implementations and test fixtures for unit testing.
//!
//! Manual mocks instead of mockall: the port has an associated type and
//! `&PageRequest` parameters, and tests need to hold calls open to exercise
//! the controller's round guards.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
