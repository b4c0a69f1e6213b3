//! Test infrastructure shared by unit and integration tests
//!
//! - JDK fixtures (on-disk installations and archives)
//! - Mock distributor and in-memory environment store

#![allow(clippy::unwrap_used)]

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
