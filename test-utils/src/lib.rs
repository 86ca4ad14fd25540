//! Shared test utilities for the pactum crates.
//!
//! This crate provides:
//! - Proptest generators for matcher trees, selectors and names
//! - Mock implementations of the mock server, port allocator,
//!   verification engine and failure reporter
//! - Test fixtures with sample bodies and contracts

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod mocks;

pub use generators::*;
