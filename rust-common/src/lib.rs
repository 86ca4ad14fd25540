//! Shared library for cross-cutting concerns in the pactum crates.
//!
//! This crate provides centralized implementations for:
//! - The platform error type and its classification into error kinds
//! - Tracing subscriber configuration

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod tracing_config;

pub use error::{ErrorKind, PlatformError};
pub use tracing_config::{TracingConfig, init_tracing};
