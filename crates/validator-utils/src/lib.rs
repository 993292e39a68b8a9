//! Shared utilities for the startup validator
//!
//! Logging setup and process-level configuration used by the CLI and the
//! agents crate.

pub mod config;
pub mod logging;

pub use config::Config;
pub use logging::{LogFormat, init_tracing, init_tracing_with};
