//! Utilities: environment configuration and logging setup.

/// Environment-sourced process configuration.
pub mod config;
/// Tracing subscriber initialisation.
pub mod logging;
