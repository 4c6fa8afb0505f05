//! Configuration utilities.

/// TOML configuration file loading and validation.
pub mod toml_config;
