//! Configuration management for procpipe
//!
//! Hierarchical configuration with discovery and precedence:
//! CLI > file > defaults. Configuration files are TOML with `[runner]` and
//! `[logging]` sections.

mod builder;
mod discovery;
mod error;
mod model;
mod sources;
mod validation;

pub use builder::ConfigBuilder;
pub use error::ConfigError;
pub use model::{CliArgs, Config, ConfigSource, LoggingConfig, RunnerConfig};
