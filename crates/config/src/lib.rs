//! # T-SQL Lint Configuration
//!
//! Resolves and parses `.tsqllintrc` JSON files.
//!
//! Without an explicit path the first existing file of this cascade wins:
//!
//! 1. the path in the `tsqllintrc` environment variable
//! 2. `.tsqllintrc` in the current directory
//! 3. `.tsqllintrc` next to the running executable
//! 4. `.tsqllintrc` in the home directory
//!
//! When none exists a built-in default configuration is used. Problems are
//! reported through a [`tsql_types::Reporter`] and never abort the run.

pub mod compatibility;
mod config;
mod error;
mod loader;

pub use config::Configuration;
pub use error::{ConfigError, Result};
pub use loader::{
    load_config, resolve, resolve_with, SearchPaths, CONFIG_ENV_VAR, CONFIG_FILE_NAME,
};
