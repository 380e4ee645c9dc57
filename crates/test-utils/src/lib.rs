//! # T-SQL Test Utilities
//!
//! Shared test infrastructure for the linting crates: a reporter that
//! records everything it receives, and helpers that format diagnostics
//! for snapshot assertions.

// Test utilities are less strict than production code
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_panics_doc)]

pub mod assertions;
pub mod reporter;

pub use assertions::{format_diagnostics, format_messages};
pub use reporter::RecordingReporter;
