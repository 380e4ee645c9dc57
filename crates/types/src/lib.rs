//! Foundation types for T-SQL linting.
//!
//! This crate provides shared types used across the linting stack.
//! It has zero external dependencies, making it suitable as a foundation layer.
//!
//! # Type Categories
//!
//! - **Severity types**: [`RuleSeverity`]
//! - **Result types**: [`Violation`], [`LintDiagnostic`]
//! - **Output**: [`Reporter`]

mod reporter;
mod severity;
mod violation;

pub use reporter::Reporter;
pub use severity::{RuleSeverity, UnknownSeverity};
pub use violation::{LintDiagnostic, Violation};
