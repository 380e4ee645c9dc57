//! # T-SQL Linter
//!
//! Rule visitor framework and the built-in rules.
//!
//! ```
//! use tsql_config::Configuration;
//! use tsql_linter::Linter;
//! # struct Quiet;
//! # impl tsql_types::Reporter for Quiet {
//! #     fn report(&self, _: &str) {}
//! #     fn report_violation(&self, _: &tsql_types::LintDiagnostic) {}
//! # }
//!
//! let config =
//!     Configuration::from_json(r#"{"rules":{"missing-nolock":"error"}}"#, &Quiet).unwrap();
//! let linter = Linter::new(&config);
//! let diagnostics = linter.lint_source("SELECT * FROM Orders").unwrap();
//! assert_eq!(diagnostics.len(), 1);
//! assert_eq!(diagnostics[0].to_string(),
//!     "1:15: error Missing nolock found in a select statement (missing-nolock)");
//! ```

pub mod columns;
mod context;
mod dispatch;
mod linter;
mod registry;
mod rules;
mod traits;

pub use context::{Emitter, ScriptContext};
pub use linter::Linter;
pub use registry::{all_rule_names, all_rules};
pub use rules::{MissingNolockRuleImpl, MissingNolockState};
pub use traits::{ErasedRule, FragmentLintRule, Interest, LintRule, RuleSession};

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use tsql_linter::prelude::*;
/// ```
pub mod prelude {
    pub use crate::context::{Emitter, ScriptContext};
    pub use crate::linter::Linter;
    pub use crate::traits::{FragmentLintRule, Interest, LintRule};
    pub use tsql_types::{LintDiagnostic, RuleSeverity};
}
