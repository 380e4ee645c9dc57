//! Rule violations and the diagnostics built from them.

use crate::RuleSeverity;

/// A single violation raised by a rule.
///
/// Lines and columns are 1-based, in the coordinates of the outermost script.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Violation {
    /// Rule identifier (e.g., `"missing-nolock"`)
    pub rule_name: String,
    /// Human-readable message
    pub message: String,
    pub line: u32,
    pub column: u32,
}

impl Violation {
    #[must_use]
    pub fn new(
        rule_name: impl Into<String>,
        message: impl Into<String>,
        line: u32,
        column: u32,
    ) -> Self {
        Self {
            rule_name: rule_name.into(),
            message: message.into(),
            line,
            column,
        }
    }
}

/// A violation together with the severity configured for its rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LintDiagnostic {
    pub violation: Violation,
    pub severity: RuleSeverity,
}

impl LintDiagnostic {
    #[must_use]
    pub const fn new(violation: Violation, severity: RuleSeverity) -> Self {
        Self {
            violation,
            severity,
        }
    }

    #[must_use]
    pub fn rule_name(&self) -> &str {
        &self.violation.rule_name
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.violation.message
    }

    #[must_use]
    pub const fn line(&self) -> u32 {
        self.violation.line
    }

    #[must_use]
    pub const fn column(&self) -> u32 {
        self.violation.column
    }
}

impl std::fmt::Display for LintDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}: {} {} ({})",
            self.violation.line,
            self.violation.column,
            self.severity,
            self.violation.message,
            self.violation.rule_name
        )
    }
}
