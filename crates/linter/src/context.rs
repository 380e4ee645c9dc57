use tsql_syntax::{DynamicSqlOrigin, FragmentTree, Token};
use tsql_types::{LintDiagnostic, RuleSeverity, Violation};

/// Everything a rule may read while a script is walked.
///
/// Created fresh for each script and dropped after the walk.
#[derive(Debug, Clone, Copy)]
pub struct ScriptContext<'a> {
    pub tree: &'a FragmentTree,
    /// Set when the script is dynamic SQL embedded in an outer script
    pub dynamic_sql: Option<DynamicSqlOrigin>,
}

impl<'a> ScriptContext<'a> {
    #[must_use]
    pub const fn new(tree: &'a FragmentTree, dynamic_sql: Option<DynamicSqlOrigin>) -> Self {
        Self { tree, dynamic_sql }
    }

    #[must_use]
    pub fn tokens(&self) -> &'a [Token] {
        self.tree.tokens()
    }

    /// Translate a column on `line` into outer-script coordinates.
    #[must_use]
    pub fn outer_column(&self, line: u32, column: u32) -> u32 {
        match self.dynamic_sql {
            Some(origin) if origin.line == line => column + origin.column,
            _ => column,
        }
    }
}

/// Collects the violations of one rule.
pub struct Emitter<'a> {
    rule_name: &'static str,
    severity: RuleSeverity,
    diagnostics: &'a mut Vec<LintDiagnostic>,
}

impl<'a> Emitter<'a> {
    #[must_use]
    pub fn new(
        rule_name: &'static str,
        severity: RuleSeverity,
        diagnostics: &'a mut Vec<LintDiagnostic>,
    ) -> Self {
        Self {
            rule_name,
            severity,
            diagnostics,
        }
    }

    pub fn emit(&mut self, message: impl Into<String>, line: u32, column: u32) {
        let violation = Violation::new(self.rule_name, message, line, column);
        tracing::trace!(rule = self.rule_name, line, column, "Violation");
        self.diagnostics
            .push(LintDiagnostic::new(violation, self.severity));
    }
}
