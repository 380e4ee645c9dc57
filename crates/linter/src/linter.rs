use crate::context::{Emitter, ScriptContext};
use crate::dispatch::DispatchTable;
use crate::registry;
use crate::traits::{ErasedRule, RuleSession};
use std::sync::Arc;
use tsql_config::Configuration;
use tsql_syntax::{extract_dynamic_sql, walk_tree, DynamicSqlOrigin, FragmentTree, FragmentVisitor, Node};
use tsql_types::{LintDiagnostic, Reporter, RuleSeverity};

struct ActiveRule {
    rule: Arc<dyn ErasedRule>,
    severity: RuleSeverity,
}

/// Linter that runs the configured rules over scripts
///
/// Rules whose configured severity is off are dropped when the linter is
/// built. Each script is walked once; every node is handed to the rules
/// interested in its kind.
pub struct Linter {
    rules: Vec<ActiveRule>,
    dispatch: DispatchTable,
}

impl Linter {
    /// Create a linter running every registered rule enabled in `config`
    #[must_use]
    pub fn new(config: &Configuration) -> Self {
        Self::with_rules(registry::all_rules().iter().cloned(), config)
    }

    /// Create a linter from an explicit rule set
    #[must_use]
    pub fn with_rules(
        rules: impl IntoIterator<Item = Arc<dyn ErasedRule>>,
        config: &Configuration,
    ) -> Self {
        let rules: Vec<ActiveRule> = rules
            .into_iter()
            .filter_map(|rule| {
                let severity = config.severity(rule.name());
                if severity.is_enabled() {
                    Some(ActiveRule { rule, severity })
                } else {
                    tracing::trace!(rule = rule.name(), "Rule not enabled, skipping");
                    None
                }
            })
            .collect();

        let interests: Vec<_> = rules.iter().map(|active| active.rule.interests()).collect();
        let dispatch = DispatchTable::build(&interests);
        tracing::debug!(rules_count = rules.len(), "Linter ready");

        Self { rules, dispatch }
    }

    /// Names of the rules that will run, in registry order
    pub fn active_rules(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|active| active.rule.name())
    }

    /// Lint a parsed script, returning diagnostics in emission order
    #[must_use]
    pub fn lint(&self, tree: &FragmentTree) -> Vec<LintDiagnostic> {
        self.lint_with_origin(tree, None)
    }

    /// Lint a script that is embedded at `origin` in an outer script
    #[must_use]
    #[tracing::instrument(skip(self, tree), fields(fragments = tree.fragment_count()))]
    pub fn lint_with_origin(
        &self,
        tree: &FragmentTree,
        origin: Option<DynamicSqlOrigin>,
    ) -> Vec<LintDiagnostic> {
        if self.rules.is_empty() {
            return Vec::new();
        }

        let cx = ScriptContext::new(tree, origin);
        let mut walker = DispatchWalker {
            linter: self,
            cx: &cx,
            sessions: self.rules.iter().map(|active| active.rule.session(&cx)).collect(),
            diagnostics: Vec::new(),
        };
        walk_tree(&mut walker, tree);

        tracing::debug!(
            total_diagnostics = walker.diagnostics.len(),
            "Script linting complete"
        );
        walker.diagnostics
    }

    /// Parse and lint script text, including dynamic SQL in `EXEC` literals
    ///
    /// Diagnostics are ordered by line and column.
    #[tracing::instrument(skip(self, source), fields(size = source.len()))]
    pub fn lint_source(&self, source: &str) -> tsql_syntax::Result<Vec<LintDiagnostic>> {
        let tree = tsql_syntax::parse(source)?;
        let mut diagnostics = self.lint(&tree);

        for dynamic in extract_dynamic_sql(&tree) {
            tracing::trace!(
                line = dynamic.origin.line,
                column = dynamic.origin.column,
                "Linting dynamic SQL"
            );
            diagnostics.extend(self.lint_with_origin(&dynamic.tree, Some(dynamic.origin)));
        }

        diagnostics.sort_by_key(|d| (d.line(), d.column()));
        Ok(diagnostics)
    }

    /// Forward diagnostics to a reporter
    pub fn report(diagnostics: &[LintDiagnostic], reporter: &dyn Reporter) {
        for diagnostic in diagnostics {
            reporter.report_violation(diagnostic);
        }
    }
}

struct DispatchWalker<'l, 'cx> {
    linter: &'l Linter,
    cx: &'cx ScriptContext<'cx>,
    sessions: Vec<Box<dyn RuleSession + 'l>>,
    diagnostics: Vec<LintDiagnostic>,
}

impl FragmentVisitor for DispatchWalker<'_, '_> {
    fn enter(&mut self, node: Node<'_>) {
        for &index in self.linter.dispatch.rules_for(node.kind()) {
            let active = &self.linter.rules[index];
            let mut emitter = Emitter::new(active.rule.name(), active.severity, &mut self.diagnostics);
            self.sessions[index].visit(node, self.cx, &mut emitter);
        }
    }
}
