use crate::columns::tab_adjusted_column;
use crate::context::{Emitter, ScriptContext};
use crate::traits::{FragmentLintRule, Interest, LintRule};
use std::collections::HashSet;
use tsql_syntax::{walk_tree, FragmentId, FragmentVisitor, Node, NodeClass, NodeKind, Token};

const MESSAGE: &str = "Missing nolock found in a select statement";

/// System catalog views that are never locked in practice
const SYSTEM_TABLES: &[&str] = &["objects"];

const NOLOCK_HINTS: &[&str] = &["NOLOCK", "READUNCOMMITTED"];

const DML_KEYWORDS: &[&str] = &["select", "insert", "update", "delete", "merge"];

/// Lint rule that detects tables read without a `NOLOCK` hint
///
/// Two checks run:
/// - a table whose nearest preceding DML keyword is `SELECT` must carry a
///   `NOLOCK` or `READUNCOMMITTED` hint
/// - inside a join, every table that is neither aliased nor a common table
///   expression is reported, at its tab-widened column
///
/// Temporary tables (`#name`) are exempt from both. CTE names match without
/// regard to case, as T-SQL identifiers do under the default collation.
///
/// The join check reports each table at most once per script, even when
/// it sits under several nested joins.
///
/// Example:
/// ```sql
/// SELECT * FROM Orders                 -- reported
/// SELECT * FROM Orders WITH (NOLOCK)   -- ok
/// SELECT * FROM #Staging               -- ok
/// ```
pub struct MissingNolockRuleImpl;

#[derive(Debug, Default)]
pub struct MissingNolockState {
    /// Lower-cased names of the script's common table expressions
    cte_names: HashSet<String>,
    /// Table references already reported by the join check
    reported_in_joins: HashSet<FragmentId>,
}

impl LintRule for MissingNolockRuleImpl {
    fn name(&self) -> &'static str {
        "missing-nolock"
    }

    fn description(&self) -> &'static str {
        "Detects tables read by a SELECT without a NOLOCK hint"
    }

    fn interests(&self) -> &'static [Interest] {
        &[
            Interest::Kind(NodeKind::NamedTableReference),
            Interest::Class(NodeClass::TableReference),
        ]
    }
}

impl FragmentLintRule for MissingNolockRuleImpl {
    type State = MissingNolockState;

    fn start(&self, cx: &ScriptContext<'_>, state: &mut Self::State) {
        let mut collector = CteNameCollector::default();
        walk_tree(&mut collector, cx.tree);
        tracing::trace!(ctes = collector.names.len(), "Collected CTE names");
        state.cte_names = collector.names;
    }

    fn visit(
        &self,
        node: Node<'_>,
        cx: &ScriptContext<'_>,
        state: &mut Self::State,
        emitter: &mut Emitter<'_>,
    ) {
        if node.kind() == NodeKind::NamedTableReference {
            check_read_without_hint(node, cx, emitter);
        }
        check_joined_tables(node, cx, state, emitter);
    }
}

#[derive(Default)]
struct CteNameCollector {
    names: HashSet<String>,
}

impl FragmentVisitor for CteNameCollector {
    fn enter(&mut self, node: Node<'_>) {
        if node.kind() == NodeKind::CommonTableExpression {
            if let Some(name) = node.value() {
                self.names.insert(name.to_lowercase());
            }
        }
    }
}

fn is_temporary(name: &str) -> bool {
    name.contains('#')
}

fn check_read_without_hint(table: Node<'_>, cx: &ScriptContext<'_>, emitter: &mut Emitter<'_>) {
    let Some(name) = table.base_identifier() else {
        return;
    };
    if is_temporary(name) || SYSTEM_TABLES.iter().any(|t| name.eq_ignore_ascii_case(t)) {
        return;
    }
    if NOLOCK_HINTS.iter().any(|hint| table.has_table_hint(hint)) {
        return;
    }

    let keyword = preceding_dml_keyword(cx.tokens(), table.first_token());
    if keyword.is_some_and(|k| k.eq_ignore_ascii_case("select")) {
        let line = table.start_line();
        emitter.emit(MESSAGE, line, cx.outer_column(line, table.start_column()));
    }
}

/// Nearest DML keyword before `tokens[index]`.
fn preceding_dml_keyword(tokens: &[Token], index: usize) -> Option<&str> {
    tokens[..index.min(tokens.len())]
        .iter()
        .rev()
        .map(|token| token.text.as_str())
        .find(|text| DML_KEYWORDS.iter().any(|k| text.eq_ignore_ascii_case(k)))
}

fn check_joined_tables(
    node: Node<'_>,
    cx: &ScriptContext<'_>,
    state: &mut MissingNolockState,
    emitter: &mut Emitter<'_>,
) {
    let joined = node.is_a(NodeClass::JoinTableReference)
        || node
            .descendants()
            .any(|n| n.is_a(NodeClass::JoinTableReference));
    if !joined {
        return;
    }

    for table in node
        .descendants()
        .filter(|n| n.kind() == NodeKind::NamedTableReference)
    {
        // nested joins revisit the same tables
        if !state.reported_in_joins.insert(table.id()) {
            continue;
        }
        let Some(name) = table.base_identifier() else {
            continue;
        };
        if is_temporary(name) || state.cte_names.contains(&name.to_lowercase()) {
            continue;
        }
        if table.alias().is_some() {
            continue;
        }
        let line = table.start_line();
        let column = tab_adjusted_column(cx.tokens(), table.first_token());
        emitter.emit(MESSAGE, line, cx.outer_column(line, column));
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use tsql_config::Configuration;
    use tsql_test_utils::{format_diagnostics, RecordingReporter};

    fn linter() -> Linter {
        let reporter = RecordingReporter::new();
        let config =
            Configuration::from_json(r#"{"rules":{"missing-nolock":"error"}}"#, &reporter).unwrap();
        Linter::new(&config)
    }

    fn lint(source: &str) -> Vec<LintDiagnostic> {
        linter().lint_source(source).unwrap()
    }

    fn positions(source: &str) -> Vec<(u32, u32)> {
        lint(source)
            .iter()
            .map(|d| (d.line(), d.column()))
            .collect()
    }

    #[test]
    fn test_select_without_hint() {
        let diagnostics = lint("SELECT * FROM Orders");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].rule_name(), "missing-nolock");
        assert_eq!(
            diagnostics[0].message(),
            "Missing nolock found in a select statement"
        );
        assert_eq!((diagnostics[0].line(), diagnostics[0].column()), (1, 15));
    }

    #[test]
    fn test_hints_suppress() {
        assert!(lint("SELECT * FROM Orders WITH (NOLOCK)").is_empty());
        assert!(lint("SELECT * FROM Orders o WITH (nolock, INDEX(ix))").is_empty());
        assert!(lint("SELECT * FROM Orders (NOLOCK)").is_empty());
        assert!(lint("SELECT * FROM Orders WITH (READUNCOMMITTED)").is_empty());
        assert_eq!(positions("SELECT * FROM Orders WITH (TABLOCK)"), vec![(1, 15)]);
    }

    #[test]
    fn test_nearest_dml_keyword_decides() {
        // Orders is preceded by INSERT, Customers by the inner SELECT
        assert_eq!(
            positions("INSERT INTO Orders SELECT * FROM Customers"),
            vec![(1, 34)]
        );
        assert!(lint("UPDATE Orders SET Total = 0").is_empty());
        assert_eq!(
            positions("UPDATE Orders SET Total = (SELECT SUM(x) FROM Items)"),
            vec![(1, 47)]
        );
        assert_eq!(
            positions("DELETE FROM Orders WHERE Id IN (SELECT Id FROM Cancelled)"),
            vec![(1, 48)]
        );
    }

    #[test]
    fn test_temporary_and_system_tables() {
        assert!(lint("SELECT * FROM #TempOrders").is_empty());
        assert!(lint("SELECT * FROM ##Global").is_empty());
        assert!(lint("SELECT * FROM #TempOrders JOIN #Other ON #TempOrders.id = #Other.id").is_empty());
        assert!(lint("SELECT * FROM sys.objects").is_empty());
        assert!(lint("SELECT * FROM sys.OBJECTS").is_empty());
    }

    #[test]
    fn test_unaliased_join_tables() {
        let diagnostics = lint("SELECT * FROM A JOIN B ON A.id = B.id");
        insta::assert_snapshot!(format_diagnostics(&diagnostics), @r"
        1:15: error Missing nolock found in a select statement (missing-nolock)
        1:15: error Missing nolock found in a select statement (missing-nolock)
        1:22: error Missing nolock found in a select statement (missing-nolock)
        1:22: error Missing nolock found in a select statement (missing-nolock)
        ");
    }

    #[test]
    fn test_aliased_join_tables() {
        assert_eq!(
            positions("SELECT * FROM A a JOIN B b ON a.id = b.id"),
            vec![(1, 15), (1, 24)]
        );
        assert!(lint(
            "SELECT * FROM A a WITH (NOLOCK) JOIN B b WITH (NOLOCK) ON a.id = b.id"
        )
        .is_empty());
    }

    #[test]
    fn test_hinted_but_unaliased_join_tables_are_reported() {
        assert_eq!(
            positions("SELECT * FROM A WITH (NOLOCK) CROSS JOIN B WITH (NOLOCK)"),
            vec![(1, 15), (1, 42)]
        );
    }

    #[test]
    fn test_join_chain_reports_each_table_once() {
        assert_eq!(
            positions("SELECT * FROM A a WITH (NOLOCK) JOIN B ON a.id = B.id JOIN C ON C.id = B.id")
                .len(),
            // B and C from each check; A is aliased and hinted
            4
        );
    }

    #[test]
    fn test_cte_names_are_not_join_tables() {
        let source = "WITH recent AS (SELECT Id FROM Orders WITH (NOLOCK))\n\
                      SELECT * FROM recent JOIN Items i WITH (NOLOCK) ON i.Id = recent.Id";
        // only the unhinted read of `recent`; the join check skips it
        assert_eq!(positions(source), vec![(2, 15)]);
    }

    #[test]
    fn test_cte_names_compare_case_insensitively() {
        let source = "WITH Recent AS (SELECT Id FROM Orders WITH (NOLOCK))\n\
                      SELECT * FROM RECENT WITH (NOLOCK) JOIN Items i WITH (NOLOCK) ON i.Id = RECENT.Id";
        assert!(lint(source).is_empty());
    }

    #[test]
    fn test_join_columns_widen_tabs() {
        let source = "SELECT *\nFROM\tA\n\tJOIN B ON A.id = B.id";
        assert_eq!(positions(source), vec![(2, 6), (2, 9), (3, 7), (3, 10)]);
    }

    #[test]
    fn test_dynamic_sql_columns() {
        assert_eq!(positions("EXEC('SELECT * FROM Orders')"), vec![(1, 21)]);
        assert_eq!(positions("EXEC('SELECT *\nFROM Orders')"), vec![(2, 6)]);
        assert!(lint("EXEC('SELECT * FROM Orders WITH (NOLOCK)')").is_empty());
    }

    #[test]
    fn test_dynamic_sql_join_tables() {
        // both checks fire for each unaliased table, shifted by the origin
        assert_eq!(
            positions("EXEC('SELECT * FROM A JOIN B ON 1=1')"),
            vec![(1, 21), (1, 21), (1, 28), (1, 28)]
        );
    }

    #[test]
    fn test_dynamic_sql_join_tabs_on_origin_line() {
        assert_eq!(
            positions("EXEC('SELECT * FROM\tA JOIN B ON 1=1')"),
            vec![(1, 21), (1, 24), (1, 28), (1, 31)]
        );
    }

    #[test]
    fn test_dynamic_sql_join_on_later_line_is_not_shifted() {
        assert_eq!(
            positions("EXEC('SELECT * FROM A a\n\tJOIN B ON 1=1')"),
            vec![(1, 21), (2, 7), (2, 10)]
        );
    }

    #[test]
    fn test_dynamic_sql_columns_after_escaped_quotes() {
        assert_eq!(
            positions("EXEC('SELECT ''a'' AS x FROM Orders')"),
            vec![(1, 30)]
        );
        assert_eq!(
            positions("EXEC('SELECT ''x'' AS v FROM A JOIN B ON 1=1')"),
            vec![(1, 30), (1, 30), (1, 37), (1, 37)]
        );
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let linter = linter();
        let tree = tsql_syntax::parse(
            "WITH c AS (SELECT 1 AS x)\nSELECT * FROM A JOIN c ON 1 = 1 JOIN B ON 1 = 1",
        )
        .unwrap();
        let first = linter.lint(&tree);
        let second = linter.lint(&tree);
        assert!(!first.is_empty());
        assert_eq!(first, second);
    }
}
