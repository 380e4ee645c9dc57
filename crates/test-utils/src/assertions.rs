//! Formatting helpers for diagnostic and reporter snapshots.
//!
//! Entries are rendered one per line so inline snapshots stay readable.

use tsql_types::LintDiagnostic;

/// Format diagnostics for snapshot testing, one `line:column: severity message (rule)`
/// entry per line.
///
/// ```ignore
/// let diagnostics = linter.lint_source("SELECT * FROM Orders").unwrap();
/// insta::assert_snapshot!(format_diagnostics(&diagnostics), @"1:15: warning ...");
/// ```
pub fn format_diagnostics(diagnostics: &[LintDiagnostic]) -> String {
    if diagnostics.is_empty() {
        return String::from("(no diagnostics)");
    }

    diagnostics
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format free-form reporter messages, numbered.
pub fn format_messages<T: AsRef<str>>(messages: &[T]) -> String {
    if messages.is_empty() {
        return String::from("(no messages)");
    }

    messages
        .iter()
        .enumerate()
        .map(|(i, m)| format!("[{}] {}", i + 1, m.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}
