use std::cell::{Cell, RefCell};
use std::io::Write;
use tsql_types::{LintDiagnostic, Reporter};

/// Reporter that writes plain lines, prefixing diagnostics with the file
/// currently being linted.
pub struct ConsoleReporter<W: Write> {
    out: RefCell<W>,
    current_file: RefCell<String>,
    errors: Cell<usize>,
    warnings: Cell<usize>,
}

impl<W: Write> ConsoleReporter<W> {
    #[must_use]
    pub fn new(out: W) -> Self {
        Self {
            out: RefCell::new(out),
            current_file: RefCell::new(String::new()),
            errors: Cell::new(0),
            warnings: Cell::new(0),
        }
    }

    /// Set the path printed in front of subsequent diagnostics.
    pub fn set_file(&self, path: impl Into<String>) {
        *self.current_file.borrow_mut() = path.into();
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.errors.get()
    }

    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.warnings.get()
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    fn write_line(&self, line: &str) {
        if let Err(error) = writeln!(self.out.borrow_mut(), "{line}") {
            tracing::debug!(%error, "Failed to write output");
        }
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn report(&self, message: &str) {
        self.write_line(message);
    }

    fn report_violation(&self, diagnostic: &LintDiagnostic) {
        if diagnostic.severity.is_error() {
            self.errors.set(self.errors.get() + 1);
        } else {
            self.warnings.set(self.warnings.get() + 1);
        }
        let line = format!("{}:{diagnostic}", self.current_file.borrow());
        self.write_line(&line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsql_types::{RuleSeverity, Violation};

    #[test]
    fn test_diagnostics_are_prefixed_and_counted() {
        let reporter = ConsoleReporter::new(Vec::new());
        reporter.report("Did not find any plugins");
        reporter.set_file("queries/orders.sql");
        reporter.report_violation(&LintDiagnostic::new(
            Violation::new("missing-nolock", "Missing nolock", 3, 15),
            RuleSeverity::Error,
        ));
        reporter.report_violation(&LintDiagnostic::new(
            Violation::new("missing-nolock", "Missing nolock", 4, 1),
            RuleSeverity::Warning,
        ));

        assert_eq!(reporter.error_count(), 1);
        assert_eq!(reporter.warning_count(), 1);
        let output = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(
            output,
            "Did not find any plugins\n\
             queries/orders.sql:3:15: error Missing nolock (missing-nolock)\n\
             queries/orders.sql:4:1: warning Missing nolock (missing-nolock)\n"
        );
    }
}
