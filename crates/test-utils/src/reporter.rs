//! A [`Reporter`] that keeps what it is told.

use std::cell::RefCell;
use tsql_types::{LintDiagnostic, Reporter};

/// Records reported lines and diagnostics in arrival order.
///
/// ```
/// use tsql_test_utils::RecordingReporter;
/// use tsql_types::Reporter;
///
/// let reporter = RecordingReporter::new();
/// reporter.report("Did not find any plugins");
/// assert_eq!(reporter.messages(), vec!["Did not find any plugins"]);
/// ```
#[derive(Debug, Default)]
pub struct RecordingReporter {
    messages: RefCell<Vec<String>>,
    diagnostics: RefCell<Vec<LintDiagnostic>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }

    pub fn diagnostics(&self) -> Vec<LintDiagnostic> {
        self.diagnostics.borrow().clone()
    }

    /// Number of reported lines equal to `message`.
    pub fn count(&self, message: &str) -> usize {
        self.messages.borrow().iter().filter(|m| *m == message).count()
    }
}

impl Reporter for RecordingReporter {
    fn report(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }

    fn report_violation(&self, diagnostic: &LintDiagnostic) {
        self.diagnostics.borrow_mut().push(diagnostic.clone());
    }
}
