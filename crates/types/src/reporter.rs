//! Sink for human-readable messages and lint diagnostics.

use crate::LintDiagnostic;

/// Receives everything a lint run wants to tell the user.
///
/// `report` carries free-form lines (missing config file, invalid JSON,
/// plugin listings); `report_violation` carries structured diagnostics.
pub trait Reporter {
    fn report(&self, message: &str);

    fn report_violation(&self, diagnostic: &LintDiagnostic);
}

impl<R: Reporter + ?Sized> Reporter for &R {
    fn report(&self, message: &str) {
        (**self).report(message);
    }

    fn report_violation(&self, diagnostic: &LintDiagnostic) {
        (**self).report_violation(diagnostic);
    }
}
