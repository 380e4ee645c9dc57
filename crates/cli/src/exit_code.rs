//! Exit codes for the T-SQL linter.
//!
//! Scripts and CI systems can tell "the code has lint errors" apart from
//! "the linter could not do its job".

/// Exit codes used by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// No error-severity diagnostics
    Success = 0,
    /// At least one diagnostic with error severity
    LintError = 1,
    /// A file could not be read or tokenized, or the command line was invalid
    Failure = 2,
}

impl ExitCode {
    /// Exit the process with this exit code.
    pub fn exit(self) -> ! {
        std::process::exit(self.code())
    }

    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::LintError => write!(f, "lint error"),
            Self::Failure => write!(f, "failure"),
        }
    }
}
