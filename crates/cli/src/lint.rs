use crate::console::ConsoleReporter;
use crate::exit_code::ExitCode;
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tsql_linter::Linter;
use tsql_types::Reporter;

/// Options for a single lint run
#[derive(Debug, Default)]
pub struct LintOptions {
    pub config: Option<PathBuf>,
    pub list_plugins: bool,
    pub list_rules: bool,
    pub files: Vec<PathBuf>,
}

/// Resolve configuration, lint every file and pick the exit code.
///
/// A file that cannot be read or tokenized is reported and skipped; the run
/// continues with the remaining files.
pub fn run<W: Write>(options: &LintOptions, reporter: &ConsoleReporter<W>) -> ExitCode {
    let config = tsql_config::resolve(options.config.as_deref(), reporter);
    tracing::debug!(
        loaded_from = ?config.loaded_from(),
        compatibility_level = config.compatibility_level(),
        "Configuration resolved"
    );

    if options.list_plugins {
        config.list_plugins(reporter);
    }
    if options.list_rules {
        for name in tsql_linter::all_rule_names() {
            reporter.report(&format!("{name}: {}", config.severity(name)));
        }
    }

    let linter = Linter::new(&config);
    let mut failed = 0usize;
    for path in &options.files {
        reporter.set_file(path.display().to_string());
        if let Err(error) = lint_file(&linter, path, reporter) {
            tracing::warn!(path = %path.display(), error = %error, "Skipping file");
            reporter.report(&format!("{}: {error:#}", path.display()));
            failed += 1;
        }
    }

    tracing::info!(
        files = options.files.len(),
        failed,
        errors = reporter.error_count(),
        warnings = reporter.warning_count(),
        "Lint run finished"
    );

    if failed > 0 {
        ExitCode::Failure
    } else if reporter.error_count() > 0 {
        ExitCode::LintError
    } else {
        ExitCode::Success
    }
}

fn lint_file(linter: &Linter, path: &Path, reporter: &dyn Reporter) -> Result<()> {
    let source = fs::read_to_string(path).context("could not read file")?;
    let diagnostics = linter
        .lint_source(&source)
        .context("could not tokenize script")?;
    Linter::report(&diagnostics, reporter);
    Ok(())
}
