mod console;
mod exit_code;
mod lint;

use clap::Parser;
use std::path::PathBuf;

use crate::console::ConsoleReporter;
use crate::lint::LintOptions;

#[derive(Parser)]
#[command(name = "tsql-lint")]
#[command(about = "Static analysis for T-SQL scripts", long_about = None)]
#[command(version)]
#[command(arg_required_else_help = true)]
struct Cli {
    /// Path to a configuration file; skips the configuration search
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// List the plugins named in the configuration
    #[arg(long)]
    list_plugins: bool,

    /// List every built-in rule with its configured severity
    #[arg(long)]
    list_rules: bool,

    /// Script files to lint
    #[arg(value_name = "FILES")]
    files: Vec<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let options = LintOptions {
        config: cli.config,
        list_plugins: cli.list_plugins,
        list_rules: cli.list_rules,
        files: cli.files,
    };
    let reporter = ConsoleReporter::new(std::io::stdout().lock());
    let code = lint::run(&options, &reporter);
    drop(reporter);

    tracing::debug!(%code, "Exiting");
    code.exit();
}

/// Logging is off unless `RUST_LOG` asks for it, and always goes to stderr
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("off")),
        )
        .with_writer(std::io::stderr)
        .init();
}
