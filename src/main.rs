//! calclog CLI entry point.
//!
//! Usage:
//!   calclog                       # Interactive REPL
//!   calclog -c 'add 5 3' -c stats # Run commands and exit

use std::{path::PathBuf, process::ExitCode, time::Duration};

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use calclog::{
    config::CalculatorConfig,
    runtime::{calculator::Calculator, repl},
};

#[derive(Debug, Parser)]
#[command(name = "calclog", about = "Calculator REPL with persisted history and undo/redo", version)]
struct Cli {
    /// History CSV file; overrides HISTORY_FILE.
    #[arg(long)]
    history_file: Option<PathBuf>,

    /// Do not save history after every calculation.
    #[arg(long)]
    no_auto_save: bool,

    /// JSON config file used instead of the environment.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run this command and exit; may be repeated.
    #[arg(short = 'c', long = "command")]
    commands: Vec<String>,
}

fn main() -> ExitCode {
    // Respects RUST_LOG; logs go to stderr so they never mix with results.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let mut config = CalculatorConfig::load_or_default(match &cli.config {
        Some(path) => CalculatorConfig::from_json_file(path),
        None => CalculatorConfig::from_env(),
    });
    if let Some(path) = cli.history_file {
        config.history_file = path;
    }
    if cli.no_auto_save {
        config.auto_save = false;
    }

    let mut calc = match Calculator::new(config) {
        Ok(calc) => calc,
        Err(err) => {
            eprintln!("Error: {}", repl::render_error(&err));
            return ExitCode::FAILURE;
        }
    };

    if !cli.commands.is_empty() {
        for command in &cli.commands {
            if let Some(text) = repl::handle_line(&mut calc, command) {
                println!("{text}");
            }
            if !calc.is_running() {
                break;
            }
        }
        return ExitCode::SUCCESS;
    }

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(err) => {
            eprintln!("Error: cannot start runtime: {err}");
            return ExitCode::FAILURE;
        }
    };
    let result = runtime.block_on(repl::run(&mut calc));
    // stdin reads park on a blocking thread; don't wait for the next line.
    runtime.shutdown_timeout(Duration::from_millis(100));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
