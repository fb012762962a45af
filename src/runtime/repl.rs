//! Text rendering of command outcomes and the interactive line loop.

use std::{fmt::Write as _, io::Write as _};

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::{
    config::{CalculatorConfig, MAX_DECIMAL_PLACES},
    core::history::{HistoryEntry, HistoryListing, HistoryStats},
    op::OperationError,
};

use super::{
    calculator::{Calculator, CalculatorError},
    events::CommandOutcome,
};

/// Printed when the session ends.
pub const GOODBYE: &str = "Exiting calculator. Goodbye!";

const PROMPT: &str = "calculator> ";
const RULE: &str = "============================================================";

/// Help screen.
pub const HELP_TEXT: &str = "\
CALCULATOR HELP MENU

COMMANDS:
  help                - Display this help menu
  history             - Show calculation history
  clear               - Clear calculation history
  undo                - Undo last calculation
  redo                - Redo last undone calculation
  save                - Save history to CSV
  load                - Reload history from CSV
  stats               - Show history statistics
  exit                - Exit the calculator

OPERATIONS:
  add <num1> <num2>      - Add two numbers
  subtract <num1> <num2> - Subtract num2 from num1
  multiply <num1> <num2> - Multiply two numbers
  divide <num1> <num2>   - Divide num1 by num2
  power <num1> <num2>    - Raise num1 to the power of num2
  root <num1> <num2>     - Calculate num2-th root of num1
  modulus <num1> <num2>  - Calculate num1 modulo num2

EXAMPLES:
  > add 5 3
  Result: 8.00

  > root 16 2
  Result: 4.00
";

/// Runs one line against `calc` and renders whatever it produced.
///
/// Returns `None` for blank input.
pub fn handle_line(calc: &mut Calculator, line: &str) -> Option<String> {
    match calc.execute(line) {
        Ok(outcome) => render(&outcome, calc.config()),
        Err(err) => Some(render_error(&err)),
    }
}

/// User-facing text for a successful command.
pub fn render(outcome: &CommandOutcome, config: &CalculatorConfig) -> Option<String> {
    let text = match outcome {
        CommandOutcome::Idle => return None,
        CommandOutcome::Help => HELP_TEXT.to_string(),
        CommandOutcome::Calculated {
            record,
            auto_save_error,
        } => {
            let value = record
                .result
                .map(|v| format_result(v, config.decimal_places))
                .unwrap_or_default();
            match auto_save_error {
                Some(err) => format!("Result: {value}\nWarning: auto-save failed: {err}"),
                None => format!("Result: {value}"),
            }
        }
        CommandOutcome::History(listing) => render_history(listing),
        CommandOutcome::Stats(stats) => render_stats(stats),
        CommandOutcome::Cleared => "History cleared.".to_string(),
        CommandOutcome::Undone => "Last calculation undone.".to_string(),
        CommandOutcome::NothingToUndo => "Nothing to undo.".to_string(),
        CommandOutcome::Redone => "Calculation redone.".to_string(),
        CommandOutcome::NothingToRedo => "Nothing to redo.".to_string(),
        CommandOutcome::Saved { location } => format!("History saved to {location}"),
        CommandOutcome::Loaded => "History loaded successfully.".to_string(),
        CommandOutcome::Exited => GOODBYE.to_string(),
    };
    Some(text)
}

/// User-facing text for a failed command.
pub fn render_error(err: &CalculatorError) -> String {
    match err {
        CalculatorError::Input(e) => format!("Input error: {e}"),
        CalculatorError::Operation(e @ OperationError::UnknownOperation { .. }) => {
            format!("Operation error: {e}")
        }
        CalculatorError::Operation(e @ OperationError::DivisionByZero(_)) => {
            format!("Math error: {e}")
        }
        CalculatorError::Config(e) => format!("Configuration error: {e}"),
        CalculatorError::Save(e) => format!("Error saving history: {e}"),
        CalculatorError::Load(e) => format!("Error loading history: {e}"),
    }
}

/// Rounds `value` for display only. Precision is capped at
/// [`MAX_DECIMAL_PLACES`].
pub fn format_result(value: f64, decimal_places: usize) -> String {
    let decimal_places = decimal_places.min(MAX_DECIMAL_PLACES);
    format!("{value:.decimal_places$}")
}

fn render_history(listing: &HistoryListing) -> String {
    if listing.entries.is_empty() {
        return "No calculations in history yet.".to_string();
    }
    let mut out = format!("{RULE}\nCALCULATION HISTORY\n{RULE}\n");
    for (idx, entry) in listing.entries.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", listing.offset + idx + 1, entry_line(entry));
    }
    out.push_str(RULE);
    out
}

fn entry_line(entry: &HistoryEntry) -> String {
    let num = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_else(|| "?".to_string());
    let op = entry.operation.map(|op| op.as_str()).unwrap_or("?");
    format!(
        "{} {} {} = {}",
        num(entry.operand1),
        op,
        num(entry.operand2),
        num(entry.result)
    )
}

fn render_stats(stats: &HistoryStats) -> String {
    let mut out = format!(
        "{RULE}\nHISTORY STATISTICS\n{RULE}\nTotal calculations: {}\n",
        stats.total_calculations
    );
    let ranked = stats.ranked();
    if !ranked.is_empty() {
        out.push_str("\nOperations breakdown:\n");
        for (op, count) in ranked {
            let _ = writeln!(out, "  {op}: {count}");
        }
    }
    out.push_str(RULE);
    out
}

/// Interactive loop over stdin until `exit`, end of input or Ctrl-C.
///
/// Ctrl-C only interrupts the wait for input; a command already running
/// finishes first.
pub async fn run(calc: &mut Calculator) -> std::io::Result<()> {
    println!("Welcome to the calculator REPL!");
    println!("Type 'help' for instructions or 'exit' to quit.\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while calc.is_running() {
        print!("{PROMPT}");
        std::io::stdout().flush()?;

        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => {
                    if let Some(text) = handle_line(calc, &line) {
                        println!("{text}");
                    }
                }
                None => {
                    println!("\n{GOODBYE}");
                    break;
                }
            },
            _ = tokio::signal::ctrl_c() => {
                println!("\n{GOODBYE}");
                break;
            }
        }
    }
    Ok(())
}
