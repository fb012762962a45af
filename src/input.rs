//! Tokenizing of one REPL line into a [`Command`].

use thiserror::Error;

/// Malformed command line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// Nothing but whitespace.
    #[error("Input cannot be empty.")]
    Empty,
    /// Not exactly `<operation> <num1> <num2>`.
    #[error("Invalid input format. Expected: <operation> <num1> <num2>")]
    WrongArity {
        /// Number of tokens seen.
        found: usize,
    },
    /// An operand did not parse as a number.
    #[error("Invalid numbers: '{first}' and '{second}' must be valid numbers.")]
    InvalidNumber {
        /// First operand token.
        first: String,
        /// Second operand token.
        second: String,
    },
}

/// One parsed user command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Blank line.
    Empty,
    /// Show help text.
    Help,
    /// Show recent history.
    History,
    /// Drop history, snapshots and the live list.
    Clear,
    /// Step back.
    Undo,
    /// Step forward.
    Redo,
    /// Persist history.
    Save,
    /// Reload history from storage.
    Load,
    /// Show statistics.
    Stats,
    /// Leave the REPL.
    Exit,
    /// Arithmetic invocation. The operation name is resolved later.
    Calculate {
        /// Operation token as typed.
        operation: String,
        /// Left operand.
        operand1: f64,
        /// Right operand.
        operand2: f64,
    },
}

impl Command {
    /// Parses a line. Keywords are case-insensitive; anything else must be
    /// an arithmetic invocation.
    pub fn parse(line: &str) -> Result<Self, InputError> {
        let trimmed = line.trim();
        let keyword = match trimmed.to_ascii_lowercase().as_str() {
            "" => Some(Self::Empty),
            "help" => Some(Self::Help),
            "history" => Some(Self::History),
            "clear" => Some(Self::Clear),
            "undo" => Some(Self::Undo),
            "redo" => Some(Self::Redo),
            "save" => Some(Self::Save),
            "load" => Some(Self::Load),
            "stats" => Some(Self::Stats),
            "exit" => Some(Self::Exit),
            _ => None,
        };
        match keyword {
            Some(cmd) => Ok(cmd),
            None => parse_calculation(trimmed),
        }
    }
}

/// Validates `<operation> <num1> <num2>`.
pub fn parse_calculation(line: &str) -> Result<Command, InputError> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let [operation, first, second] = parts.as_slice() else {
        return Err(if parts.is_empty() {
            InputError::Empty
        } else {
            InputError::WrongArity { found: parts.len() }
        });
    };

    match (first.parse::<f64>(), second.parse::<f64>()) {
        (Ok(operand1), Ok(operand2)) => Ok(Command::Calculate {
            operation: (*operation).to_string(),
            operand1,
            operand2,
        }),
        _ => Err(InputError::InvalidNumber {
            first: (*first).to_string(),
            second: (*second).to_string(),
        }),
    }
}
