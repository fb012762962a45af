//! Interactive binary-operation calculator with a persisted history and
//! snapshot-based undo/redo.
//!
//! # Examples
//!
//! Driving the facade directly, without backing storage:
//! ```
//! use calclog::{
//!     config::CalculatorConfig,
//!     core::history::HistoryStore,
//!     runtime::{calculator::Calculator, events::CommandOutcome},
//! };
//!
//! let config = CalculatorConfig { auto_save: false, ..CalculatorConfig::default() };
//! let mut calc = Calculator::with_history(config, HistoryStore::new());
//!
//! let outcome = calc.execute("add 5 3").expect("add");
//! let CommandOutcome::Calculated { record, .. } = outcome else { panic!("not calculated") };
//! assert_eq!(record.result, Some(8.0));
//! assert_eq!(calc.history().len(), 1);
//! ```
//!
//! History persisted to a CSV file:
//! ```no_run
//! use calclog::core::history::HistoryStore;
//!
//! let mut history = HistoryStore::open("calculation_history.csv").expect("open");
//! println!("{} rows", history.len());
//! history.save().expect("save");
//! ```

/// Calculation records and observers.
pub mod calc;
/// Settings and their sources.
pub mod config;
/// History table and undo/redo snapshots.
pub mod core;
/// Command-line tokenizing.
pub mod input;
/// Operation registry.
pub mod op;
/// Persistence abstraction and CSV implementation.
pub mod persist;
/// Facade, outcomes and REPL.
pub mod runtime;
/// Shared primitive types.
pub mod types;
