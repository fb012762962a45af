//! Persistence seam for the history table.

/// Fixed-schema CSV codec and file-backed sink.
pub mod csv;

use thiserror::Error;

use crate::core::history::HistoryEntry;

/// History read/write failure.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Underlying filesystem error.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Stored content could not be parsed.
    #[error("corrupt history at line {line}: {message}")]
    Corrupt {
        /// 1-based line number in the stored table.
        line: usize,
        /// What was wrong with it.
        message: String,
    },
    /// The store has no backing storage to read or write.
    #[error("no history file is configured")]
    NoStorage,
}

/// Result alias for persistence operations.
pub type PersistResult<T> = Result<T, PersistError>;

/// Storage backend for the history table.
///
/// `store` replaces whatever was stored before; the whole table is the unit
/// of persistence.
pub trait HistorySink {
    /// Reads the stored table, or `None` when nothing has been stored yet.
    fn load(&self) -> PersistResult<Option<Vec<HistoryEntry>>>;
    /// Overwrites storage with `rows`.
    fn store(&mut self, rows: &[HistoryEntry]) -> PersistResult<()>;
    /// Human-readable location, used in messages.
    fn location(&self) -> String;
}
