//! Typed results of facade commands.

use crate::{
    calc::CalculationRecord,
    core::history::{HistoryListing, HistoryStats},
};

/// What a successfully handled command produced.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// Blank input; nothing happened.
    Idle,
    /// Help was requested.
    Help,
    /// A calculation ran and was appended to the live list.
    Calculated {
        /// The executed record.
        record: CalculationRecord,
        /// Set when auto-save was attempted and failed.
        auto_save_error: Option<String>,
    },
    /// Recent history rows.
    History(HistoryListing),
    /// History statistics.
    Stats(HistoryStats),
    /// History, snapshots and the live list were emptied.
    Cleared,
    /// The live list was replaced by an earlier snapshot.
    Undone,
    /// Undo stack was empty.
    NothingToUndo,
    /// The live list was replaced by a redone snapshot.
    Redone,
    /// Redo stack was empty.
    NothingToRedo,
    /// History was written.
    Saved {
        /// Where it went.
        location: String,
    },
    /// History was reloaded.
    Loaded,
    /// The session should end.
    Exited,
}
