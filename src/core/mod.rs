//! In-memory history table and undo/redo snapshots.

/// History table, statistics and the observer that feeds it.
pub mod history;
/// Snapshot-based undo/redo stacks.
pub mod snapshot;
