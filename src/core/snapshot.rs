use tracing::debug;

use crate::calc::CalculationRecord;

/// Frozen copy of a calculation list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    records: Vec<CalculationRecord>,
}

impl Snapshot {
    pub fn capture(records: &[CalculationRecord]) -> Self {
        Self {
            records: records.to_vec(),
        }
    }

    pub fn records(&self) -> &[CalculationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn restore(&self) -> Vec<CalculationRecord> {
        self.records.clone()
    }
}

/// Linear undo/redo over whole-list snapshots.
///
/// Each saved snapshot is the state just before a change. `undo` moves the
/// newest snapshot to the redo stack and yields the one beneath it (or an
/// empty list), so it lands two changes back. `redo` yields exactly the
/// snapshot it moves back. Both stacks are unbounded.
#[derive(Debug, Default)]
pub struct SnapshotManager {
    undo: Vec<Snapshot>,
    redo: Vec<Snapshot>,
}

impl SnapshotManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save_state(&mut self, current: &[CalculationRecord]) {
        self.undo.push(Snapshot::capture(current));
        self.redo.clear();
        debug!(
            records = current.len(),
            undo_depth = self.undo.len(),
            "state saved"
        );
    }

    pub fn undo(&mut self) -> Option<Vec<CalculationRecord>> {
        let top = self.undo.pop()?;
        self.redo.push(top);
        debug!(undo_depth = self.undo.len(), redo_depth = self.redo.len(), "undo");
        Some(self.undo.last().map(Snapshot::restore).unwrap_or_default())
    }

    pub fn redo(&mut self) -> Option<Vec<CalculationRecord>> {
        let snapshot = self.redo.pop()?;
        let state = snapshot.restore();
        self.undo.push(snapshot);
        debug!(undo_depth = self.undo.len(), redo_depth = self.redo.len(), "redo");
        Some(state)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// Stacked snapshots, oldest first.
    pub fn undo_stack(&self) -> &[Snapshot] {
        &self.undo
    }
}
