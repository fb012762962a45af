use calclog::{
    calc::CalculationRecord,
    core::snapshot::{Snapshot, SnapshotManager},
    types::OperationName,
};

fn rec(a: f64, b: f64) -> CalculationRecord {
    CalculationRecord {
        result: Some(a + b),
        ..CalculationRecord::new(a, b, OperationName::Add)
    }
}

#[test]
fn empty_manager_has_nothing_to_undo_or_redo() {
    let mut snapshots = SnapshotManager::new();
    assert!(!snapshots.can_undo());
    assert!(!snapshots.can_redo());
    assert_eq!(snapshots.undo(), None);
    assert_eq!(snapshots.redo(), None);
}

#[test]
fn undo_lands_two_changes_back() {
    let mut snapshots = SnapshotManager::new();
    let c1 = rec(5.0, 3.0);
    let c2 = rec(10.0, 5.0);
    let mut live: Vec<CalculationRecord> = Vec::new();

    snapshots.save_state(&live);
    live.push(c1.clone());
    snapshots.save_state(&live);
    live.push(c2.clone());
    assert_eq!(snapshots.undo_len(), 2);

    let state = snapshots.undo().expect("undo");
    assert!(state.is_empty());
    assert_eq!((snapshots.undo_len(), snapshots.redo_len()), (1, 1));

    let state = snapshots.redo().expect("redo");
    assert_eq!(state, vec![c1]);
    assert_eq!((snapshots.undo_len(), snapshots.redo_len()), (2, 0));
}

#[test]
fn undo_of_last_snapshot_yields_empty_list() {
    let mut snapshots = SnapshotManager::new();
    snapshots.save_state(&[rec(1.0, 1.0)]);
    assert_eq!(snapshots.undo(), Some(Vec::new()));
    assert!(!snapshots.can_undo());
    assert!(snapshots.can_redo());
    assert_eq!(snapshots.undo(), None);
}

#[test]
fn fresh_save_discards_redo() {
    let mut snapshots = SnapshotManager::new();
    snapshots.save_state(&[]);
    snapshots.save_state(&[rec(1.0, 1.0)]);
    snapshots.undo().expect("undo");
    assert!(snapshots.can_redo());

    snapshots.save_state(&[rec(2.0, 2.0)]);
    assert!(!snapshots.can_redo());
    assert_eq!(snapshots.redo(), None);
}

#[test]
fn snapshot_is_isolated_from_later_mutation() {
    let mut snapshots = SnapshotManager::new();
    let mut live = vec![rec(1.0, 2.0)];
    snapshots.save_state(&live);
    snapshots.save_state(&live);

    live[0].operand1 = 99.0;
    live[0].result = None;
    live.push(rec(3.0, 4.0));

    let state = snapshots.undo().expect("undo");
    assert_eq!(state, vec![rec(1.0, 2.0)]);
    let state = snapshots.redo().expect("redo");
    assert_eq!(state, vec![rec(1.0, 2.0)]);
}

#[test]
fn returned_state_is_an_independent_copy() {
    let mut snapshots = SnapshotManager::new();
    snapshots.save_state(&[rec(1.0, 2.0)]);
    snapshots.save_state(&[rec(1.0, 2.0)]);

    let mut state = snapshots.undo().expect("undo");
    state.clear();
    assert_eq!(snapshots.undo_stack(), &[Snapshot::capture(&[rec(1.0, 2.0)])]);
}

#[test]
fn clear_empties_both_stacks() {
    let mut snapshots = SnapshotManager::new();
    snapshots.save_state(&[]);
    snapshots.save_state(&[rec(1.0, 1.0)]);
    snapshots.undo().expect("undo");
    snapshots.clear();
    assert!(!snapshots.can_undo());
    assert!(!snapshots.can_redo());
}
