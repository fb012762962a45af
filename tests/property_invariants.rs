use proptest::prelude::*;

use calclog::{
    calc::CalculationRecord,
    config::CalculatorConfig,
    core::{
        history::{HistoryEntry, HistoryStore},
        snapshot::SnapshotManager,
    },
    persist::csv::{decode_table, encode_table},
    runtime::calculator::Calculator,
    types::OperationName,
};

#[derive(Debug, Clone)]
enum Action {
    Calculate { op: u8, a: i16, b: i16 },
    Undo,
    Redo,
}

fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        3 => (0u8..7, -50i16..50, -50i16..50).prop_map(|(op, a, b)| Action::Calculate { op, a, b }),
        1 => Just(Action::Undo),
        1 => Just(Action::Redo),
    ]
}

fn op_strategy() -> impl Strategy<Value = OperationName> {
    (0usize..7).prop_map(|i| OperationName::ALL[i])
}

fn entry_strategy() -> impl Strategy<Value = HistoryEntry> {
    (
        proptest::option::of(-1e12f64..1e12),
        proptest::option::of(-1e12f64..1e12),
        proptest::option::of(op_strategy()),
        proptest::option::of(proptest::num::f64::NORMAL),
    )
        .prop_map(|(operand1, operand2, operation, result)| HistoryEntry {
            operand1,
            operand2,
            operation,
            result,
            timestamp: None,
        })
}

fn record(a: i16, b: i16) -> CalculationRecord {
    CalculationRecord {
        result: Some(f64::from(a) + f64::from(b)),
        ..CalculationRecord::new(f64::from(a), f64::from(b), OperationName::Add)
    }
}

proptest! {
    #[test]
    fn csv_round_trips_finite_values(rows in prop::collection::vec(entry_strategy(), 0..40)) {
        let decoded = decode_table(&encode_table(&rows)).expect("decode");
        prop_assert_eq!(decoded, rows);
    }

    #[test]
    fn snapshots_never_see_later_mutation(
        lists in prop::collection::vec(prop::collection::vec((-9i16..9, -9i16..9), 0..6), 1..12)
    ) {
        let mut snapshots = SnapshotManager::new();
        let mut expected: Vec<Vec<CalculationRecord>> = Vec::new();

        for list in lists {
            let mut live: Vec<CalculationRecord> = list.into_iter().map(|(a, b)| record(a, b)).collect();
            snapshots.save_state(&live);
            expected.push(live.clone());
            for rec in live.iter_mut() {
                rec.operand1 += 1000.0;
            }
            live.push(record(1, 1));
        }

        // each undo reveals the snapshot below the one it moves
        let n = expected.len();
        for k in 1..=n {
            let state = snapshots.undo().expect("undo");
            let want = if k < n { expected[n - k - 1].clone() } else { Vec::new() };
            prop_assert_eq!(state, want);
        }
        prop_assert!(snapshots.undo().is_none());

        for want in &expected {
            let state = snapshots.redo().expect("redo");
            prop_assert_eq!(&state, want);
        }
        prop_assert!(!snapshots.can_redo());
    }

    #[test]
    fn undo_then_redo_everything_restores_stack_depth(actions in prop::collection::vec(action_strategy(), 1..80)) {
        let config = CalculatorConfig { auto_save: false, ..CalculatorConfig::default() };
        let mut calc = Calculator::with_history(config, HistoryStore::new());
        let mut executed = 0usize;

        for action in actions {
            match action {
                Action::Calculate { op, a, b } => {
                    let line = format!("{} {a} {b}", OperationName::ALL[usize::from(op)]);
                    if calc.execute(&line).is_ok() {
                        executed += 1;
                    }
                }
                Action::Undo => { calc.undo(); }
                Action::Redo => { calc.redo(); }
            }
            // history only grows, no matter how the live list moves
            prop_assert_eq!(calc.history().len(), executed);
        }

        let depth = calc.snapshots().undo_len() + calc.snapshots().redo_len();
        while calc.snapshots().can_undo() {
            calc.undo();
        }
        prop_assert!(calc.calculations().is_empty());
        prop_assert_eq!(calc.snapshots().redo_len(), depth);

        while calc.snapshots().can_redo() {
            calc.redo();
        }
        prop_assert_eq!(calc.snapshots().undo_len(), depth);
    }
}
