use std::{cell::RefCell, rc::Rc};

use calclog::{
    calc::{Calculation, CalculationObserver, CalculationRecord, ObserverHandle},
    core::history::HistoryStore,
    op::OperationRegistry,
    types::OperationName,
};

#[derive(Default)]
struct Recorder {
    tag: &'static str,
    log: Rc<RefCell<Vec<String>>>,
    seen: Vec<CalculationRecord>,
}

impl CalculationObserver for Recorder {
    fn on_calculation(&mut self, record: &CalculationRecord) {
        self.log.borrow_mut().push(self.tag.to_string());
        self.seen.push(record.clone());
    }
}

fn calculation(op: &str, a: f64, b: f64) -> Calculation {
    let operation = OperationRegistry::new().resolve(op).expect("resolve");
    Calculation::new(a, b, operation)
}

#[test]
fn new_calculation_is_unset() {
    let calc = calculation("add", 1.0, 2.0);
    let rec = calc.record();
    assert_eq!(rec.operation, OperationName::Add);
    assert_eq!(rec.result, None);
    assert_eq!(rec.timestamp, None);
    assert!(!rec.is_executed());
    assert_eq!(rec.to_string(), "1 add 2");
}

#[test]
fn execute_populates_and_notifies_with_full_record() {
    let recorder = Rc::new(RefCell::new(Recorder::default()));
    let handle: ObserverHandle = recorder.clone();

    let mut calc = calculation("multiply", 4.0, 2.5);
    calc.attach(&handle);
    assert_eq!(calc.execute(), Ok(10.0));

    let rec = calc.record().clone();
    assert_eq!(rec.result, Some(10.0));
    assert!(rec.timestamp.is_some());
    assert_eq!(rec.to_string(), "4 multiply 2.5 = 10");
    assert_eq!(recorder.borrow().seen, vec![rec]);
}

#[test]
fn observers_are_notified_in_attachment_order() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let first = Rc::new(RefCell::new(Recorder { tag: "first", log: log.clone(), ..Recorder::default() }));
    let second = Rc::new(RefCell::new(Recorder { tag: "second", log: log.clone(), ..Recorder::default() }));
    let first: ObserverHandle = first;
    let second: ObserverHandle = second;

    let mut calc = calculation("add", 1.0, 1.0);
    calc.attach(&second);
    calc.attach(&first);
    calc.execute().expect("execute");

    assert_eq!(*log.borrow(), vec!["second", "first"]);
}

#[test]
fn attaching_same_observer_twice_is_noop() {
    let recorder = Rc::new(RefCell::new(Recorder::default()));
    let handle: ObserverHandle = recorder.clone();

    let mut calc = calculation("add", 1.0, 1.0);
    calc.attach(&handle);
    calc.attach(&handle.clone());
    assert_eq!(calc.observer_count(), 1);

    calc.execute().expect("execute");
    assert_eq!(recorder.borrow().seen.len(), 1);
}

#[test]
fn detached_observer_is_not_notified() {
    let recorder = Rc::new(RefCell::new(Recorder::default()));
    let handle: ObserverHandle = recorder.clone();

    let mut calc = calculation("add", 1.0, 1.0);
    calc.attach(&handle);
    calc.detach(&handle);
    calc.execute().expect("execute");
    assert!(recorder.borrow().seen.is_empty());
}

#[test]
fn dropped_observer_is_skipped() {
    let mut calc = calculation("add", 1.0, 1.0);
    {
        let handle: ObserverHandle = Rc::new(RefCell::new(Recorder::default()));
        calc.attach(&handle);
    }
    assert_eq!(calc.execute(), Ok(2.0));
}

#[test]
fn failed_execution_leaves_record_unset_and_notifies_nobody() {
    let recorder = Rc::new(RefCell::new(Recorder::default()));
    let handle: ObserverHandle = recorder.clone();

    let mut calc = calculation("divide", 1.0, 0.0);
    calc.attach(&handle);
    assert!(calc.execute().is_err());
    assert!(!calc.record().is_executed());
    assert!(recorder.borrow().seen.is_empty());
}

#[test]
fn history_store_observes_calculations() {
    let history = Rc::new(RefCell::new(HistoryStore::new()));
    let handle: ObserverHandle = history.clone();

    for (op, a, b) in [("add", 5.0, 3.0), ("power", 2.0, 10.0)] {
        let mut calc = calculation(op, a, b);
        calc.attach(&handle);
        calc.execute().expect("execute");
    }

    let history = history.borrow();
    assert_eq!(history.len(), 2);
    assert_eq!(history.entries()[0].result, Some(8.0));
    assert_eq!(history.entries()[1].operation, Some(OperationName::Power));
    assert_eq!(history.entries()[1].result, Some(1024.0));
}
