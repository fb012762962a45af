//! Calculation records and the observer protocol that feeds history.

use std::{
    cell::RefCell,
    fmt,
    rc::{Rc, Weak},
};

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::{
    op::{Operation, OperationError},
    types::{OperationName, Timestamp},
};

/// Value fields of one calculation.
///
/// `result` and `timestamp` stay `None` until the owning [`Calculation`]
/// executes. Records carry no references, so a `clone` is a full deep copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRecord {
    /// Left operand.
    pub operand1: f64,
    /// Right operand.
    pub operand2: f64,
    /// Operation applied.
    pub operation: OperationName,
    /// Computed value, once executed.
    pub result: Option<f64>,
    /// Execution instant, once executed.
    pub timestamp: Option<Timestamp>,
}

impl CalculationRecord {
    /// Unexecuted record.
    pub fn new(operand1: f64, operand2: f64, operation: OperationName) -> Self {
        Self {
            operand1,
            operand2,
            operation,
            result: None,
            timestamp: None,
        }
    }

    /// True once a result has been stored.
    pub fn is_executed(&self) -> bool {
        self.result.is_some()
    }
}

impl fmt::Display for CalculationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.operand1, self.operation, self.operand2)?;
        if let Some(result) = self.result {
            write!(f, " = {result}")?;
        }
        Ok(())
    }
}

/// Receiver of completed calculations.
pub trait CalculationObserver {
    /// Called synchronously with the fully populated record.
    fn on_calculation(&mut self, record: &CalculationRecord);
}

/// Shared handle through which observers are attached.
pub type ObserverHandle = Rc<RefCell<dyn CalculationObserver>>;

/// An executable calculation with its attached observers.
///
/// Observers are held as [`Weak`] handles: their lifetime belongs to whoever
/// created them, and an observer dropped before execution is skipped.
pub struct Calculation {
    record: CalculationRecord,
    operation: Operation,
    observers: Vec<Weak<RefCell<dyn CalculationObserver>>>,
}

impl Calculation {
    /// Builds an unexecuted calculation for `operation`.
    pub fn new(operand1: f64, operand2: f64, operation: Operation) -> Self {
        Self {
            record: CalculationRecord::new(operand1, operand2, operation.name),
            operation,
            observers: Vec::new(),
        }
    }

    /// Attaches `observer`; attaching the same instance twice is a no-op.
    pub fn attach(&mut self, observer: &ObserverHandle) {
        let handle = Rc::downgrade(observer);
        if !self.observers.iter().any(|o| Weak::ptr_eq(o, &handle)) {
            self.observers.push(handle);
        }
    }

    /// Detaches `observer` if attached.
    pub fn detach(&mut self, observer: &ObserverHandle) {
        let handle = Rc::downgrade(observer);
        self.observers.retain(|o| !Weak::ptr_eq(o, &handle));
    }

    /// Number of attached observers.
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Runs the operation, stamps the record and notifies observers in
    /// attachment order.
    ///
    /// Meant to be called once. A second call recomputes and notifies again.
    pub fn execute(&mut self) -> Result<f64, OperationError> {
        let result = self
            .operation
            .apply(self.record.operand1, self.record.operand2)?;
        self.record.result = Some(result);
        self.record.timestamp = Some(Local::now().naive_local());
        self.notify_observers();
        Ok(result)
    }

    /// Current record state.
    pub fn record(&self) -> &CalculationRecord {
        &self.record
    }

    /// Releases the record, dropping observer handles.
    pub fn into_record(self) -> CalculationRecord {
        self.record
    }

    fn notify_observers(&self) {
        for observer in self.observers.iter().filter_map(Weak::upgrade) {
            observer.borrow_mut().on_calculation(&self.record);
        }
    }
}

impl fmt::Debug for Calculation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Calculation")
            .field("record", &self.record)
            .field("observers", &self.observers.len())
            .finish()
    }
}
