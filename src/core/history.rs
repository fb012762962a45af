//! History table fed by calculation observers and persisted through a sink.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    calc::{CalculationObserver, CalculationRecord},
    persist::{HistorySink, PersistError, PersistResult, csv::CsvHistoryFile},
    types::{OperationName, Timestamp},
};

/// One row of the history table.
///
/// Every column may be unset: rows loaded from a file that lacks a column
/// carry `None` there.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Left operand.
    pub operand1: Option<f64>,
    /// Right operand.
    pub operand2: Option<f64>,
    /// Operation applied.
    pub operation: Option<OperationName>,
    /// Computed value.
    pub result: Option<f64>,
    /// Execution instant.
    pub timestamp: Option<Timestamp>,
}

impl From<&CalculationRecord> for HistoryEntry {
    fn from(rec: &CalculationRecord) -> Self {
        Self {
            operand1: Some(rec.operand1),
            operand2: Some(rec.operand2),
            operation: Some(rec.operation),
            result: rec.result,
            timestamp: rec.timestamp,
        }
    }
}

/// Aggregate counts over the history table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct HistoryStats {
    /// Number of rows.
    pub total_calculations: usize,
    /// Rows per operation; operations never seen are absent.
    pub operations: HashMap<OperationName, usize>,
}

impl HistoryStats {
    /// Per-operation counts, highest first, ties by registration order.
    pub fn ranked(&self) -> Vec<(OperationName, usize)> {
        let mut out: Vec<_> = self.operations.iter().map(|(k, v)| (*k, *v)).collect();
        out.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        out
    }
}

/// The most recent rows together with their absolute position.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryListing {
    /// Index of the first listed row within the full table.
    pub offset: usize,
    /// Listed rows, oldest first.
    pub entries: Vec<HistoryEntry>,
}

/// Ordered calculation history.
///
/// Appends are unconditional. `max_history` is advisory: exceeding it is
/// logged, nothing is evicted.
pub struct HistoryStore {
    rows: Vec<HistoryEntry>,
    sink: Option<Box<dyn HistorySink>>,
    max_history: usize,
    over_limit: bool,
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStore {
    /// Store without backing storage; `save` and `load` fail with
    /// [`PersistError::NoStorage`].
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            sink: None,
            max_history: usize::MAX,
            over_limit: false,
        }
    }

    /// Store persisted through `sink`. Nothing is read until [`Self::load`].
    pub fn with_sink(sink: Box<dyn HistorySink>) -> Self {
        Self {
            sink: Some(sink),
            ..Self::new()
        }
    }

    /// Store backed by the CSV file at `path`, loaded if it exists.
    pub fn open(path: impl AsRef<std::path::Path>) -> PersistResult<Self> {
        let mut store = Self::with_sink(Box::new(CsvHistoryFile::new(path)));
        store.load()?;
        Ok(store)
    }

    /// Sets the advisory size bound.
    pub fn with_max_history(mut self, max_history: usize) -> Self {
        self.max_history = max_history;
        self
    }

    /// Appends one row.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.rows.push(entry);
        self.check_limit();
    }

    /// Replaces the table with stored contents, if any are stored.
    ///
    /// On error the in-memory table is left untouched.
    pub fn load(&mut self) -> PersistResult<()> {
        let Some(sink) = self.sink.as_ref() else {
            return Err(PersistError::NoStorage);
        };
        if let Some(rows) = sink.load()? {
            debug!(rows = rows.len(), location = %sink.location(), "history loaded");
            self.rows = rows;
            self.over_limit = false;
            self.check_limit();
        }
        Ok(())
    }

    /// Writes the whole table, replacing prior stored contents.
    pub fn save(&mut self) -> PersistResult<()> {
        let Some(sink) = self.sink.as_mut() else {
            return Err(PersistError::NoStorage);
        };
        sink.store(&self.rows)?;
        debug!(rows = self.rows.len(), location = %sink.location(), "history saved");
        Ok(())
    }

    /// Drops every row. Storage is not touched.
    pub fn clear(&mut self) {
        info!(rows = self.rows.len(), "history cleared");
        self.rows.clear();
        self.over_limit = false;
    }

    /// Row count in total and per operation.
    pub fn statistics(&self) -> HistoryStats {
        let mut operations = HashMap::new();
        for op in self.rows.iter().filter_map(|r| r.operation) {
            *operations.entry(op).or_insert(0) += 1;
        }
        HistoryStats {
            total_calculations: self.rows.len(),
            operations,
        }
    }

    /// Up to `n` most recent rows, oldest first.
    pub fn tail(&self, n: usize) -> &[HistoryEntry] {
        let start = self.rows.len().saturating_sub(n);
        &self.rows[start..]
    }

    /// Like [`Self::tail`], keeping the absolute offset for numbering.
    pub fn listing(&self, n: usize) -> HistoryListing {
        let offset = self.rows.len().saturating_sub(n);
        HistoryListing {
            offset,
            entries: self.rows[offset..].to_vec(),
        }
    }

    /// All rows, oldest first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.rows
    }

    /// Row count.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// True once the table has grown past `max_history`.
    pub fn exceeds_max_history(&self) -> bool {
        self.over_limit
    }

    /// Storage location, if backed.
    pub fn location(&self) -> Option<String> {
        self.sink.as_ref().map(|s| s.location())
    }

    fn check_limit(&mut self) {
        if self.rows.len() > self.max_history && !self.over_limit {
            self.over_limit = true;
            warn!(
                rows = self.rows.len(),
                max_history = self.max_history,
                "history exceeds configured maximum; older rows are kept"
            );
        }
    }
}

impl CalculationObserver for HistoryStore {
    fn on_calculation(&mut self, record: &CalculationRecord) {
        self.push(HistoryEntry::from(record));
    }
}
