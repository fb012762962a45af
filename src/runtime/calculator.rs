use std::{
    cell::{Ref, RefCell},
    rc::Rc,
};

use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    calc::{Calculation, CalculationRecord, ObserverHandle},
    config::{CalculatorConfig, ConfigError},
    core::{history::HistoryStore, snapshot::SnapshotManager},
    input::{Command, InputError},
    op::{OperationError, OperationRegistry},
    persist::{PersistError, csv::CsvHistoryFile},
};

use super::events::CommandOutcome;

/// Rows shown by the `history` command.
pub const HISTORY_LISTING_LEN: usize = 20;

#[derive(Debug, Error)]
pub enum CalculatorError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Operation(#[from] OperationError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Save(PersistError),
    #[error("{0}")]
    Load(PersistError),
}

/// Single entry point mapping user commands onto the registry, history
/// store and snapshot manager.
pub struct Calculator {
    config: CalculatorConfig,
    registry: OperationRegistry,
    history: Rc<RefCell<HistoryStore>>,
    snapshots: SnapshotManager,
    calculations: Vec<CalculationRecord>,
    running: bool,
}

impl Calculator {
    /// Opens the configured history file and loads it if it exists.
    pub fn new(config: CalculatorConfig) -> Result<Self, CalculatorError> {
        config.validate()?;
        let mut history =
            HistoryStore::with_sink(Box::new(CsvHistoryFile::new(&config.history_file)))
                .with_max_history(config.max_history);
        history.load().map_err(CalculatorError::Load)?;
        Ok(Self::with_history(config, history))
    }

    pub fn with_history(config: CalculatorConfig, history: HistoryStore) -> Self {
        Self {
            config,
            registry: OperationRegistry::new(),
            history: Rc::new(RefCell::new(history)),
            snapshots: SnapshotManager::new(),
            calculations: Vec::new(),
            running: true,
        }
    }

    /// Parses and runs one line of user input.
    pub fn execute(&mut self, line: &str) -> Result<CommandOutcome, CalculatorError> {
        let command = Command::parse(line)?;
        self.run_command(command)
    }

    pub fn run_command(&mut self, command: Command) -> Result<CommandOutcome, CalculatorError> {
        match command {
            Command::Empty => Ok(CommandOutcome::Idle),
            Command::Help => Ok(CommandOutcome::Help),
            Command::Exit => {
                self.running = false;
                Ok(CommandOutcome::Exited)
            }
            Command::History => Ok(CommandOutcome::History(
                self.history.borrow().listing(HISTORY_LISTING_LEN),
            )),
            Command::Stats => Ok(CommandOutcome::Stats(self.history.borrow().statistics())),
            Command::Clear => Ok(self.clear()),
            Command::Undo => Ok(self.undo()),
            Command::Redo => Ok(self.redo()),
            Command::Save => self.save(),
            Command::Load => self.load(),
            Command::Calculate {
                operation,
                operand1,
                operand2,
            } => self.calculate(&operation, operand1, operand2),
        }
    }

    /// Archives the live list, then resolves, executes and records one
    /// calculation.
    ///
    /// The snapshot is taken before the operation name is resolved, so an
    /// unknown or domain-invalid request still consumes an undo step and
    /// discards redo history.
    pub fn calculate(
        &mut self,
        operation: &str,
        operand1: f64,
        operand2: f64,
    ) -> Result<CommandOutcome, CalculatorError> {
        self.snapshots.save_state(&self.calculations);
        let operation = self.registry.resolve(operation)?;

        let mut calculation = Calculation::new(operand1, operand2, operation);
        let observer: ObserverHandle = self.history.clone();
        calculation.attach(&observer);
        let result = calculation.execute()?;
        debug!(
            operation = %operation.name,
            operand1,
            operand2,
            result,
            "calculation executed"
        );

        let record = calculation.into_record();
        self.calculations.push(record.clone());

        let auto_save_error = if self.config.auto_save {
            self.history.borrow_mut().save().err().map(|err| {
                warn!(error = %err, "auto-save failed");
                err.to_string()
            })
        } else {
            None
        };

        Ok(CommandOutcome::Calculated {
            record,
            auto_save_error,
        })
    }

    pub fn undo(&mut self) -> CommandOutcome {
        match self.snapshots.undo() {
            Some(state) => {
                self.calculations = state;
                CommandOutcome::Undone
            }
            None => CommandOutcome::NothingToUndo,
        }
    }

    pub fn redo(&mut self) -> CommandOutcome {
        match self.snapshots.redo() {
            Some(state) => {
                self.calculations = state;
                CommandOutcome::Redone
            }
            None => CommandOutcome::NothingToRedo,
        }
    }

    /// Empties history, both snapshot stacks and the live list. The history
    /// file keeps its contents until the next save.
    pub fn clear(&mut self) -> CommandOutcome {
        self.history.borrow_mut().clear();
        self.snapshots.clear();
        self.calculations.clear();
        CommandOutcome::Cleared
    }

    pub fn save(&mut self) -> Result<CommandOutcome, CalculatorError> {
        let mut history = self.history.borrow_mut();
        history.save().map_err(CalculatorError::Save)?;
        let location = history
            .location()
            .ok_or(CalculatorError::Save(PersistError::NoStorage))?;
        Ok(CommandOutcome::Saved { location })
    }

    pub fn load(&mut self) -> Result<CommandOutcome, CalculatorError> {
        self.history
            .borrow_mut()
            .load()
            .map_err(CalculatorError::Load)?;
        Ok(CommandOutcome::Loaded)
    }

    /// Live calculation list.
    pub fn calculations(&self) -> &[CalculationRecord] {
        &self.calculations
    }

    pub fn history(&self) -> Ref<'_, HistoryStore> {
        self.history.borrow()
    }

    pub fn snapshots(&self) -> &SnapshotManager {
        &self.snapshots
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    pub fn registry(&self) -> &OperationRegistry {
        &self.registry
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}
