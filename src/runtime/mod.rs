//! Command facade, its outcomes and the interactive shell around it.

/// Command facade over registry, history and snapshots.
pub mod calculator;
/// Typed command outcomes.
pub mod events;
/// Outcome rendering and the stdin loop.
pub mod repl;
