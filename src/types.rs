//! Shared primitive types: operation names and timestamps.

use std::{fmt, str::FromStr};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Wall-clock instant at which a calculation was executed (local time, no zone).
pub type Timestamp = NaiveDateTime;

/// ISO-8601 layout used for timestamps in the history file.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Binary arithmetic operation key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationName {
    /// `a + b`.
    Add,
    /// `a - b`.
    Subtract,
    /// `a * b`.
    Multiply,
    /// `a / b`.
    Divide,
    /// `a` raised to `b`.
    Power,
    /// The `b`-th root of `a`.
    Root,
    /// Floored remainder of `a / b`.
    Modulus,
}

impl OperationName {
    /// Every operation, in registration order.
    pub const ALL: [OperationName; 7] = [
        Self::Add,
        Self::Subtract,
        Self::Multiply,
        Self::Divide,
        Self::Power,
        Self::Root,
        Self::Modulus,
    ];

    /// Canonical lowercase name, as typed by users and stored on disk.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Subtract => "subtract",
            Self::Multiply => "multiply",
            Self::Divide => "divide",
            Self::Power => "power",
            Self::Root => "root",
            Self::Modulus => "modulus",
        }
    }

    /// Case-insensitive lookup; `None` when the name is not registered.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for OperationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown operation: '{s}'"))
    }
}

/// Formats a timestamp the way the history file stores it.
pub fn format_timestamp(ts: &Timestamp) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Parses a stored timestamp; accepts the optional fractional-second part.
pub fn parse_timestamp(raw: &str) -> Result<Timestamp, chrono::ParseError> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
}
