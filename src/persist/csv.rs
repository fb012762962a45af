//! CSV-backed history file.
//!
//! Layout: one header row, then one row per entry, columns
//! `operand1,operand2,operation,result,timestamp`. Unset values are empty
//! fields. On read, expected columns missing from the header default to
//! unset and unknown columns are ignored.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use crate::{
    core::history::HistoryEntry,
    types::{OperationName, format_timestamp, parse_timestamp},
};

use super::{HistorySink, PersistError, PersistResult};

/// Column names, in file order.
pub const COLUMNS: [&str; 5] = ["operand1", "operand2", "operation", "result", "timestamp"];

/// [`HistorySink`] writing a CSV file at a fixed path.
#[derive(Debug, Clone)]
pub struct CsvHistoryFile {
    path: PathBuf,
}

impl CsvHistoryFile {
    /// Sink for `path`. Nothing is touched until the first load or store.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Configured file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistorySink for CsvHistoryFile {
    fn load(&self) -> PersistResult<Option<Vec<HistoryEntry>>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        decode_table(&text).map(Some)
    }

    fn store(&mut self, rows: &[HistoryEntry]) -> PersistResult<()> {
        fs::write(&self.path, encode_table(rows))?;
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Renders the whole table, header included.
pub fn encode_table(rows: &[HistoryEntry]) -> String {
    let mut out = COLUMNS.join(",");
    out.push('\n');
    for row in rows {
        let fields = [
            row.operand1.map(|v| v.to_string()),
            row.operand2.map(|v| v.to_string()),
            row.operation.map(|op| op.as_str().to_string()),
            row.result.map(|v| v.to_string()),
            row.timestamp.as_ref().map(format_timestamp),
        ];
        let line: Vec<String> = fields
            .iter()
            .map(|f| quote_field(f.as_deref().unwrap_or("")))
            .collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }
    out
}

/// Parses a stored table. Empty input is an empty table.
pub fn decode_table(text: &str) -> PersistResult<Vec<HistoryEntry>> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.trim().is_empty());

    let Some((header_line, header)) = lines.next() else {
        return Ok(Vec::new());
    };
    let header = split_record(header).map_err(|message| PersistError::Corrupt {
        line: header_line,
        message,
    })?;
    let positions: Vec<Option<usize>> = COLUMNS
        .iter()
        .map(|col| header.iter().position(|h| h.trim() == *col))
        .collect();

    let mut rows = Vec::new();
    for (line_no, line) in lines {
        let corrupt = |message: String| PersistError::Corrupt {
            line: line_no,
            message,
        };
        let fields = split_record(line).map_err(corrupt)?;
        if fields.len() != header.len() {
            return Err(corrupt(format!(
                "expected {} fields, found {}",
                header.len(),
                fields.len()
            )));
        }
        let cell = |col: usize| {
            positions[col]
                .map(|pos| fields[pos].trim())
                .filter(|v| !v.is_empty())
        };

        rows.push(HistoryEntry {
            operand1: parse_number(cell(0), "operand1").map_err(corrupt)?,
            operand2: parse_number(cell(1), "operand2").map_err(corrupt)?,
            operation: cell(2)
                .map(|raw| {
                    OperationName::parse(raw).ok_or_else(|| format!("unknown operation '{raw}'"))
                })
                .transpose()
                .map_err(corrupt)?,
            result: parse_number(cell(3), "result").map_err(corrupt)?,
            timestamp: cell(4)
                .map(|raw| parse_timestamp(raw).map_err(|e| format!("bad timestamp '{raw}': {e}")))
                .transpose()
                .map_err(corrupt)?,
        });
    }
    Ok(rows)
}

fn parse_number(raw: Option<&str>, column: &str) -> Result<Option<f64>, String> {
    raw.map(|v| {
        v.parse::<f64>()
            .map_err(|_| format!("{column} is not a number: '{v}'"))
    })
    .transpose()
}

fn quote_field(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

// Splits one line, honoring double-quoted fields with `""` escapes.
fn split_record(line: &str) -> Result<Vec<String>, String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, in_quotes) {
            ('"', true) if chars.peek() == Some(&'"') => {
                chars.next();
                current.push('"');
            }
            ('"', true) => in_quotes = false,
            ('"', false) if current.is_empty() => in_quotes = true,
            (',', false) => fields.push(std::mem::take(&mut current)),
            (c, _) => current.push(c),
        }
    }
    if in_quotes {
        return Err("unterminated quoted field".to_string());
    }
    fields.push(current);
    Ok(fields)
}
