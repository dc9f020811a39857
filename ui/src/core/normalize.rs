//! Column normalization: trimmed + canonical names, placeholder cells turned
//! into `Missing`, all-empty columns dropped.

use tracing::debug;

use super::columns::canonical_name;
use super::table::{Cell, RawTable};

/// Literal values that exports use in place of an empty cell.
pub const PLACEHOLDERS: [&str; 4] = ["-", "NaN", "nan", ""];

pub fn is_placeholder(cell: &Cell) -> bool {
    match cell {
        Cell::Missing => true,
        Cell::Text(value) => PLACEHOLDERS.contains(&value.trim()),
        Cell::Number(value) => value.is_nan(),
        Cell::Bool(_) | Cell::DateTime(_) => false,
    }
}

/// Normalize a raw table. Placeholders are replaced before empty columns are
/// dropped, which keeps the operation idempotent.
pub fn normalize(raw: &RawTable) -> RawTable {
    let columns: Vec<String> = raw.columns.iter().map(|c| canonical_name(c)).collect();

    let rows: Vec<Vec<Cell>> = raw
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| {
                    if is_placeholder(cell) {
                        Cell::Missing
                    } else {
                        cell.clone()
                    }
                })
                .collect()
        })
        .collect();

    let keep: Vec<bool> = (0..columns.len())
        .map(|idx| rows.iter().any(|row| !row[idx].is_missing()))
        .collect();

    let dropped: Vec<&str> = columns
        .iter()
        .zip(&keep)
        .filter(|(_, keep)| !**keep)
        .map(|(name, _)| name.as_str())
        .collect();
    if !dropped.is_empty() {
        debug!(columns = ?dropped, "dropping empty columns");
    }

    let columns = columns
        .iter()
        .zip(&keep)
        .filter(|(_, keep)| **keep)
        .map(|(name, _)| name.clone())
        .collect();
    let rows = rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .zip(&keep)
                .filter(|(_, keep)| **keep)
                .map(|(cell, _)| cell)
                .collect()
        })
        .collect();

    RawTable { columns, rows }
}
