//! Raw tabular data as decoded from an upload, before any typing.

use std::fmt;

use time::{macros::format_description, PrimitiveDateTime};

/// A single cell. CSV input only produces `Text`; workbooks keep their native
/// cell types.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Missing,
    Text(String),
    Number(f64),
    Bool(bool),
    DateTime(PrimitiveDateTime),
}

impl Cell {
    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    pub fn text<T: Into<String>>(value: T) -> Self {
        Cell::Text(value.into())
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Missing => Ok(()),
            Cell::Text(value) => f.write_str(value),
            Cell::Number(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
                write!(f, "{}", *value as i64)
            }
            Cell::Number(value) => write!(f, "{value}"),
            Cell::Bool(value) => write!(f, "{value}"),
            Cell::DateTime(value) => {
                let formatted = value
                    .format(&format_description!(
                        "[year]-[month]-[day] [hour]:[minute]:[second]"
                    ))
                    .map_err(|_| fmt::Error)?;
                f.write_str(&formatted)
            }
        }
    }
}

/// Header plus row-major cells. Every row holds exactly `columns.len()` cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    /// Build a table, padding short rows with `Missing` and truncating long ones.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Cell::Missing);
                row
            })
            .collect();
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Cells of one column, top to bottom.
    pub fn column(&self, index: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.rows.iter().map(move |row| &row[index])
    }
}

/// Make header names unique the way spreadsheet tools do: the second `x`
/// becomes `x.1`, the third `x.2`, and so on.
pub fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::with_capacity(headers.len());
    for header in headers {
        let mut candidate = header.clone();
        let mut suffix = 1;
        while seen.contains(&candidate) {
            candidate = format!("{header}.{suffix}");
            suffix += 1;
        }
        seen.push(candidate);
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn rows_are_padded_and_truncated_to_header_width() {
        let table = RawTable::new(
            vec!["a".into(), "b".into()],
            vec![vec![Cell::text("1")], vec![Cell::text("1"), Cell::text("2"), Cell::text("3")]],
        );
        assert_eq!(table.rows[0], vec![Cell::text("1"), Cell::Missing]);
        assert_eq!(table.rows[1].len(), 2);
    }

    #[test]
    fn duplicate_headers_get_suffixes() {
        let headers = dedupe_headers(vec!["x".into(), "y".into(), "x".into(), "x".into()]);
        assert_eq!(headers, vec!["x", "y", "x.1", "x.2"]);
    }

    #[test]
    fn display_renders_integral_numbers_without_fraction() {
        assert_eq!(Cell::Number(42.0).to_string(), "42");
        assert_eq!(Cell::Number(2.5).to_string(), "2.5");
        assert_eq!(Cell::Missing.to_string(), "");
        assert_eq!(
            Cell::DateTime(datetime!(2024-01-15 09:30)).to_string(),
            "2024-01-15 09:30:00"
        );
    }
}
