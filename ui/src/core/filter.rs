//! Equality filters over client, task type and priority.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::columns::Field;
use super::prepare::{PreparedTable, TaskRecord};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection {
    #[default]
    All,
    Only(String),
}

impl Selection {
    pub fn from_choice(value: &str) -> Self {
        if value.is_empty() {
            Selection::All
        } else {
            Selection::Only(value.to_string())
        }
    }

    pub fn as_choice(&self) -> &str {
        match self {
            Selection::All => "",
            Selection::Only(value) => value,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }

    fn matches(&self, value: Option<&str>) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(wanted) => value == Some(wanted.as_str()),
        }
    }
}

/// Conjunction of the three sidebar filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewFilter {
    pub client: Selection,
    pub task_type: Selection,
    pub priority: Selection,
}

impl ViewFilter {
    pub fn is_active(&self) -> bool {
        !(self.client.is_all() && self.task_type.is_all() && self.priority.is_all())
    }

    fn clauses(&self) -> [(Field, &Selection); 3] {
        [
            (Field::Client, &self.client),
            (Field::TaskType, &self.task_type),
            (Field::Priority, &self.priority),
        ]
    }

    fn matches(&self, table: &PreparedTable, row: &TaskRecord) -> bool {
        self.clauses()
            .iter()
            .filter(|(field, _)| table.has(*field))
            .all(|(field, selection)| selection.matches(row.label(*field)))
    }

    /// New table holding only the matching rows; `table` is left untouched.
    /// Clauses on columns the table lacks are ignored.
    pub fn apply(&self, table: &PreparedTable) -> PreparedTable {
        if !self.is_active() {
            return table.clone();
        }
        let rows: Vec<TaskRecord> = table
            .rows
            .iter()
            .filter(|row| self.matches(table, row))
            .cloned()
            .collect();
        debug!(kept = rows.len(), total = table.len(), filter = ?self, "applied view filter");
        table.with_rows(rows)
    }
}

/// Choices offered for each filter, `None` when the column is absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    pub clients: Option<Vec<String>>,
    pub task_types: Option<Vec<String>>,
    pub priorities: Option<Vec<String>>,
}

impl FilterOptions {
    pub fn from_table(table: &PreparedTable) -> Self {
        Self {
            clients: distinct(table, Field::Client),
            task_types: distinct(table, Field::TaskType),
            priorities: distinct(table, Field::Priority),
        }
    }
}

/// Sorted distinct non-missing labels of a column.
pub fn distinct(table: &PreparedTable, field: Field) -> Option<Vec<String>> {
    if !table.has(field) {
        return None;
    }
    let values: BTreeSet<&str> = table.rows.iter().filter_map(|row| row.label(field)).collect();
    Some(values.into_iter().map(str::to_string).collect())
}
