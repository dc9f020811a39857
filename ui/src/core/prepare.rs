//! Typed task records and the derived SLA / efficiency columns.
//!
//! [`prepare`] turns a raw upload into a [`PreparedTable`]: it normalizes
//! column names, coerces known columns, and adds derived columns whose
//! prerequisites are present. Row count and order are preserved; unknown
//! columns ride along untouched in [`TaskRecord::extra`].

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;
use tracing::{debug, info};

use super::coerce::{to_flag, to_label, to_number, to_timestamp, Priority};
use super::columns::{Field, FieldKind};
use super::config::DashboardConfig;
use super::normalize::normalize;
use super::table::{Cell, RawTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SlaStatus {
    OnTime,
    Late,
    NoDate,
}

impl SlaStatus {
    pub fn from_days(days: Option<i64>) -> Self {
        match days {
            None => SlaStatus::NoDate,
            Some(days) if days > 0 => SlaStatus::Late,
            Some(_) => SlaStatus::OnTime,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SlaStatus::OnTime => "on_time",
            SlaStatus::Late => "late",
            SlaStatus::NoDate => "no_date",
        }
    }

    pub const ALL: [SlaStatus; 3] = [SlaStatus::OnTime, SlaStatus::Late, SlaStatus::NoDate];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EfficiencyCategory {
    Low,
    Normal,
    High,
    Unknown,
}

impl EfficiencyCategory {
    pub fn classify(efficiency: Option<f64>, config: &DashboardConfig) -> Self {
        match efficiency {
            None => config.undefined_efficiency,
            Some(pct) if pct < config.efficiency_low_pct => EfficiencyCategory::Low,
            Some(pct) if pct > config.efficiency_high_pct => EfficiencyCategory::High,
            Some(_) => EfficiencyCategory::Normal,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EfficiencyCategory::Low => "low",
            EfficiencyCategory::Normal => "normal",
            EfficiencyCategory::High => "high",
            EfficiencyCategory::Unknown => "unknown",
        }
    }

    pub const ALL: [EfficiencyCategory; 4] = [
        EfficiencyCategory::Low,
        EfficiencyCategory::Normal,
        EfficiencyCategory::High,
        EfficiencyCategory::Unknown,
    ];
}

/// Columns computed during preparation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Derived {
    PriorityRank,
    SlaDays,
    SlaStatus,
    Efficiency,
    EfficiencyCategory,
}

impl Derived {
    pub const ALL: [Derived; 5] = [
        Derived::PriorityRank,
        Derived::SlaDays,
        Derived::SlaStatus,
        Derived::Efficiency,
        Derived::EfficiencyCategory,
    ];

    pub fn canonical(self) -> &'static str {
        match self {
            Derived::PriorityRank => "priority_rank",
            Derived::SlaDays => "sla_days",
            Derived::SlaStatus => "sla_status",
            Derived::Efficiency => "efficiency",
            Derived::EfficiencyCategory => "efficiency_category",
        }
    }
}

/// Addresses one column of a prepared table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKey {
    Known(Field),
    Extra(usize),
    Derived(Derived),
}

/// One prepared row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskRecord {
    /// Text-valued known columns (client, team, priority label, ...).
    pub labels: BTreeMap<Field, String>,
    pub created_at: Option<PrimitiveDateTime>,
    pub desired_delivery: Option<PrimitiveDateTime>,
    pub estimated_delivery: Option<PrimitiveDateTime>,
    pub closed_at: Option<PrimitiveDateTime>,
    pub estimated_hours: Option<f64>,
    pub first_estimate_hours: Option<f64>,
    pub logged_hours: Option<f64>,
    pub logged_subtask_hours: Option<f64>,
    pub percent_complete: Option<f64>,
    pub remaining_hours: Option<f64>,
    pub urgent: bool,
    pub reopened: bool,
    pub priority_rank: Option<u8>,
    pub sla_days: Option<i64>,
    pub sla_status: Option<SlaStatus>,
    pub efficiency: Option<f64>,
    pub efficiency_category: Option<EfficiencyCategory>,
    /// Cells of unknown columns, aligned with [`PreparedTable::extra_columns`].
    pub extra: Vec<Cell>,
}

impl TaskRecord {
    pub fn label(&self, field: Field) -> Option<&str> {
        self.labels.get(&field).map(String::as_str)
    }

    pub fn date(&self, field: Field) -> Option<PrimitiveDateTime> {
        match field {
            Field::CreatedAt => self.created_at,
            Field::DesiredDelivery => self.desired_delivery,
            Field::EstimatedDelivery => self.estimated_delivery,
            Field::ClosedAt => self.closed_at,
            _ => None,
        }
    }

    pub fn number(&self, field: Field) -> Option<f64> {
        match field {
            Field::EstimatedHours => self.estimated_hours,
            Field::FirstEstimateHours => self.first_estimate_hours,
            Field::LoggedHours => self.logged_hours,
            Field::LoggedSubtaskHours => self.logged_subtask_hours,
            Field::PercentComplete => self.percent_complete,
            Field::RemainingHours => self.remaining_hours,
            _ => None,
        }
    }

    pub fn flag(&self, field: Field) -> bool {
        match field {
            Field::Urgent => self.urgent,
            Field::Reopened => self.reopened,
            _ => false,
        }
    }

    fn set_date(&mut self, field: Field, value: Option<PrimitiveDateTime>) {
        match field {
            Field::CreatedAt => self.created_at = value,
            Field::DesiredDelivery => self.desired_delivery = value,
            Field::EstimatedDelivery => self.estimated_delivery = value,
            Field::ClosedAt => self.closed_at = value,
            _ => {}
        }
    }

    fn set_number(&mut self, field: Field, value: Option<f64>) {
        match field {
            Field::EstimatedHours => self.estimated_hours = value,
            Field::FirstEstimateHours => self.first_estimate_hours = value,
            Field::LoggedHours => self.logged_hours = value,
            Field::LoggedSubtaskHours => self.logged_subtask_hours = value,
            Field::PercentComplete => self.percent_complete = value,
            Field::RemainingHours => self.remaining_hours = value,
            _ => {}
        }
    }

    fn set_flag(&mut self, field: Field, value: bool) {
        match field {
            Field::Urgent => self.urgent = value,
            Field::Reopened => self.reopened = value,
            _ => {}
        }
    }

    /// Whole days from creation to closing, when both are known.
    pub fn days_to_close(&self) -> Option<i64> {
        Some(whole_days(self.created_at?, self.closed_at?))
    }

    /// Cell view of any column, used by the detail table.
    pub fn cell(&self, key: ColumnKey) -> Cell {
        match key {
            ColumnKey::Known(field) => match field.kind() {
                FieldKind::Label => self
                    .label(field)
                    .map(Cell::text)
                    .unwrap_or(Cell::Missing),
                FieldKind::Date => self.date(field).map(Cell::DateTime).unwrap_or(Cell::Missing),
                FieldKind::Number => self.number(field).map(Cell::Number).unwrap_or(Cell::Missing),
                FieldKind::Flag => Cell::Bool(self.flag(field)),
            },
            ColumnKey::Extra(idx) => self.extra.get(idx).cloned().unwrap_or(Cell::Missing),
            ColumnKey::Derived(derived) => match derived {
                Derived::PriorityRank => self
                    .priority_rank
                    .map(|rank| Cell::Number(f64::from(rank)))
                    .unwrap_or(Cell::Missing),
                Derived::SlaDays => self
                    .sla_days
                    .map(|days| Cell::Number(days as f64))
                    .unwrap_or(Cell::Missing),
                Derived::SlaStatus => self
                    .sla_status
                    .map(|status| Cell::text(status.as_str()))
                    .unwrap_or(Cell::Missing),
                Derived::Efficiency => self.efficiency.map(Cell::Number).unwrap_or(Cell::Missing),
                Derived::EfficiencyCategory => self
                    .efficiency_category
                    .map(|category| Cell::text(category.as_str()))
                    .unwrap_or(Cell::Missing),
            },
        }
    }
}

/// Calendar-style day difference, floored (a negative half day is -1).
pub fn whole_days(from: PrimitiveDateTime, to: PrimitiveDateTime) -> i64 {
    (to - from).whole_seconds().div_euclid(86_400)
}

/// Efficiency percentage; missing when either side is missing or the
/// estimate is zero.
pub fn efficiency(logged: Option<f64>, estimated: Option<f64>) -> Option<f64> {
    let logged = logged?;
    let estimated = estimated?;
    if estimated == 0.0 {
        return None;
    }
    let pct = logged / estimated * 100.0;
    pct.is_finite().then_some(pct)
}

/// The prepared table. Cloned, never mutated, when a view is filtered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreparedTable {
    /// Column order as displayed: input order, then derived columns.
    pub columns: Vec<ColumnKey>,
    pub extra_columns: Vec<String>,
    pub rows: Vec<TaskRecord>,
    present: BTreeSet<Field>,
    derived: BTreeSet<Derived>,
}

impl PreparedTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has(&self, field: Field) -> bool {
        self.present.contains(&field)
    }

    pub fn has_derived(&self, derived: Derived) -> bool {
        self.derived.contains(&derived)
    }

    pub fn column_name(&self, key: ColumnKey) -> &str {
        match key {
            ColumnKey::Known(field) => field.canonical(),
            ColumnKey::Derived(derived) => derived.canonical(),
            ColumnKey::Extra(idx) => self.extra_columns.get(idx).map(String::as_str).unwrap_or(""),
        }
    }

    pub fn column_by_name(&self, name: &str) -> Option<ColumnKey> {
        self.columns
            .iter()
            .copied()
            .find(|key| self.column_name(*key) == name)
    }

    /// Same schema, subset of rows.
    pub fn with_rows(&self, rows: Vec<TaskRecord>) -> Self {
        Self {
            columns: self.columns.clone(),
            extra_columns: self.extra_columns.clone(),
            rows,
            present: self.present.clone(),
            derived: self.derived.clone(),
        }
    }
}

/// Normalize, coerce, and derive in one pass.
pub fn prepare(raw: &RawTable, config: &DashboardConfig) -> PreparedTable {
    let normalized = normalize(raw);

    let mut columns = Vec::with_capacity(normalized.columns.len() + 5);
    let mut extra_columns = Vec::new();
    let mut present = BTreeSet::new();
    let mut bindings = Vec::with_capacity(normalized.columns.len());

    for name in &normalized.columns {
        match Field::lookup(name) {
            Some(field) if !present.contains(&field) => {
                present.insert(field);
                columns.push(ColumnKey::Known(field));
                bindings.push(ColumnKey::Known(field));
            }
            _ => {
                let idx = extra_columns.len();
                let unique = extra_column_name(name, &extra_columns);
                extra_columns.push(unique);
                columns.push(ColumnKey::Extra(idx));
                bindings.push(ColumnKey::Extra(idx));
            }
        }
    }

    let mut rows: Vec<TaskRecord> = normalized
        .rows
        .iter()
        .map(|cells| coerce_row(cells, &bindings, extra_columns.len()))
        .collect();

    let mut derived = BTreeSet::new();

    if present.contains(&Field::Priority) {
        derived.insert(Derived::PriorityRank);
        for row in &mut rows {
            row.priority_rank = row
                .label(Field::Priority)
                .and_then(Priority::from_label)
                .map(Priority::rank);
        }
    }

    if present.contains(&Field::DesiredDelivery) && present.contains(&Field::ClosedAt) {
        derived.insert(Derived::SlaDays);
        derived.insert(Derived::SlaStatus);
        for row in &mut rows {
            row.sla_days = match (row.desired_delivery, row.closed_at) {
                (Some(desired), Some(closed)) => Some(whole_days(desired, closed)),
                _ => None,
            };
            row.sla_status = Some(SlaStatus::from_days(row.sla_days));
        }
    } else {
        debug!("desired delivery or closing date column absent; SLA skipped");
    }

    if present.contains(&Field::LoggedHours) && present.contains(&Field::EstimatedHours) {
        derived.insert(Derived::Efficiency);
        derived.insert(Derived::EfficiencyCategory);
        for row in &mut rows {
            row.efficiency = efficiency(row.logged_hours, row.estimated_hours);
            row.efficiency_category = Some(EfficiencyCategory::classify(row.efficiency, config));
        }
    } else {
        debug!("logged or estimated hours column absent; efficiency skipped");
    }

    for key in Derived::ALL {
        if derived.contains(&key) {
            columns.push(ColumnKey::Derived(key));
        }
    }

    info!(
        rows = rows.len(),
        known = present.len(),
        extra = extra_columns.len(),
        derived = derived.len(),
        "prepared task table"
    );

    PreparedTable {
        columns,
        extra_columns,
        rows,
        present,
        derived,
    }
}

/// Extras never share a display name with a known, derived or earlier extra
/// column, so `column_by_name` stays unambiguous.
fn extra_column_name(name: &str, taken: &[String]) -> String {
    let reserved = |candidate: &str| {
        Field::lookup(candidate).is_some()
            || Derived::ALL.iter().any(|d| d.canonical() == candidate)
            || taken.iter().any(|t| t == candidate)
    };
    let mut candidate = name.to_string();
    let mut suffix = 1;
    while reserved(&candidate) {
        candidate = format!("{name}.{suffix}");
        suffix += 1;
    }
    candidate
}

fn coerce_row(cells: &[Cell], bindings: &[ColumnKey], extra_width: usize) -> TaskRecord {
    let mut record = TaskRecord {
        extra: vec![Cell::Missing; extra_width],
        ..TaskRecord::default()
    };

    for (cell, binding) in cells.iter().zip(bindings) {
        match *binding {
            ColumnKey::Known(field) => match field.kind() {
                FieldKind::Label => {
                    if let Some(label) = to_label(cell) {
                        record.labels.insert(field, label);
                    }
                }
                FieldKind::Date => record.set_date(field, to_timestamp(cell)),
                FieldKind::Number => record.set_number(field, to_number(cell)),
                FieldKind::Flag => record.set_flag(field, to_flag(cell)),
            },
            ColumnKey::Extra(idx) => record.extra[idx] = cell.clone(),
            ColumnKey::Derived(_) => {}
        }
    }

    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn raw(columns: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable::new(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|v| Cell::text(*v)).collect())
                .collect(),
        )
    }

    #[test]
    fn late_when_closed_after_desired_delivery() {
        let table = prepare(
            &raw(
                &["Entrega desejada", "Fechada em"],
                &[&["2024-01-10", "2024-01-15"]],
            ),
            &DashboardConfig::default(),
        );
        let row = &table.rows[0];
        assert_eq!(row.sla_days, Some(5));
        assert_eq!(row.sla_status, Some(SlaStatus::Late));
    }

    #[test]
    fn sla_status_follows_sla_days() {
        let table = prepare(
            &raw(
                &["Entrega desejada", "Fechada em"],
                &[
                    &["2024-01-10", "2024-01-10"],
                    &["2024-01-10", "2024-01-02"],
                    &["2024-01-10", "-"],
                    &["", "2024-01-02"],
                ],
            ),
            &DashboardConfig::default(),
        );
        let statuses: Vec<_> = table.rows.iter().map(|r| r.sla_status).collect();
        assert_eq!(
            statuses,
            vec![
                Some(SlaStatus::OnTime),
                Some(SlaStatus::OnTime),
                Some(SlaStatus::NoDate),
                Some(SlaStatus::NoDate),
            ]
        );
        assert_eq!(table.rows[1].sla_days, Some(-8));
        for row in &table.rows {
            assert_eq!(row.sla_status == Some(SlaStatus::Late), row.sla_days.map_or(false, |d| d > 0));
            assert_eq!(row.sla_status == Some(SlaStatus::NoDate), row.sla_days.is_none());
        }
    }

    #[test]
    fn partial_days_floor_like_calendar_differences() {
        assert_eq!(whole_days(datetime!(2024-01-10 12:00), datetime!(2024-01-10 00:00)), -1);
        assert_eq!(whole_days(datetime!(2024-01-10 00:00), datetime!(2024-01-11 23:59)), 1);
    }

    #[test]
    fn efficiency_categories() {
        let table = prepare(
            &raw(
                &["Já registradas h", "Esforço estimado h"],
                &[&["30", "100"], &["50", "100"], &["100", "100"], &["101", "100"], &["5", "0"], &["5", "-"]],
            ),
            &DashboardConfig::default(),
        );
        let rows = &table.rows;
        assert_eq!(rows[0].efficiency, Some(30.0));
        assert_eq!(rows[0].efficiency_category, Some(EfficiencyCategory::Low));
        assert_eq!(rows[1].efficiency_category, Some(EfficiencyCategory::Normal));
        assert_eq!(rows[2].efficiency_category, Some(EfficiencyCategory::Normal));
        assert_eq!(rows[3].efficiency_category, Some(EfficiencyCategory::High));
        assert_eq!(rows[4].efficiency, None);
        assert_eq!(rows[4].efficiency_category, Some(EfficiencyCategory::Normal));
        assert_eq!(rows[5].efficiency, None);
    }

    #[test]
    fn undefined_efficiency_fallback_is_configurable() {
        let config = DashboardConfig {
            undefined_efficiency: EfficiencyCategory::Unknown,
            ..DashboardConfig::default()
        };
        let table = prepare(
            &raw(&["Já registradas h", "Esforço estimado h"], &[&["5", "0"]]),
            &config,
        );
        assert_eq!(table.rows[0].efficiency_category, Some(EfficiencyCategory::Unknown));
    }

    #[test]
    fn missing_prerequisites_skip_derived_columns() {
        let table = prepare(
            &raw(&["Cliente", "Fechada em"], &[&["Acme", "2024-01-15"]]),
            &DashboardConfig::default(),
        );
        assert!(!table.has_derived(Derived::SlaStatus));
        assert!(!table.has_derived(Derived::Efficiency));
        assert_eq!(table.rows[0].sla_status, None);
        assert_eq!(table.columns.len(), 2);
    }

    #[test]
    fn coerces_flags_priorities_and_keeps_extras() {
        let table = prepare(
            &raw(
                &["Reaberta?", "Urgente", "Prioridade", "Observação"],
                &[
                    &["Sim", "Não", "Alta", "x"],
                    &["Não", "-", "Crítica", ""],
                    &["talvez", "Sim", "-", "y"],
                ],
            ),
            &DashboardConfig::default(),
        );
        let flags: Vec<_> = table.rows.iter().map(|r| (r.reopened, r.urgent)).collect();
        assert_eq!(flags, vec![(true, false), (false, false), (false, true)]);
        let ranks: Vec<_> = table.rows.iter().map(|r| r.priority_rank).collect();
        assert_eq!(ranks, vec![Some(3), None, None]);
        assert_eq!(table.extra_columns, vec!["Observação"]);
        assert_eq!(table.rows[1].extra, vec![Cell::Missing]);
        assert_eq!(
            table.column_by_name("priority_rank"),
            Some(ColumnKey::Derived(Derived::PriorityRank))
        );
    }

    #[test]
    fn colliding_extra_columns_get_distinct_names() {
        let table = prepare(
            &raw(
                &["Cliente", "client", "sla_status", "Nota", "Nota"],
                &[&["Acme", "Other", "free text", "a", "b"]],
            ),
            &DashboardConfig::default(),
        );
        assert_eq!(table.rows[0].label(Field::Client), Some("Acme"));
        assert_eq!(table.extra_columns, vec!["client.1", "sla_status.1", "Nota", "Nota.1"]);

        let names: Vec<&str> = table.columns.iter().map(|k| table.column_name(*k)).collect();
        let distinct: BTreeSet<&str> = names.iter().copied().collect();
        assert_eq!(distinct.len(), names.len());
        assert_eq!(table.column_by_name("client"), Some(ColumnKey::Known(Field::Client)));
        assert_eq!(table.column_by_name("client.1"), Some(ColumnKey::Extra(0)));
        assert_eq!(table.column_by_name("Nota.1"), Some(ColumnKey::Extra(3)));
    }

    #[test]
    fn unparsable_dates_become_missing() {
        let table = prepare(
            &raw(&["Criada em", "Fechada em"], &[&["ontem", "2024-02-01"], &["2024-01-01", "2024-02-01"]]),
            &DashboardConfig::default(),
        );
        assert_eq!(table.rows[0].created_at, None);
        assert_eq!(table.rows[1].days_to_close(), Some(31));
    }

    #[test]
    fn row_count_and_order_are_preserved() {
        let input = raw(&["Cliente"], &[&["a"], &["-"], &["c"]]);
        let table = prepare(&input, &DashboardConfig::default());
        assert_eq!(table.len(), input.len());
        assert_eq!(table.rows[2].label(Field::Client), Some("c"));
        assert_eq!(table.rows[1].label(Field::Client), None);
    }
}
