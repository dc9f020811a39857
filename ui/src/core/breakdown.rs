//! Grouped aggregates behind the dashboard charts and the statistical
//! summary. Every function returns `None` when the table lacks the columns it
//! needs, so the caller can simply skip the panel.

use std::collections::BTreeMap;

use time::PrimitiveDateTime;

use super::columns::{Field, FieldKind};
use super::config::DashboardConfig;
use super::prepare::{ColumnKey, Derived, EfficiencyCategory, PreparedTable, SlaStatus};
use super::stats::{histogram, mean, median, percentile, std_dev, Bin};
use super::table::Cell;

/// Label -> row count, most frequent first (ties by label).
pub fn category_counts(table: &PreparedTable, field: Field) -> Option<Vec<(String, usize)>> {
    if !table.has(field) {
        return None;
    }
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for label in table.rows.iter().filter_map(|row| row.label(field)) {
        *counts.entry(label).or_default() += 1;
    }
    let mut out: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(label, count)| (label.to_string(), count))
        .collect();
    out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    Some(out)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReopenedSplit {
    pub not_reopened: usize,
    pub reopened: usize,
}

pub fn reopened_split(table: &PreparedTable) -> Option<ReopenedSplit> {
    if !table.has(Field::Reopened) {
        return None;
    }
    let reopened = table.rows.iter().filter(|row| row.reopened).count();
    Some(ReopenedSplit {
        not_reopened: table.len() - reopened,
        reopened,
    })
}

/// Logged hours summed per label, largest first. Rows without a label are
/// left out of every group.
pub fn hours_by(table: &PreparedTable, field: Field) -> Option<Vec<(String, f64)>> {
    if !table.has(field) || !table.has(Field::LoggedHours) {
        return None;
    }
    let mut sums: BTreeMap<&str, f64> = BTreeMap::new();
    for row in &table.rows {
        if let Some(label) = row.label(field) {
            *sums.entry(label).or_default() += row.logged_hours.unwrap_or(0.0);
        }
    }
    Some(sorted_desc(sums))
}

/// Mean days from creation to closing per label, slowest first.
pub fn mean_days_to_close_by(table: &PreparedTable, field: Field) -> Option<Vec<(String, f64)>> {
    if !table.has(field) || !table.has(Field::CreatedAt) || !table.has(Field::ClosedAt) {
        return None;
    }
    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for row in &table.rows {
        if let (Some(label), Some(days)) = (row.label(field), row.days_to_close()) {
            groups.entry(label).or_default().push(days as f64);
        }
    }
    let means = groups
        .into_iter()
        .filter_map(|(label, days)| mean(&days).map(|m| (label, m)))
        .collect();
    Some(sorted_desc(means))
}

fn sorted_desc(values: BTreeMap<&str, f64>) -> Vec<(String, f64)> {
    let mut out: Vec<(String, f64)> = values
        .into_iter()
        .map(|(label, value)| (label.to_string(), value))
        .collect();
    out.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    out
}

pub fn sla_status_counts(table: &PreparedTable) -> Option<Vec<(SlaStatus, usize)>> {
    if !table.has_derived(Derived::SlaStatus) {
        return None;
    }
    Some(
        SlaStatus::ALL
            .iter()
            .map(|status| {
                let count = table
                    .rows
                    .iter()
                    .filter(|row| row.sla_status == Some(*status))
                    .count();
                (*status, count)
            })
            .collect(),
    )
}

#[derive(Debug, Clone, PartialEq)]
pub struct SlaDaysSummary {
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub late_count: usize,
    /// Histogram of the values inside the configured window.
    pub histogram: Vec<Bin>,
}

pub fn sla_days_summary(table: &PreparedTable, config: &DashboardConfig) -> Option<SlaDaysSummary> {
    if !table.has_derived(Derived::SlaDays) {
        return None;
    }
    let days: Vec<f64> = table
        .rows
        .iter()
        .filter_map(|row| row.sla_days)
        .map(|d| d as f64)
        .collect();
    let (low, high) = config.sla_window_days;
    let windowed: Vec<f64> = days
        .iter()
        .copied()
        .filter(|d| *d >= low as f64 && *d <= high as f64)
        .collect();
    Some(SlaDaysSummary {
        mean: mean(&days),
        median: median(&days),
        late_count: days.iter().filter(|d| **d > 0.0).count(),
        histogram: histogram(&windowed, config.histogram_bins),
    })
}

/// Counts per efficiency category; `Unknown` only appears when it is used.
pub fn efficiency_category_counts(table: &PreparedTable) -> Option<Vec<(EfficiencyCategory, usize)>> {
    if !table.has_derived(Derived::EfficiencyCategory) {
        return None;
    }
    Some(
        EfficiencyCategory::ALL
            .iter()
            .map(|category| {
                let count = table
                    .rows
                    .iter()
                    .filter(|row| row.efficiency_category == Some(*category))
                    .count();
                (*category, count)
            })
            .filter(|(category, count)| *category != EfficiencyCategory::Unknown || *count > 0)
            .collect(),
    )
}

pub fn efficiency_histogram(table: &PreparedTable, config: &DashboardConfig) -> Option<Vec<Bin>> {
    if !table.has_derived(Derived::Efficiency) {
        return None;
    }
    let values: Vec<f64> = table.rows.iter().filter_map(|row| row.efficiency).collect();
    Some(histogram(&values, config.histogram_bins))
}

/// Per-column descriptive statistics, like a dataframe `describe()`.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericSummary {
    pub column: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub p25: Option<f64>,
    pub p50: Option<f64>,
    pub p75: Option<f64>,
    pub max: Option<f64>,
}

fn is_numeric(key: ColumnKey) -> bool {
    match key {
        ColumnKey::Known(field) => field.kind() == FieldKind::Number,
        ColumnKey::Derived(derived) => matches!(
            derived,
            Derived::PriorityRank | Derived::SlaDays | Derived::Efficiency
        ),
        ColumnKey::Extra(_) => false,
    }
}

pub fn describe_numeric(table: &PreparedTable) -> Vec<NumericSummary> {
    table
        .columns
        .iter()
        .copied()
        .filter(|key| is_numeric(*key))
        .map(|key| {
            let mut values: Vec<f64> = table
                .rows
                .iter()
                .filter_map(|row| match row.cell(key) {
                    Cell::Number(value) => Some(value),
                    _ => None,
                })
                .collect();
            values.sort_by(f64::total_cmp);
            NumericSummary {
                column: table.column_name(key).to_string(),
                count: values.len(),
                mean: mean(&values),
                std: std_dev(&values),
                min: values.first().copied(),
                p25: percentile(&values, 0.25),
                p50: percentile(&values, 0.5),
                p75: percentile(&values, 0.75),
                max: values.last().copied(),
            }
        })
        .collect()
}

/// Top value counts for the first `columns` label-like columns.
pub fn top_categories(
    table: &PreparedTable,
    columns: usize,
    top: usize,
) -> Vec<(String, Vec<(String, usize)>)> {
    table
        .columns
        .iter()
        .filter_map(|key| match key {
            ColumnKey::Known(field) if field.kind() == FieldKind::Label => Some(*field),
            _ => None,
        })
        .take(columns)
        .filter_map(|field| {
            category_counts(table, field).map(|mut counts| {
                counts.truncate(top);
                (field.canonical().to_string(), counts)
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct DateRange {
    pub column: String,
    pub first: Option<PrimitiveDateTime>,
    pub last: Option<PrimitiveDateTime>,
}

/// Earliest and latest timestamp of the first `columns` date columns.
pub fn date_ranges(table: &PreparedTable, columns: usize) -> Vec<DateRange> {
    table
        .columns
        .iter()
        .filter_map(|key| match key {
            ColumnKey::Known(field) if field.kind() == FieldKind::Date => Some(*field),
            _ => None,
        })
        .take(columns)
        .map(|field| {
            let dates = table.rows.iter().filter_map(|row| row.date(field));
            DateRange {
                column: field.canonical().to_string(),
                first: dates.clone().min(),
                last: dates.max(),
            }
        })
        .collect()
}
