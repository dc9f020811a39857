//! Headline metrics for a (possibly filtered) task table.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::columns::Field;
use super::config::DashboardConfig;
use super::prepare::{Derived, PreparedTable, SlaStatus};
use super::stats::{mean, median};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TableMetrics {
    pub total_rows: usize,
    pub total_logged_hours: f64,
    pub mean_hours_per_row: Option<f64>,
    pub reopened_count: usize,
    pub reopened_percent: Option<f64>,
    /// `None` when efficiency cannot be derived for this table.
    pub mean_efficiency: Option<f64>,
    pub efficiency_outlier_count: Option<usize>,
    /// `None` when SLA cannot be derived or the view is empty.
    pub on_time_percent: Option<f64>,
    pub late_percent: Option<f64>,
    pub mean_days_to_close: Option<f64>,
    pub median_days_to_close: Option<f64>,
}

impl TableMetrics {
    pub fn from_table(table: &PreparedTable, config: &DashboardConfig) -> Self {
        let total_rows = table.len();

        let (total_logged_hours, mean_hours_per_row) = if table.has(Field::LoggedHours) {
            let hours: Vec<f64> = table.rows.iter().filter_map(|r| r.logged_hours).collect();
            (hours.iter().sum(), mean(&hours))
        } else {
            (0.0, Some(0.0))
        };

        let (reopened_count, reopened_percent) = if table.has(Field::Reopened) {
            let count = table.rows.iter().filter(|r| r.reopened).count();
            (count, percent_of(count, total_rows))
        } else {
            (0, Some(0.0))
        };

        let (mean_efficiency, efficiency_outlier_count) = if table.has_derived(Derived::Efficiency)
        {
            let values: Vec<f64> = table.rows.iter().filter_map(|r| r.efficiency).collect();
            let outliers = values
                .iter()
                .filter(|pct| **pct < config.efficiency_low_pct || **pct > config.efficiency_high_pct)
                .count();
            (mean(&values), Some(outliers))
        } else {
            (None, None)
        };

        let (on_time_percent, late_percent) = if table.has_derived(Derived::SlaStatus) {
            let statuses: Vec<SlaStatus> = table.rows.iter().filter_map(|r| r.sla_status).collect();
            let share = |wanted: SlaStatus| {
                percent_of(statuses.iter().filter(|s| **s == wanted).count(), statuses.len())
            };
            (share(SlaStatus::OnTime), share(SlaStatus::Late))
        } else {
            (None, None)
        };

        let days: Vec<f64> = table
            .rows
            .iter()
            .filter_map(|r| r.days_to_close())
            .map(|d| d as f64)
            .collect();

        Self {
            total_rows,
            total_logged_hours,
            mean_hours_per_row,
            reopened_count,
            reopened_percent,
            mean_efficiency,
            efficiency_outlier_count,
            on_time_percent,
            late_percent,
            mean_days_to_close: mean(&days),
            median_days_to_close: median(&days),
        }
    }

    /// Flat name -> value mapping consumed by the overview cards. Metrics that
    /// do not apply to this table are omitted; undefined ones map to `None`.
    pub fn to_map(&self) -> BTreeMap<&'static str, Option<f64>> {
        let mut map = BTreeMap::new();
        map.insert("total_rows", Some(self.total_rows as f64));
        map.insert("total_logged_hours", Some(self.total_logged_hours));
        map.insert("mean_hours_per_row", self.mean_hours_per_row);
        map.insert("reopened_count", Some(self.reopened_count as f64));
        map.insert("reopened_percent", self.reopened_percent);
        if let Some(outliers) = self.efficiency_outlier_count {
            map.insert("mean_efficiency", self.mean_efficiency);
            map.insert("efficiency_outlier_count", Some(outliers as f64));
        }
        if self.on_time_percent.is_some() || self.late_percent.is_some() {
            map.insert("on_time_percent", self.on_time_percent);
            map.insert("late_percent", self.late_percent);
        }
        map.insert("mean_days_to_close", self.mean_days_to_close);
        map.insert("median_days_to_close", self.median_days_to_close);
        map
    }
}

fn percent_of(part: usize, whole: usize) -> Option<f64> {
    if whole == 0 {
        None
    } else {
        Some(part as f64 / whole as f64 * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::prepare::prepare;
    use crate::core::table::{Cell, RawTable};

    fn table(columns: &[&str], rows: &[&[&str]]) -> PreparedTable {
        let raw = RawTable::new(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|v| Cell::text(*v)).collect())
                .collect(),
        );
        prepare(&raw, &DashboardConfig::default())
    }

    #[test]
    fn hour_means_exclude_missing_values() {
        let t = table(&["Já registradas h"], &[&["10"], &["-"], &["20"]]);
        let m = TableMetrics::from_table(&t, &DashboardConfig::default());
        assert_eq!(m.total_rows, 3);
        assert_eq!(m.total_logged_hours, 30.0);
        assert_eq!(m.mean_hours_per_row, Some(15.0));
    }

    #[test]
    fn absent_columns_fall_back_to_zero() {
        let t = table(&["Cliente"], &[&["Acme"]]);
        let m = TableMetrics::from_table(&t, &DashboardConfig::default());
        assert_eq!(m.total_logged_hours, 0.0);
        assert_eq!(m.mean_hours_per_row, Some(0.0));
        assert_eq!(m.reopened_count, 0);
        assert_eq!(m.reopened_percent, Some(0.0));
        assert_eq!(m.mean_efficiency, None);
        assert_eq!(m.on_time_percent, None);
        assert_eq!(m.mean_days_to_close, None);
        let map = m.to_map();
        assert!(!map.contains_key("mean_efficiency"));
        assert!(!map.contains_key("late_percent"));
        assert_eq!(map.get("mean_days_to_close"), Some(&None));
    }

    #[test]
    fn reopened_share() {
        let t = table(&["Reaberta?"], &[&["Sim"], &["Não"], &["-"], &["Sim"]]);
        let m = TableMetrics::from_table(&t, &DashboardConfig::default());
        assert_eq!(m.reopened_count, 2);
        assert_eq!(m.reopened_percent, Some(50.0));
    }

    #[test]
    fn efficiency_mean_and_outliers() {
        let t = table(
            &["Já registradas h", "Esforço estimado h"],
            &[&["30", "100"], &["80", "100"], &["150", "100"], &["10", "0"]],
        );
        let m = TableMetrics::from_table(&t, &DashboardConfig::default());
        let mean = m.mean_efficiency.unwrap();
        assert!((mean - 86.666_666).abs() < 1e-3);
        assert_eq!(m.efficiency_outlier_count, Some(2));
    }

    #[test]
    fn sla_shares_count_undated_rows() {
        let t = table(
            &["Entrega desejada", "Fechada em"],
            &[
                &["2024-01-10", "2024-01-15"],
                &["2024-01-10", "2024-01-09"],
                &["2024-01-10", "2024-01-10"],
                &["2024-01-10", "-"],
            ],
        );
        let m = TableMetrics::from_table(&t, &DashboardConfig::default());
        assert_eq!(m.on_time_percent, Some(50.0));
        assert_eq!(m.late_percent, Some(25.0));
    }

    #[test]
    fn days_to_close_needs_both_dates() {
        let t = table(
            &["Criada em", "Fechada em"],
            &[
                &["2024-01-01", "2024-01-03"],
                &["2024-01-01", "2024-01-11"],
                &["2024-01-01", "2024-01-05"],
                &["-", "2024-01-05"],
            ],
        );
        let m = TableMetrics::from_table(&t, &DashboardConfig::default());
        assert_eq!(m.mean_days_to_close, Some((2.0 + 10.0 + 4.0) / 3.0));
        assert_eq!(m.median_days_to_close, Some(4.0));
    }

    #[test]
    fn header_only_upload_has_no_hour_columns() {
        let t = table(&["Reaberta?", "Já registradas h"], &[]);
        let m = TableMetrics::from_table(&t, &DashboardConfig::default());
        assert_eq!(m.total_rows, 0);
        assert_eq!(m.mean_hours_per_row, Some(0.0));
    }
}
