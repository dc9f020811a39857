//! Breakdown cards. Each card disappears when its columns are missing.

use dioxus::prelude::*;

use super::bars::{count_bars, histogram_bars, scale_bars, Bar, BarList};
use crate::core::breakdown::{
    category_counts, efficiency_category_counts, efficiency_histogram, hours_by,
    mean_days_to_close_by, reopened_split, sla_days_summary, sla_status_counts,
};
use crate::core::columns::Field;
use crate::core::format::{format_days, format_hours, or_missing};
use crate::core::prepare::{EfficiencyCategory, SlaStatus};
use crate::core::{DashboardConfig, PreparedTable, Session};
use crate::t;

pub fn sla_status_label(status: SlaStatus) -> String {
    match status {
        SlaStatus::OnTime => t!("sla-on-time"),
        SlaStatus::Late => t!("sla-late"),
        SlaStatus::NoDate => t!("sla-no-date"),
    }
}

pub fn efficiency_label(category: EfficiencyCategory) -> String {
    match category {
        EfficiencyCategory::Low => t!("efficiency-low"),
        EfficiencyCategory::Normal => t!("efficiency-normal"),
        EfficiencyCategory::High => t!("efficiency-high"),
        EfficiencyCategory::Unknown => t!("efficiency-unknown"),
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Chart {
    title: String,
    meta: Option<String>,
    bars: Vec<Bar>,
    /// Secondary series under the first one (histograms).
    detail: Option<(String, Vec<Bar>)>,
}

impl Chart {
    fn new(title: String, bars: Vec<Bar>) -> Self {
        Self {
            title,
            meta: None,
            bars,
            detail: None,
        }
    }
}

fn top(mut values: Vec<(String, f64)>, n: usize) -> Vec<(String, f64)> {
    values.truncate(n);
    values
}

fn build_charts(table: &PreparedTable, config: &DashboardConfig) -> Vec<Chart> {
    let mut charts = Vec::new();

    if let Some(split) = reopened_split(table) {
        charts.push(Chart::new(
            t!("chart-reopened"),
            count_bars([
                (t!("chart-reopened-no"), split.not_reopened),
                (t!("chart-reopened-yes"), split.reopened),
            ]),
        ));
    }

    if let Some(hours) = hours_by(table, Field::Client) {
        charts.push(Chart::new(
            t!("chart-hours-by-client", count = config.top_n),
            scale_bars(top(hours, config.top_n), format_hours),
        ));
    }

    if let Some(hours) = hours_by(table, Field::Team) {
        charts.push(Chart::new(
            t!("chart-hours-by-team"),
            scale_bars(hours, format_hours),
        ));
    }

    if let Some(counts) = category_counts(table, Field::Priority) {
        charts.push(Chart::new(t!("chart-priority"), count_bars(counts)));
    }

    if let Some(counts) = sla_status_counts(table) {
        let mut chart = Chart::new(
            t!("chart-sla-status"),
            count_bars(
                counts
                    .into_iter()
                    .map(|(status, count)| (sla_status_label(status), count)),
            ),
        );
        if let Some(summary) = sla_days_summary(table, config) {
            chart.meta = Some(t!(
                "chart-sla-days-meta",
                mean = or_missing(summary.mean, format_days),
                median = or_missing(summary.median, format_days),
                late = summary.late_count
            ));
            let (low, high) = config.sla_window_days;
            chart.detail = Some((
                t!("chart-sla-days-histogram", low = low, high = high),
                histogram_bars(&summary.histogram, "d"),
            ));
        }
        charts.push(chart);
    }

    if let Some(counts) = efficiency_category_counts(table) {
        let mut chart = Chart::new(
            t!("chart-efficiency"),
            count_bars(
                counts
                    .into_iter()
                    .map(|(category, count)| (efficiency_label(category), count)),
            ),
        );
        if let Some(bins) = efficiency_histogram(table, config) {
            chart.detail = Some((
                t!("chart-efficiency-histogram"),
                histogram_bars(&bins, "%"),
            ));
        }
        charts.push(chart);
    }

    if let Some(days) = mean_days_to_close_by(table, Field::TaskType) {
        charts.push(Chart::new(
            t!("chart-days-by-task-type", count = config.top_n),
            scale_bars(top(days, config.top_n), format_days),
        ));
    }

    if let Some(days) = mean_days_to_close_by(table, Field::Client) {
        charts.push(Chart::new(
            t!("chart-days-by-client", count = config.top_n),
            scale_bars(top(days, config.top_n), format_days),
        ));
    }

    charts
}

#[component]
pub fn BreakdownCharts(session: Signal<Session>) -> Element {
    let state = session.read();
    let Some(view) = state.view() else {
        return rsx! {};
    };
    let charts = build_charts(view, state.config());

    rsx! {
        section { class: "dashboard__charts",
            if charts.is_empty() {
                div { class: "results-card",
                    p { class: "results-card__placeholder", {t!("chart-none")} }
                }
            }
            for chart in charts.into_iter() {
                section { class: "results-card chart-card", key: "{chart.title}",
                    div { class: "results-card__header",
                        h2 { "{chart.title}" }
                    }
                    if chart.bars.is_empty() {
                        p { class: "results-card__placeholder", {t!("chart-empty")} }
                    } else {
                        BarList { bars: chart.bars }
                    }
                    if let Some(meta) = chart.meta {
                        p { class: "chart-card__meta", "{meta}" }
                    }
                    if let Some((caption, bars)) = chart.detail {
                        h3 { class: "chart-card__subtitle", "{caption}" }
                        if bars.is_empty() {
                            p { class: "results-card__placeholder", {t!("chart-empty")} }
                        } else {
                            BarList { bars, compact: true }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::prepare;
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
    fn charts_follow_available_columns() {
        crate::i18n::init();
        let config = DashboardConfig::default();
        let only_clients = table(&["Cliente"], &[&["Acme"]]);
        assert!(build_charts(&only_clients, &config).is_empty());

        let t = table(
            &["Cliente", "Prioridade", "Já registradas h", "Reaberta?"],
            &[&["Acme", "Alta", "4", "Sim"], &["Globex", "Baixa", "2", "Não"]],
        );
        let charts = build_charts(&t, &config);
        // reopened, hours by client, priority
        assert_eq!(charts.len(), 3);
        assert_eq!(charts[1].bars[0].display, "4.0 h");
        assert_eq!(charts[1].bars[1].width_pct, 50.0);
    }

    #[test]
    fn ranked_charts_respect_top_n() {
        crate::i18n::init();
        let config = DashboardConfig {
            top_n: 2,
            ..DashboardConfig::default()
        };
        let t = table(
            &["Cliente", "Já registradas h"],
            &[&["A", "1"], &["B", "2"], &["C", "3"]],
        );
        let charts = build_charts(&t, &config);
        assert_eq!(charts[0].bars.len(), 2);
        assert_eq!(charts[0].bars[0].label, "C");
    }
}
