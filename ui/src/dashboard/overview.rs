use dioxus::prelude::*;

use crate::core::format::{format_count, format_days, format_hours, format_percent, or_missing};
use crate::core::{Session, TableMetrics};
use crate::t;

#[derive(Debug, Clone, PartialEq)]
struct Highlight {
    label: String,
    value: String,
    meta: String,
}

fn highlights(metrics: &TableMetrics) -> Vec<Highlight> {
    let map = metrics.to_map();
    let mut cards = vec![
        Highlight {
            label: t!("metric-total-rows"),
            value: format_count(metrics.total_rows),
            meta: t!("metric-total-rows-meta"),
        },
        Highlight {
            label: t!("metric-logged-hours"),
            value: format_hours(metrics.total_logged_hours),
            meta: t!(
                "metric-logged-hours-meta",
                mean = or_missing(metrics.mean_hours_per_row, format_hours)
            ),
        },
        Highlight {
            label: t!("metric-reopened"),
            value: or_missing(metrics.reopened_percent, format_percent),
            meta: t!("metric-reopened-meta", count = metrics.reopened_count),
        },
    ];

    if map.contains_key("mean_efficiency") {
        cards.push(Highlight {
            label: t!("metric-efficiency"),
            value: or_missing(metrics.mean_efficiency, format_percent),
            meta: t!(
                "metric-efficiency-meta",
                count = metrics.efficiency_outlier_count.unwrap_or(0)
            ),
        });
    }
    if map.contains_key("on_time_percent") {
        cards.push(Highlight {
            label: t!("metric-on-time"),
            value: or_missing(metrics.on_time_percent, format_percent),
            meta: t!(
                "metric-on-time-meta",
                late = or_missing(metrics.late_percent, format_percent)
            ),
        });
    }
    cards.push(Highlight {
        label: t!("metric-days-to-close"),
        value: or_missing(metrics.mean_days_to_close, format_days),
        meta: t!(
            "metric-days-to-close-meta",
            median = or_missing(metrics.median_days_to_close, format_days)
        ),
    });
    cards
}

#[component]
pub fn OverviewCards(session: Signal<Session>) -> Element {
    let state = session.read();
    let Some(metrics) = state.metrics() else {
        return rsx! {};
    };
    let filtered = state.filter().is_active();
    let cards = highlights(metrics);

    rsx! {
        section { class: "results-card results-charts overview",
            div { class: "results-card__header",
                h2 { {t!("overview-title")} }
                if filtered {
                    span { class: "results-card__meta", {t!("overview-filtered")} }
                }
            }
            div { class: "results-highlights",
                for card in cards.into_iter() {
                    div { class: "results-highlight", key: "{card.label}",
                        span { class: "results-highlight__label", "{card.label}" }
                        strong { class: "results-highlight__value", "{card.value}" }
                        span { class: "results-highlight__meta", "{card.meta}" }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_cards_follow_available_features() {
        crate::i18n::init();
        let bare = TableMetrics {
            total_rows: 2,
            ..TableMetrics::default()
        };
        assert_eq!(highlights(&bare).len(), 4);

        let full = TableMetrics {
            total_rows: 2,
            mean_efficiency: Some(80.0),
            efficiency_outlier_count: Some(1),
            on_time_percent: Some(50.0),
            late_percent: Some(50.0),
            ..TableMetrics::default()
        };
        let cards = highlights(&full);
        assert_eq!(cards.len(), 6);
        assert_eq!(cards[3].value, "80.0%");
    }
}
