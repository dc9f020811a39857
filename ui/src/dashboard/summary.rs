use dioxus::prelude::*;
use time::macros::format_description;
use time::PrimitiveDateTime;

use crate::core::breakdown::{date_ranges, describe_numeric, top_categories};
use crate::core::format::{format_number, or_missing, MISSING};
use crate::core::Session;
use crate::t;

const TOP_VALUES: usize = 5;
const LABEL_COLUMNS: usize = 3;
const DATE_COLUMNS: usize = 2;

fn format_date(value: Option<PrimitiveDateTime>) -> String {
    value
        .and_then(|v| v.format(&format_description!("[year]-[month]-[day]")).ok())
        .unwrap_or_else(|| MISSING.to_string())
}

#[component]
pub fn StatisticalSummary(session: Signal<Session>) -> Element {
    let state = session.read();
    let Some(view) = state.view() else {
        return rsx! {};
    };
    let numeric = describe_numeric(view);
    let categories = top_categories(view, LABEL_COLUMNS, TOP_VALUES);
    let dates = date_ranges(view, DATE_COLUMNS);

    rsx! {
        section { class: "results-card summary",
            div { class: "results-card__header",
                h2 { {t!("summary-title")} }
            }

            if numeric.is_empty() {
                p { class: "results-card__placeholder", {t!("summary-no-numeric")} }
            } else {
                div { class: "detail-table__scroll",
                    table { class: "summary__numeric",
                        thead {
                            tr {
                                th { {t!("summary-column")} }
                                th { "count" }
                                th { "mean" }
                                th { "std" }
                                th { "min" }
                                th { "25%" }
                                th { "50%" }
                                th { "75%" }
                                th { "max" }
                            }
                        }
                        tbody {
                            for row in numeric.iter() {
                                tr { key: "{row.column}",
                                    th { scope: "row", "{row.column}" }
                                    td { "{row.count}" }
                                    td { "{or_missing(row.mean, format_number)}" }
                                    td { "{or_missing(row.std, format_number)}" }
                                    td { "{or_missing(row.min, format_number)}" }
                                    td { "{or_missing(row.p25, format_number)}" }
                                    td { "{or_missing(row.p50, format_number)}" }
                                    td { "{or_missing(row.p75, format_number)}" }
                                    td { "{or_missing(row.max, format_number)}" }
                                }
                            }
                        }
                    }
                }
            }

            if !categories.is_empty() {
                h3 { class: "summary__subtitle", {t!("summary-top-values")} }
                div { class: "summary__categories",
                    for (column, counts) in categories.iter() {
                        div { class: "summary__category", key: "{column}",
                            h4 { "{column}" }
                            ol {
                                for (label, count) in counts.iter() {
                                    li { key: "{label}",
                                        span { class: "summary__value", "{label}" }
                                        span { class: "summary__count", "{count}" }
                                    }
                                }
                            }
                        }
                    }
                }
            }

            if !dates.is_empty() {
                h3 { class: "summary__subtitle", {t!("summary-date-ranges")} }
                ul { class: "summary__dates",
                    for range in dates.iter() {
                        li { key: "{range.column}",
                            strong { "{range.column}" }
                            span { " {format_date(range.first)} → {format_date(range.last)}" }
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
    use time::macros::datetime;

    #[test]
    fn dates_render_without_time() {
        assert_eq!(format_date(Some(datetime!(2024-03-09 14:30))), "2024-03-09");
        assert_eq!(format_date(None), MISSING);
    }
}
