use dioxus::prelude::*;

use crate::core::format::{format_number, MISSING};
use crate::core::prepare::ColumnKey;
use crate::core::table::Cell;
use crate::core::{PreparedTable, Session};
use crate::t;

/// Columns to show: the user's picks that still exist, else the first
/// `default_count` columns.
fn resolve_columns(
    table: &PreparedTable,
    picked: Option<&[String]>,
    default_count: usize,
) -> Vec<ColumnKey> {
    let chosen: Vec<ColumnKey> = picked
        .unwrap_or_default()
        .iter()
        .filter_map(|name| table.column_by_name(name))
        .collect();
    if chosen.is_empty() {
        table.columns.iter().copied().take(default_count).collect()
    } else {
        chosen
    }
}

fn display_cell(cell: Cell) -> String {
    match cell {
        Cell::Missing => MISSING.to_string(),
        Cell::Number(value) if value.fract() != 0.0 => format_number(value),
        other => other.to_string(),
    }
}

fn visible_rows(table: &PreparedTable, columns: &[ColumnKey], limit: usize) -> Vec<Vec<String>> {
    table
        .rows
        .iter()
        .take(limit)
        .map(|row| columns.iter().map(|key| display_cell(row.cell(*key))).collect())
        .collect()
}

#[component]
pub fn DetailTable(session: Signal<Session>) -> Element {
    let mut picked = use_signal(|| None::<Vec<String>>);
    let defaults = session.read().config().clone();
    let mut row_limit = use_signal(move || defaults.table_default_rows);

    let state = session.read();
    let Some(view) = state.view() else {
        return rsx! {};
    };
    let config = state.config().clone();
    let columns = resolve_columns(view, picked.read().as_deref(), config.table_default_columns);
    let shown: Vec<String> = columns
        .iter()
        .map(|key| view.column_name(*key).to_string())
        .collect();
    let all_columns: Vec<String> = view
        .columns
        .iter()
        .map(|key| view.column_name(*key).to_string())
        .collect();
    let limit = config.clamp_rows(row_limit());
    let rows = visible_rows(view, &columns, limit);
    let total = view.len();

    rsx! {
        section { class: "results-card detail-table",
            div { class: "results-card__header",
                h2 { {t!("table-title")} }
                span { class: "results-card__meta",
                    {t!("table-meta", shown = rows.len(), total = total)}
                }
            }

            details { class: "detail-table__controls",
                summary { {t!("table-columns")} }
                div { class: "detail-table__columns",
                    for (idx, name) in all_columns.into_iter().enumerate() {
                        label { class: "detail-table__column", key: "{idx}",
                            input {
                                r#type: "checkbox",
                                checked: shown.contains(&name),
                                onchange: {
                                    let name = name.clone();
                                    let current = shown.clone();
                                    move |evt: FormEvent| {
                                        let mut next = current.clone();
                                        if evt.checked() {
                                            if !next.contains(&name) {
                                                next.push(name.clone());
                                            }
                                        } else {
                                            next.retain(|n| n != &name);
                                        }
                                        picked.set(Some(next));
                                    }
                                },
                            }
                            span { "{name}" }
                        }
                    }
                }
                label { class: "detail-table__rows",
                    span { {t!("table-rows")} }
                    input {
                        r#type: "range",
                        min: "{config.table_min_rows}",
                        max: "{config.table_max_rows}",
                        step: "10",
                        value: "{limit}",
                        oninput: move |evt: FormEvent| {
                            if let Ok(rows) = evt.value().parse::<usize>() {
                                row_limit.set(rows);
                            }
                        },
                    }
                    output { "{limit}" }
                }
            }

            if rows.is_empty() {
                p { class: "results-card__placeholder", {t!("table-empty")} }
            } else {
                div { class: "detail-table__scroll",
                    table {
                        thead {
                            tr {
                                for (idx, name) in shown.iter().enumerate() {
                                    th { key: "{idx}", "{name}" }
                                }
                            }
                        }
                        tbody {
                            for (idx, row) in rows.into_iter().enumerate() {
                                tr { key: "{idx}",
                                    for value in row.into_iter() {
                                        td { "{value}" }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
