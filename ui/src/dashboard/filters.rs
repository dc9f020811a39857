use dioxus::prelude::*;

use crate::core::{Selection, Session, ViewFilter};
use crate::t;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FilterSlot {
    Client,
    TaskType,
    Priority,
}

impl FilterSlot {
    fn id(self) -> &'static str {
        match self {
            FilterSlot::Client => "filter-client",
            FilterSlot::TaskType => "filter-task-type",
            FilterSlot::Priority => "filter-priority",
        }
    }

    fn label(self) -> String {
        match self {
            FilterSlot::Client => t!("filter-client"),
            FilterSlot::TaskType => t!("filter-task-type"),
            FilterSlot::Priority => t!("filter-priority"),
        }
    }

    fn current(self, filter: &ViewFilter) -> &Selection {
        match self {
            FilterSlot::Client => &filter.client,
            FilterSlot::TaskType => &filter.task_type,
            FilterSlot::Priority => &filter.priority,
        }
    }

    fn with(self, mut filter: ViewFilter, selection: Selection) -> ViewFilter {
        match self {
            FilterSlot::Client => filter.client = selection,
            FilterSlot::TaskType => filter.task_type = selection,
            FilterSlot::Priority => filter.priority = selection,
        }
        filter
    }
}

/// Sidebar selects; a select is only shown when its column exists.
#[component]
pub fn FilterPanel(mut session: Signal<Session>) -> Element {
    let Some(options) = session.read().filter_options() else {
        return rsx! {};
    };
    let active = session.read().filter().is_active();

    let slots = [
        (FilterSlot::Client, options.clients),
        (FilterSlot::TaskType, options.task_types),
        (FilterSlot::Priority, options.priorities),
    ];

    rsx! {
        aside { class: "results-card filter-panel",
            div { class: "results-card__header",
                h2 { {t!("filter-title")} }
                if active {
                    button {
                        r#type: "button",
                        class: "button button--ghost filter-panel__reset",
                        onclick: move |_| session.with_mut(|s| s.set_filter(ViewFilter::default())),
                        {t!("filter-reset")}
                    }
                }
            }
            for (slot, choices) in slots.into_iter() {
                if let Some(choices) = choices {
                    FilterSelect { key: "{slot.id()}", session, slot, choices }
                }
            }
        }
    }
}

#[component]
fn FilterSelect(mut session: Signal<Session>, slot: FilterSlot, choices: Vec<String>) -> Element {
    let current = slot.current(session.read().filter()).as_choice().to_string();

    rsx! {
        div { class: "filter-panel__field",
            label { r#for: slot.id(), "{slot.label()}" }
            select {
                id: slot.id(),
                value: "{current}",
                onchange: move |evt: FormEvent| {
                    let next = slot.with(session.read().filter().clone(), Selection::from_choice(&evt.value()));
                    session.with_mut(|s| s.set_filter(next));
                },
                option { value: "", selected: current.is_empty(), {t!("filter-all")} }
                for choice in choices.iter() {
                    option {
                        key: "{choice}",
                        value: "{choice}",
                        selected: *choice == current,
                        "{choice}"
                    }
                }
            }
        }
    }
}
