use dioxus::prelude::*;
use time::macros::format_description;

use crate::core::{DashboardConfig, Session};
use crate::dashboard::{
    BreakdownCharts, DetailTable, FilterPanel, OverviewCards, StatisticalSummary, UploadPanel,
};
use crate::t;

/// App-wide dashboard session. Call from the root component, above the
/// language-keyed subtree and the router.
pub fn use_session_provider() -> Signal<Session> {
    use_context_provider(|| Signal::new(Session::new(DashboardConfig::load())))
}

#[component]
pub fn Dashboard() -> Element {
    let _lang_code: Option<Signal<String>> = try_use_context::<Signal<String>>();
    let _lang_current = _lang_code.as_ref().map(|s| s()).unwrap_or_default();

    let session = use_context::<Signal<Session>>();
    let loaded_at = session.read().upload_info().and_then(|info| {
        info.loaded_at
            .format(&format_description!(
                "[year]-[month]-[day] [hour]:[minute]:[second] UTC"
            ))
            .ok()
    });

    rsx! {
        section { class: "page page-dashboard",
            h1 { {t!("dashboard-title")} }
            p { {t!("dashboard-intro")} }

            div { class: "dashboard__layout",
                div { class: "dashboard__sidebar",
                    UploadPanel { session }
                    FilterPanel { session }
                }
                div { class: "dashboard__main",
                    OverviewCards { session }
                    BreakdownCharts { session }
                    DetailTable { session }
                    StatisticalSummary { session }
                }
            }

            if let Some(stamp) = loaded_at {
                footer { class: "dashboard__footer",
                    {t!("dashboard-updated", stamp = stamp)}
                }
            }
        }
    }
}
