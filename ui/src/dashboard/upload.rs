use dioxus::prelude::*;
use tracing::warn;

use crate::core::format::MISSING;
use crate::core::Session;
use crate::t;

const ACCEPTED: &str = ".csv,.txt,.xlsx,.xlsm,.xlsb,.xls,.ods";

/// Desktop file engines hand back full paths; keep the last component.
fn display_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

fn short_digest(digest: &str) -> &str {
    digest.get(..12).unwrap_or(MISSING)
}

fn format_size(bytes: usize) -> String {
    match bytes {
        b if b >= 1024 * 1024 => format!("{:.1} MB", b as f64 / (1024.0 * 1024.0)),
        b if b >= 1024 => format!("{:.1} KB", b as f64 / 1024.0),
        b => format!("{b} B"),
    }
}

#[component]
pub fn UploadPanel(mut session: Signal<Session>) -> Element {
    let mut error = use_signal(|| None::<String>);
    let mut busy = use_signal(|| false);

    let on_pick = move |evt: FormEvent| async move {
        let Some(engine) = evt.files() else {
            return;
        };
        let Some(path) = engine.files().into_iter().next() else {
            return;
        };
        busy.set(true);
        let name = display_name(&path).to_string();
        let outcome = match engine.read_file(&path).await {
            Some(bytes) => session
                .with_mut(|s| s.upload(&name, &bytes))
                .map_err(|err| err.to_string()),
            None => Err(t!("upload-error-unreadable")),
        };
        busy.set(false);
        match outcome {
            Ok(()) => error.set(None),
            Err(message) => {
                warn!(file = %name, %message, "upload rejected");
                error.set(Some(message));
            }
        }
    };

    let info = session.read().upload_info().cloned();

    rsx! {
        section { class: "results-card upload-panel",
            div { class: "results-card__header",
                h2 { {t!("upload-title")} }
                if let Some(info) = info.as_ref() {
                    span { class: "results-card__meta", "{format_size(info.size)}" }
                }
            }

            label { class: "upload-panel__drop", r#for: "upload-input",
                span { class: "upload-panel__hint", {t!("upload-hint")} }
                input {
                    id: "upload-input",
                    class: "upload-panel__input",
                    r#type: "file",
                    accept: ACCEPTED,
                    multiple: false,
                    disabled: busy(),
                    onchange: on_pick,
                }
            }

            if busy() {
                p { class: "upload-panel__status", {t!("upload-reading")} }
            }

            if let Some(message) = error() {
                div { class: "upload-panel__error", role: "alert",
                    strong { {t!("upload-error-title")} }
                    span { " {message}" }
                }
            }

            if let Some(info) = info.as_ref() {
                p { class: "upload-panel__file",
                    span { class: "upload-panel__file-name", "{info.name}" }
                    code { class: "upload-panel__digest", title: "{info.digest}", "{short_digest(&info.digest)}" }
                }
            } else {
                p { class: "results-card__placeholder", {t!("upload-placeholder")} }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_directories_from_picked_paths() {
        assert_eq!(display_name("/home/ana/tasks.csv"), "tasks.csv");
        assert_eq!(display_name("C:\\exports\\tasks.xlsx"), "tasks.xlsx");
        assert_eq!(display_name("tasks.csv"), "tasks.csv");
    }

    #[test]
    fn sizes_are_human_readable() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }
}
