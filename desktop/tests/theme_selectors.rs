#![cfg(test)]
/*!
Theme selector lint for the desktop build.

Desktop embeds `ui/assets/theme/main.css` with `include_str!`, so a renamed or
dropped class only shows up as broken styling at runtime. This test checks
that the selectors the dashboard components rely on are still present.

If you intentionally rename or remove a selector, update the component markup
and REQUIRED_SELECTORS together. A substring check is enough here.
*/

const THEME_CSS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../ui/assets/theme/main.css"
));

/// Core selectors / tokens that must exist in the shared theme for desktop.
const REQUIRED_SELECTORS: &[&str] = &[
    // Global / layout
    ":root",
    "body {",
    ".page {",
    ".visually-hidden",
    // Buttons
    ".button {",
    ".button--primary",
    ".button--ghost",
    // Dashboard layout
    ".dashboard__layout",
    ".dashboard__sidebar",
    ".dashboard__main",
    ".dashboard__charts",
    ".dashboard__footer",
    // Cards
    ".results-card",
    ".results-card__header",
    ".results-card__meta",
    ".results-card__placeholder",
    // Overview highlights
    ".results-highlights",
    ".results-highlight",
    ".results-highlight__label",
    ".results-highlight__value",
    ".results-highlight__meta",
    // Upload & filters
    ".upload-panel__drop",
    ".upload-panel__error",
    ".upload-panel__digest",
    ".filter-panel__field",
    ".filter-panel__reset",
    // Bar charts
    ".bar-list",
    ".bar-list__row",
    ".bar-list__track",
    ".bar-list__fill",
    ".bar-list--compact",
    ".chart-card__meta",
    ".chart-card__subtitle",
    // Detail table & summary
    ".detail-table__columns",
    ".detail-table__rows",
    ".detail-table__scroll",
    ".summary__numeric",
    ".summary__categories",
    ".summary__dates",
    // Media query token (sanity check responsive block exists)
    "@media (max-width: 720px)",
];

#[test]
fn unified_theme_contains_required_selectors() {
    let mut missing = Vec::new();
    for sel in REQUIRED_SELECTORS {
        if !THEME_CSS.contains(sel) {
            missing.push(*sel);
        }
    }

    if !missing.is_empty() {
        panic!(
            "Missing {} required CSS selectors/tokens in unified theme:\n{}",
            missing.len(),
            missing.join("\n")
        );
    }
}

#[test]
fn unified_theme_not_trivially_empty() {
    let non_ws_len = THEME_CSS.chars().filter(|c| !c.is_whitespace()).count();
    assert!(
        non_ws_len > 4_000,
        "Embedded theme appears unexpectedly small ({} non-whitespace chars) – \
         did the file get truncated or path change?",
        non_ws_len
    );
}

#[test]
fn bar_chart_parts_come_together() {
    // BarList renders track and fill together; losing either hides every chart.
    let has_track = THEME_CSS.contains(".bar-list__track");
    let has_fill = THEME_CSS.contains(".bar-list__fill");
    assert!(
        has_track && has_fill,
        "Bar chart sub-selectors missing (track: {has_track}, fill: {has_fill})"
    );
}
