#![cfg(test)]
//! The desktop binary inlines `ui/assets/theme/main.css`; make sure the file
//! is there and carries the dashboard styles before anything ships.

const EMBEDDED_CSS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../ui/assets/theme/main.css"
));

const NAVBAR_CSS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../ui/assets/styling/navbar.css"
));

#[test]
fn embedded_css_file_exists_and_is_not_empty() {
    assert!(
        !EMBEDDED_CSS.trim().is_empty(),
        "Embedded theme is empty; desktop windows would render unstyled."
    );
    assert!(!NAVBAR_CSS.trim().is_empty(), "Navbar stylesheet is empty.");
}

#[test]
fn embedded_css_contains_expected_tokens() {
    let required = ["--color-bg", "--color-primary", "body {", ".dashboard__layout"];
    for token in required {
        assert!(
            EMBEDDED_CSS.contains(token),
            "Expected token `{token}` missing from embedded CSS"
        );
    }
}

#[test]
fn navbar_css_uses_theme_variables() {
    assert!(NAVBAR_CSS.contains(".navbar__link"));
    assert!(NAVBAR_CSS.contains("var(--color-primary"));
}
