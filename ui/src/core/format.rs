//! Formatting helpers for presenting metrics.

/// Shown wherever a value is undefined.
pub const MISSING: &str = "—";

pub fn format_hours(value: f64) -> String {
    format!("{value:.1} h")
}

pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

pub fn format_days(value: f64) -> String {
    format!("{value:.1} d")
}

pub fn format_count(value: usize) -> String {
    value.to_string()
}

/// Two decimals, trailing zeros kept (summary tables).
pub fn format_number(value: f64) -> String {
    format!("{value:.2}")
}

pub fn or_missing(value: Option<f64>, format: fn(f64) -> String) -> String {
    value.map(format).unwrap_or_else(|| MISSING.to_string())
}
