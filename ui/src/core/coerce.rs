//! Best-effort cell coercion. Nothing here fails: values that do not parse
//! become `None` (or `false` for flags).

use serde::{Deserialize, Serialize};
use time::{
    format_description::{well_known::Rfc3339, BorrowedFormatItem},
    macros::format_description,
    Date, OffsetDateTime, PrimitiveDateTime,
};

use super::table::Cell;

/// Parse a timestamp. Accepts RFC 3339, ISO dates with optional time, and
/// day-first `DD/MM/YYYY` dates with optional time.
pub fn to_timestamp(cell: &Cell) -> Option<PrimitiveDateTime> {
    match cell {
        Cell::DateTime(value) => Some(*value),
        Cell::Text(value) => parse_timestamp(value),
        Cell::Missing | Cell::Number(_) | Cell::Bool(_) => None,
    }
}

pub fn parse_timestamp(raw: &str) -> Option<PrimitiveDateTime> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(stamp) = OffsetDateTime::parse(value, &Rfc3339) {
        return Some(PrimitiveDateTime::new(stamp.date(), stamp.time()));
    }

    let value = strip_subseconds(value);

    let datetime_formats: [&[BorrowedFormatItem<'_>]; 6] = [
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
        format_description!("[year]-[month]-[day] [hour]:[minute]"),
        format_description!("[year]-[month]-[day]T[hour]:[minute]"),
        format_description!(
            "[day padding:none]/[month padding:none]/[year] [hour padding:none]:[minute]:[second]"
        ),
        format_description!("[day padding:none]/[month padding:none]/[year] [hour padding:none]:[minute]"),
    ];
    for format in datetime_formats {
        if let Ok(stamp) = PrimitiveDateTime::parse(value, format) {
            return Some(stamp);
        }
    }

    let date_formats: [&[BorrowedFormatItem<'_>]; 2] = [
        format_description!("[year]-[month]-[day]"),
        format_description!("[day padding:none]/[month padding:none]/[year]"),
    ];
    for format in date_formats {
        if let Ok(date) = Date::parse(value, format) {
            return Some(date.midnight());
        }
    }

    None
}

/// `2024-01-15 10:00:00.250` -> `2024-01-15 10:00:00`
fn strip_subseconds(value: &str) -> &str {
    match (value.rfind(':'), value.rfind('.')) {
        (Some(colon), Some(dot)) if dot > colon => &value[..dot],
        _ => value,
    }
}

/// Parse a finite real. Text is trimmed; anything else is missing.
pub fn to_number(cell: &Cell) -> Option<f64> {
    let value = match cell {
        Cell::Number(value) => *value,
        Cell::Text(value) => value.trim().parse::<f64>().ok()?,
        Cell::Missing | Cell::Bool(_) | Cell::DateTime(_) => return None,
    };
    value.is_finite().then_some(value)
}

/// `Sim`/`Não` flags. Anything unrecognised, including missing, is `false`.
pub fn to_flag(cell: &Cell) -> bool {
    match cell {
        Cell::Bool(value) => *value,
        Cell::Text(value) => matches!(value.trim(), "Sim"),
        _ => false,
    }
}

/// Text rendering of a label cell; missing stays missing.
pub fn to_label(cell: &Cell) -> Option<String> {
    match cell {
        Cell::Missing => None,
        other => Some(other.to_string()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    Low = 1,
    Medium = 2,
    High = 3,
    Urgent = 4,
}

impl Priority {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "Baixa" | "Low" => Some(Priority::Low),
            "Média" | "Medium" => Some(Priority::Medium),
            "Alta" | "High" => Some(Priority::High),
            "Urgente" | "Urgent" => Some(Priority::Urgent),
            _ => None,
        }
    }

    pub fn rank(self) -> u8 {
        self as u8
    }
}
