use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";
pub const UNSET_LABEL: &str = "Select Due Date";
pub const INVALID_LABEL: &str = "Invalid Date/Time";

pub const FIRST_YEAR: i32 = 2020;
pub const LAST_YEAR: i32 = 2030;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DueDateError {
    #[error("{field} is not a number: {value:?}")]
    NotANumber { field: &'static str, value: String },

    #[error("no such date: {year}-{month}-{day}")]
    InvalidDate { year: i32, month: u32, day: u32 },

    #[error("no such time: {hour}:{minute}")]
    InvalidTime { hour: u32, minute: u32 },
}

/// Combines the five picker fields into a timestamp with strict calendar checks.
pub fn parse(
    year: &str,
    month: &str,
    day: &str,
    hour: &str,
    minute: &str,
) -> Result<NaiveDateTime, DueDateError> {
    let year: i32 = number("year", year)?;
    let month: u32 = number("month", month)?;
    let day: u32 = number("day", day)?;
    let hour: u32 = number("hour", hour)?;
    let minute: u32 = number("minute", minute)?;

    let date = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or(DueDateError::InvalidDate { year, month, day })?;
    let time = NaiveTime::from_hms_opt(hour, minute, 0)
        .ok_or(DueDateError::InvalidTime { hour, minute })?;

    Ok(date.and_time(time))
}

fn number<T: std::str::FromStr>(field: &'static str, value: &str) -> Result<T, DueDateError> {
    value.trim().parse().map_err(|_| DueDateError::NotANumber {
        field,
        value: value.to_string(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DueDate {
    #[default]
    Unset,
    Invalid,
    At(NaiveDateTime),
}

impl DueDate {
    /// Parses picker input; a bad combination becomes `Invalid` instead of an error.
    pub fn from_picker(year: &str, month: &str, day: &str, hour: &str, minute: &str) -> Self {
        match parse(year, month, day, hour, minute) {
            Ok(at) => DueDate::At(at),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "rejected due date {year}-{month}-{day} {hour}:{minute}"
                );
                DueDate::Invalid
            }
        }
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, DueDate::Unset)
    }
}

impl fmt::Display for DueDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DueDate::Unset => f.write_str(UNSET_LABEL),
            DueDate::Invalid => f.write_str(INVALID_LABEL),
            DueDate::At(at) => write!(f, "{}", at.format(DISPLAY_FORMAT)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_zero_padded_fields() {
        let at = parse("2025", "01", "01", "09", "00").unwrap();
        assert_eq!(DueDate::At(at).to_string(), "2025-01-01 09:00");
    }

    #[test]
    fn rejects_impossible_dates() {
        assert_eq!(
            parse("2025", "02", "30", "10", "00"),
            Err(DueDateError::InvalidDate { year: 2025, month: 2, day: 30 })
        );
        assert!(parse("2025", "04", "31", "10", "00").is_err());
        assert!(parse("2025", "13", "01", "10", "00").is_err());
        assert!(parse("2024", "02", "29", "10", "00").is_ok());
    }

    #[test]
    fn rejects_impossible_times_and_placeholders() {
        assert_eq!(
            parse("2025", "01", "01", "24", "00"),
            Err(DueDateError::InvalidTime { hour: 24, minute: 0 })
        );
        assert_eq!(
            parse("Year", "01", "01", "10", "00"),
            Err(DueDateError::NotANumber { field: "year", value: "Year".to_string() })
        );
    }

    #[test]
    fn picker_failure_becomes_invalid_label() {
        let due = DueDate::from_picker("2025", "02", "30", "10", "00");
        assert_eq!(due, DueDate::Invalid);
        assert_eq!(due.to_string(), "Invalid Date/Time");
        assert_eq!(DueDate::Unset.to_string(), "Select Due Date");
    }
}
