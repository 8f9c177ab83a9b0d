//! Due date token parsing.

use super::TaskDomainError;
use chrono::NaiveDate;

/// Returns whether a token has the `YYYY/M/D` shape.
///
/// Shape detection only; [`parse_due_date`] still rejects impossible
/// calendar dates. The parser uses this to decide whether a trailing token
/// is a date that must validate or plain content.
#[must_use]
pub fn is_date_shaped(token: &str) -> bool {
    let mut segments = token.split('/');
    let year = segments.next().unwrap_or_default();
    let month = segments.next().unwrap_or_default();
    let day = segments.next().unwrap_or_default();
    segments.next().is_none()
        && year.len() == 4
        && all_digits(year)
        && (1..=2).contains(&month.len())
        && all_digits(month)
        && (1..=2).contains(&day.len())
        && all_digits(day)
}

/// Parses a `YYYY/M/D` token into a calendar date.
///
/// # Errors
///
/// Returns [`TaskDomainError::InvalidDueDate`] when the token is not
/// date-shaped or names a date that does not exist (e.g. `2026/2/30`).
pub fn parse_due_date(token: &str) -> Result<NaiveDate, TaskDomainError> {
    let invalid = || TaskDomainError::InvalidDueDate(token.to_owned());
    if !is_date_shaped(token) {
        return Err(invalid());
    }
    let mut segments = token.split('/');
    let year = segments
        .next()
        .and_then(|s| s.parse::<i32>().ok())
        .ok_or_else(invalid)?;
    let month = segments
        .next()
        .and_then(|s| s.parse::<u32>().ok())
        .ok_or_else(invalid)?;
    let day = segments
        .next()
        .and_then(|s| s.parse::<u32>().ok())
        .ok_or_else(invalid)?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

fn all_digits(segment: &str) -> bool {
    !segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit())
}
