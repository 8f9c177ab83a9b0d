//! Recurring schedule rules and occurrence computation.
//!
//! The occurrence engine is pure: rules never touch state, and the
//! lifecycle service together with the store's occurrence ledger is
//! responsible for persisting generated occurrences exactly once.
//!
//! Short-month semantics: a monthly rule targeting a day that a candidate
//! month does not have skips that month entirely (day 31 from a February
//! anchor lands on 31 March, never on 28 February). Yearly rules targeting
//! 29 February likewise skip non-leap years.

use super::TaskDomainError;
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Specification of a repeating schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecurrenceRule {
    /// Fires on a fixed weekday, every week.
    Weekly {
        /// Target weekday.
        #[serde(with = "weekday_repr")]
        weekday: Weekday,
    },
    /// Fires on a fixed day of the month; short months are skipped.
    Monthly {
        /// Target day of month, 1..=31.
        day: u32,
    },
    /// Fires on a fixed month and day; 29 February skips non-leap years.
    Yearly {
        /// Target month, 1..=12.
        month: u32,
        /// Target day within the month.
        day: u32,
    },
}

impl RecurrenceRule {
    /// Upper bound on candidate months scanned for a monthly rule.
    ///
    /// Day 31 recurs at least every other month, so the scan terminates
    /// far below this bound for every valid rule.
    const MONTHLY_SCAN_LIMIT: u32 = 60;

    /// Upper bound on candidate years scanned for a yearly rule.
    ///
    /// 29 February recurs at least every eight years in the Gregorian
    /// calendar.
    const YEARLY_SCAN_LIMIT: i32 = 9;

    /// Creates a weekly rule.
    #[must_use]
    pub const fn weekly(weekday: Weekday) -> Self {
        Self::Weekly { weekday }
    }

    /// Creates a validated monthly rule.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidRecurrenceExpression`] when the day
    /// is outside 1..=31.
    pub fn monthly(day: u32) -> Result<Self, TaskDomainError> {
        if !(1..=31).contains(&day) {
            return Err(TaskDomainError::InvalidRecurrenceExpression(format!(
                "每月{day}日"
            )));
        }
        Ok(Self::Monthly { day })
    }

    /// Creates a validated yearly rule.
    ///
    /// 29 February is accepted; the month/day pair is checked against a
    /// leap year.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidRecurrenceExpression`] when the
    /// month/day pair names no calendar date at all.
    pub fn yearly(month: u32, day: u32) -> Result<Self, TaskDomainError> {
        if NaiveDate::from_ymd_opt(2000, month, day).is_none() {
            return Err(TaskDomainError::InvalidRecurrenceExpression(format!(
                "每年{month}月{day}日"
            )));
        }
        Ok(Self::Yearly { month, day })
    }

    /// Parses a chat recurrence expression.
    ///
    /// Supported forms: `每週一`..`每週六`, `每週日`/`每週天` (also `每周`),
    /// `每月15日` (also `號`), and `每年3月15日`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidRecurrenceExpression`] for any
    /// other input.
    pub fn parse(expr: &str) -> Result<Self, TaskDomainError> {
        let invalid = || TaskDomainError::InvalidRecurrenceExpression(expr.to_owned());

        if let Some(day_char) = expr
            .strip_prefix("每週")
            .or_else(|| expr.strip_prefix("每周"))
        {
            let weekday = match day_char {
                "一" => Weekday::Mon,
                "二" => Weekday::Tue,
                "三" => Weekday::Wed,
                "四" => Weekday::Thu,
                "五" => Weekday::Fri,
                "六" => Weekday::Sat,
                "日" | "天" => Weekday::Sun,
                _ => return Err(invalid()),
            };
            return Ok(Self::weekly(weekday));
        }

        if let Some(day_part) = expr.strip_prefix("每月") {
            let digits = day_part
                .strip_suffix('日')
                .or_else(|| day_part.strip_suffix('號'))
                .ok_or_else(invalid)?;
            let day = parse_number(digits).ok_or_else(invalid)?;
            return Self::monthly(day).map_err(|_| invalid());
        }

        if let Some(date_part) = expr.strip_prefix("每年") {
            let date_digits = date_part.strip_suffix('日').ok_or_else(invalid)?;
            let (month_digits, day_digits) = date_digits.split_once('月').ok_or_else(invalid)?;
            let month = parse_number(month_digits).ok_or_else(invalid)?;
            let day = parse_number(day_digits).ok_or_else(invalid)?;
            return Self::yearly(month, day).map_err(|_| invalid());
        }

        Err(invalid())
    }

    /// Computes the nearest occurrence strictly after `after`.
    ///
    /// Never returns `after` itself: a weekly Monday rule anchored on a
    /// Monday yields the following Monday. Returns `None` only when the
    /// scan runs off the end of chrono's supported calendar range.
    #[must_use]
    pub fn next_occurrence(self, after: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::Weekly { weekday } => (1..=7)
                .filter_map(|offset| after.checked_add_days(chrono::Days::new(offset)))
                .find(|candidate| candidate.weekday() == weekday),
            Self::Monthly { day } => {
                let mut year = after.year();
                let mut month = after.month();
                for _ in 0..Self::MONTHLY_SCAN_LIMIT {
                    if let Some(candidate) = NaiveDate::from_ymd_opt(year, month, day) {
                        if candidate > after {
                            return Some(candidate);
                        }
                    }
                    month += 1;
                    if month > 12 {
                        month = 1;
                        year += 1;
                    }
                }
                None
            }
            Self::Yearly { month, day } => (after.year()
                ..after.year().saturating_add(Self::YEARLY_SCAN_LIMIT))
                .filter_map(|year| NaiveDate::from_ymd_opt(year, month, day))
                .find(|candidate| *candidate > after),
        }
    }

    /// Returns whether the rule fires on the given date.
    ///
    /// Equivalent to `next_occurrence(date - 1 day) == date` without the
    /// boundary arithmetic.
    #[must_use]
    pub fn occurs_on(self, date: NaiveDate) -> bool {
        match self {
            Self::Weekly { weekday } => date.weekday() == weekday,
            Self::Monthly { day } => date.day() == day,
            Self::Yearly { month, day } => date.month() == month && date.day() == day,
        }
    }
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weekly { weekday } => {
                let label = match weekday {
                    Weekday::Mon => "一",
                    Weekday::Tue => "二",
                    Weekday::Wed => "三",
                    Weekday::Thu => "四",
                    Weekday::Fri => "五",
                    Weekday::Sat => "六",
                    Weekday::Sun => "日",
                };
                write!(f, "每週{label}")
            }
            Self::Monthly { day } => write!(f, "每月{day}日"),
            Self::Yearly { month, day } => write!(f, "每年{month}月{day}日"),
        }
    }
}

/// A rule plus its cancellation flag, owned by a template task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceSchedule {
    rule: RecurrenceRule,
    cancelled: bool,
}

impl RecurrenceSchedule {
    /// Creates an active schedule for the given rule.
    #[must_use]
    pub const fn new(rule: RecurrenceRule) -> Self {
        Self {
            rule,
            cancelled: false,
        }
    }

    /// Returns the schedule's rule.
    #[must_use]
    pub const fn rule(&self) -> RecurrenceRule {
        self.rule
    }

    /// Returns whether the schedule has been cancelled.
    ///
    /// A cancelled schedule never produces further occurrences.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Marks the schedule cancelled. Idempotent.
    pub const fn cancel(&mut self) {
        self.cancelled = true;
    }
}

fn parse_number(digits: &str) -> Option<u32> {
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Serde representation of weekdays as ISO numbers (Monday = 1).
mod weekday_repr {
    use chrono::Weekday;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(weekday: &Weekday, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(weekday.number_from_monday())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Weekday, D::Error> {
        match u32::deserialize(deserializer)? {
            1 => Ok(Weekday::Mon),
            2 => Ok(Weekday::Tue),
            3 => Ok(Weekday::Wed),
            4 => Ok(Weekday::Thu),
            5 => Ok(Weekday::Fri),
            6 => Ok(Weekday::Sat),
            7 => Ok(Weekday::Sun),
            other => Err(D::Error::custom(format!("weekday {other} out of range"))),
        }
    }
}
