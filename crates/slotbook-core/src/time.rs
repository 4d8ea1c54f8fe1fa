//! Wall-clock and query-window types.
//!
//! This module provides [`TimeOfDay`] for the "HH:MM" business-hour
//! boundaries of a calendar, and [`TimeWindow`] for bounding appointment
//! queries to a day or a month.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::EngineError;

/// Error returned when a wall-clock string does not parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid time of day {input:?}: expected 24-hour HH:MM")]
pub struct ParseTimeOfDayError {
    /// The rejected input.
    pub input: String,
}

/// A wall-clock time of day (24-hour, whole minutes).
///
/// Calendar opening and closing times are configured as "HH:MM" strings;
/// this is their parsed form. Seconds are always zero: every boundary is
/// truncated to whole minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawTimeOfDay")]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

/// Unvalidated mirror of [`TimeOfDay`]; deserialization bypasses
/// `new()`, so incoming values are routed through the range check.
#[derive(Deserialize)]
struct RawTimeOfDay {
    hour: u8,
    minute: u8,
}

impl TryFrom<RawTimeOfDay> for TimeOfDay {
    type Error = ParseTimeOfDayError;

    fn try_from(raw: RawTimeOfDay) -> Result<Self, Self::Error> {
        Self::new(raw.hour, raw.minute).ok_or_else(|| ParseTimeOfDayError {
            input: format!("{:02}:{:02}", raw.hour, raw.minute),
        })
    }
}

impl TimeOfDay {
    /// Creates a time of day, or `None` if out of range.
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(Self { hour, minute })
    }

    /// The hour component (0-23).
    pub fn hour(&self) -> u8 {
        self.hour
    }

    /// The minute component (0-59).
    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// Anchors this wall-clock time to `date` in the given timezone and
    /// returns the corresponding UTC instant.
    ///
    /// # Errors
    ///
    /// Fails with [`EngineError::UnrepresentableLocalTime`] when the local
    /// datetime does not exist or is ambiguous in `tz` (DST transitions
    /// are out of scope for the engine).
    pub fn on<Tz: TimeZone>(&self, date: NaiveDate, tz: &Tz) -> Result<DateTime<Utc>, EngineError> {
        let time = NaiveTime::from_hms_opt(u32::from(self.hour), u32::from(self.minute), 0)
            .expect("valid time");
        let local = date.and_time(time);
        tz.from_local_datetime(&local)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or(EngineError::UnrepresentableLocalTime(local))
    }
}

impl FromStr for TimeOfDay {
    type Err = ParseTimeOfDayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseTimeOfDayError {
            input: s.to_string(),
        };
        let (hour, minute) = s.split_once(':').ok_or_else(err)?;
        let digits =
            |part: &str| !part.is_empty() && part.len() <= 2 && part.bytes().all(|b| b.is_ascii_digit());
        if !digits(hour) || !digits(minute) {
            return Err(err());
        }
        let hour: u8 = hour.parse().map_err(|_| err())?;
        let minute: u8 = minute.parse().map_err(|_| err())?;
        Self::new(hour, minute).ok_or_else(err)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// A window for querying appointments.
///
/// Represents a half-open interval `[start, end)` in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Start of the window (inclusive).
    pub start: DateTime<Utc>,
    /// End of the window (exclusive).
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Creates a new window.
    ///
    /// # Panics
    ///
    /// Panics if `start` is after `end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        assert!(start <= end, "TimeWindow start must be <= end");
        Self { start, end }
    }

    /// The window covering a single calendar day in the given timezone.
    pub fn for_date<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Result<Self, EngineError> {
        let start = midnight(date, tz)?;
        let next = date
            .succ_opt()
            .ok_or_else(|| EngineError::InvalidQueryWindow(format!("no day after {date}")))?;
        Ok(Self::new(start, midnight(next, tz)?))
    }

    /// The window covering a whole calendar month in the given timezone.
    pub fn for_month<Tz: TimeZone>(year: i32, month: u32, tz: &Tz) -> Result<Self, EngineError> {
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            EngineError::InvalidQueryWindow(format!("no such month: {year}-{month:02}"))
        })?;
        let next_first = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or_else(|| {
            EngineError::InvalidQueryWindow(format!("no month after {year}-{month:02}"))
        })?;
        Ok(Self::new(midnight(first, tz)?, midnight(next_first, tz)?))
    }

    /// Checks if an instant falls within this window (`[start, end)`).
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    /// The length of this window.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// The number of whole days this window spans.
    pub fn num_days(&self) -> i64 {
        self.duration().num_days()
    }
}

fn midnight<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Result<DateTime<Utc>, EngineError> {
    TimeOfDay { hour: 0, minute: 0 }.on(date, tz)
}
