//! Calendar configuration: business hours and booking rules.
//!
//! A [`CalendarConfig`] is an immutable-per-request snapshot of a
//! calendar's rules. It is read fresh for every operation; the engine
//! never caches it across requests.

use std::collections::BTreeSet;

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::time::{ParseTimeOfDayError, TimeOfDay};

/// The shortest booking duration a calendar may configure, in minutes.
pub const MIN_BOOKING_DURATION_MINUTES: u32 = 5;

/// Errors raised by [`CalendarConfig::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The booking duration is below the allowed minimum.
    #[error("booking duration must be at least {MIN_BOOKING_DURATION_MINUTES} minutes, got {0}")]
    BookingDurationTooShort(u32),

    /// A working-day number is outside 0-6.
    #[error("working day numbers must be 0-6 (Sunday = 0), got {0}")]
    InvalidWorkingDay(u8),

    /// A business-hour boundary does not parse.
    #[error(transparent)]
    InvalidTimeOfDay(#[from] ParseTimeOfDayError),

    /// The day would close at or before it opens.
    #[error("day must start before it ends ({starts_at} is not before {ends_at})")]
    EmptyBusinessDay {
        /// Configured opening time.
        starts_at: String,
        /// Configured closing time.
        ends_at: String,
    },
}

/// The set of weekdays a calendar accepts bookings on.
///
/// Day numbers follow the persisted data model: 0 = Sunday through
/// 6 = Saturday.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkingDays(BTreeSet<u8>);

impl WorkingDays {
    /// Builds a set from day numbers, rejecting anything outside 0-6.
    pub fn from_numbers(days: impl IntoIterator<Item = u8>) -> Result<Self, ConfigError> {
        let days: BTreeSet<u8> = days.into_iter().collect();
        if let Some(&bad) = days.iter().find(|&&d| d > 6) {
            return Err(ConfigError::InvalidWorkingDay(bad));
        }
        Ok(Self(days))
    }

    /// Monday through Friday.
    pub fn monday_to_friday() -> Self {
        Self((1..=5).collect())
    }

    /// All seven days.
    pub fn every_day() -> Self {
        Self((0..=6).collect())
    }

    /// Checks if the given weekday is a working day.
    pub fn contains(&self, weekday: Weekday) -> bool {
        let number = weekday.num_days_from_sunday() as u8;
        self.0.contains(&number)
    }

    /// Returns true if no day is a working day.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The number of working days.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        // deserialization bypasses from_numbers, so re-check the range
        match self.0.iter().find(|&&d| d > 6) {
            Some(&bad) => Err(ConfigError::InvalidWorkingDay(bad)),
            None => Ok(()),
        }
    }
}

/// A calendar's business rules, read-only per operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// Internal numeric key, never exposed externally.
    pub id: i64,
    /// Opaque external identifier.
    pub public_id: String,
    /// Opening time as "HH:MM" (24-hour).
    pub day_starts_at: String,
    /// Closing time as "HH:MM" (24-hour).
    pub day_ends_at: String,
    /// Length of one booking, in minutes.
    pub booking_duration: u32,
    /// Pause between consecutive bookings, in minutes.
    pub break_between_bookings: u32,
    /// How many days ahead clients may book, today included.
    pub book_in_advance: u32,
    /// Weekdays on which the calendar accepts bookings.
    pub working_days: WorkingDays,
}

impl CalendarConfig {
    /// The canonical slot spacing: booking duration plus break.
    pub fn slot_step_minutes(&self) -> u32 {
        self.booking_duration + self.break_between_bookings
    }

    /// Validates the caller-side invariants of the configuration.
    ///
    /// The engine stays safe (zero slots, no panic) when handed a config
    /// that violates these, but callers are expected to reject such
    /// configs at the input boundary.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.booking_duration < MIN_BOOKING_DURATION_MINUTES {
            return Err(ConfigError::BookingDurationTooShort(self.booking_duration));
        }
        self.working_days.validate()?;
        let starts: TimeOfDay = self.day_starts_at.parse()?;
        let ends: TimeOfDay = self.day_ends_at.parse()?;
        if starts >= ends {
            return Err(ConfigError::EmptyBusinessDay {
                starts_at: self.day_starts_at.clone(),
                ends_at: self.day_ends_at.clone(),
            });
        }
        Ok(())
    }
}
