//! Day Grid Calculator.
//!
//! Converts a calendar's "HH:MM" boundaries into absolute instants
//! anchored to a specific day, and defines the canonical slot step used
//! by the availability resolver and the booking validator.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

use crate::config::CalendarConfig;
use crate::error::EngineError;
use crate::time::TimeOfDay;

/// Upper bound on the booking validator's grid-alignment walk.
///
/// The walk always terminates (it strictly increases past the target or
/// lands on it), but malformed inputs must not turn it into a long spin.
/// A day has 1440 minutes and the step is at least one minute, so this
/// cap is never reached on valid data.
pub const GRID_WALK_CAP: u32 = 1_440;

/// The grid of one business day: opening and closing instants plus the
/// canonical step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayGrid {
    /// When the calendar opens on this day.
    pub opening: DateTime<Utc>,
    /// When the calendar closes on this day.
    pub closing: DateTime<Utc>,
    step_minutes: u32,
}

impl DayGrid {
    /// Resolves the calendar's boundaries for `day` in the given timezone.
    ///
    /// Pure function of its inputs, no side effects.
    ///
    /// # Errors
    ///
    /// Fails with [`EngineError::InvalidTimeFormat`] when a configured
    /// boundary does not parse, or [`EngineError::UnrepresentableLocalTime`]
    /// when the boundary does not exist in `tz` on that day.
    pub fn resolve<Tz: TimeZone>(
        config: &CalendarConfig,
        day: NaiveDate,
        tz: &Tz,
    ) -> Result<Self, EngineError> {
        let opening = config.day_starts_at.parse::<TimeOfDay>()?.on(day, tz)?;
        let closing = config.day_ends_at.parse::<TimeOfDay>()?.on(day, tz)?;
        Ok(Self {
            opening,
            closing,
            step_minutes: config.slot_step_minutes(),
        })
    }

    /// The slot step: booking duration plus break.
    pub fn step(&self) -> Duration {
        Duration::minutes(i64::from(self.step_minutes))
    }

    /// The slot step in minutes.
    pub fn step_minutes(&self) -> u32 {
        self.step_minutes
    }

    /// True when the day closes at or before it opens. Such a day has no
    /// slots; the resolver treats it as empty rather than erroring.
    pub fn is_empty(&self) -> bool {
        self.opening >= self.closing
    }
}
