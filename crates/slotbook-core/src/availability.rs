//! Availability Resolver.
//!
//! Turns a calendar's configuration plus the day's booked appointments
//! into the ordered list of currently-open slots.

use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, TimeZone, Utc};
use tracing::debug;

use crate::appointment::Appointment;
use crate::config::CalendarConfig;
use crate::error::EngineError;
use crate::grid::DayGrid;
use crate::occupancy::{Occupant, Timeline};

/// The days a client may currently book on: `today` plus the calendar's
/// advance window, filtered to working days, ascending.
pub fn available_days(config: &CalendarConfig, today: NaiveDate) -> Vec<NaiveDate> {
    (0..config.book_in_advance)
        .filter_map(|offset| today.checked_add_days(Days::new(u64::from(offset))))
        .filter(|day| config.working_days.contains(day.weekday()))
        .collect()
}

/// Every instant at which a new appointment of the calendar's configured
/// duration could start on `day`, ascending and duplicate-free.
///
/// A non-working day yields an empty list, not an error. Days without
/// appointments yield the full opening-closing grid: the sentinel-bounded
/// timeline always exposes that gap. A day that closes at or before it
/// opens yields no slots.
///
/// Pure function of its inputs: identical snapshots always produce an
/// identical list.
pub fn available_spots<Tz: TimeZone>(
    config: &CalendarConfig,
    day: NaiveDate,
    appointments: &[Appointment],
    tz: &Tz,
) -> Result<Vec<DateTime<Utc>>, EngineError> {
    if !config.working_days.contains(day.weekday()) {
        return Ok(Vec::new());
    }
    let grid = DayGrid::resolve(config, day, tz)?;
    if grid.is_empty() {
        return Ok(Vec::new());
    }

    let break_between = Duration::minutes(i64::from(config.break_between_bookings));
    let timeline = Timeline::for_day(&grid, appointments);
    let mut spots = Vec::new();
    for (previous, next) in timeline.gaps() {
        let candidate = match previous {
            // the grid is anchored at opening itself: no break after a
            // virtual occupant
            Occupant::Opening(at) => *at,
            Occupant::Booked { .. } => previous.ends_at() + break_between,
            // nothing opens after closing; appointments recorded past
            // closing sort behind the sentinel and are skipped here
            Occupant::Closing(_) | Occupant::Proposed(_) => continue,
        };
        let candidate = candidate.max(grid.opening);
        let gap_end = next.starts_at().min(grid.closing);
        let mut cursor = candidate;
        while cursor + grid.step() <= gap_end {
            spots.push(cursor);
            cursor = cursor + grid.step();
        }
    }

    debug!(
        calendar = config.id,
        %day,
        spots = spots.len(),
        "resolved availability"
    );
    Ok(spots)
}
