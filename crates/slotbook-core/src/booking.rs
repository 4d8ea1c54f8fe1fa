//! Booking Validator.
//!
//! Decides whether a client may book a proposed instant and, on
//! acceptance, produces the appointment record to persist. The checks run
//! in a fixed order and the first failure wins, so a proposal that is
//! wrong in several ways always reports the same rejection.

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use tracing::debug;

use crate::appointment::{Appointment, BookingRequest, NewAppointment};
use crate::config::CalendarConfig;
use crate::error::EngineError;
use crate::grid::{DayGrid, GRID_WALK_CAP};
use crate::occupancy::{Occupant, Timeline};

/// Validates a booking proposal against the day's appointment snapshot.
///
/// `appointments` must be the calendar's appointments for the proposal's
/// day; an absent set is treated identically to an empty one. On
/// acceptance the returned [`NewAppointment`] carries the calendar's
/// configured booking duration and the client fields unchanged.
///
/// The validator only reasons about the snapshot it was given.
/// Correctness under concurrent bookings relies on the caller wrapping
/// the read-validate-persist sequence in a serializable unit, e.g. a
/// transaction or a unique `(calendar_id, starts_at)` key with
/// retry-on-conflict.
pub fn validate_and_accept<Tz: TimeZone>(
    config: &CalendarConfig,
    appointments: &[Appointment],
    request: &BookingRequest,
    tz: &Tz,
) -> Result<NewAppointment, EngineError> {
    let local_day = request.starts_at.with_timezone(tz).date_naive();
    if !config.working_days.contains(local_day.weekday()) {
        debug!(calendar = config.id, starts_at = %request.starts_at, "rejected: non-working day");
        return Err(EngineError::NonWorkingDay);
    }

    let grid = DayGrid::resolve(config, local_day, tz)?;
    let timeline = Timeline::with_proposal(&grid, appointments, request.starts_at);
    let entries = timeline.entries();
    let proposed = position_of(entries, |o| matches!(o, Occupant::Proposed(_)));
    let opening = position_of(entries, |o| matches!(o, Occupant::Opening(_)));
    let closing = position_of(entries, |o| matches!(o, Occupant::Closing(_)));

    if proposed < opening || proposed > closing {
        debug!(calendar = config.id, starts_at = %request.starts_at, "rejected: outside business hours");
        return Err(EngineError::OutsideBusinessHours);
    }

    // opening < proposed < closing from here on, so both neighbours exist
    let next_start = entries[proposed + 1].starts_at();
    if request.starts_at + grid.step() > next_start {
        debug!(calendar = config.id, starts_at = %request.starts_at, "rejected: too late");
        return Err(EngineError::TooLate);
    }

    let anchor = entries[proposed - 1].starts_at();
    walk_to(anchor, request.starts_at, grid.step_minutes())?;

    debug!(calendar = config.id, starts_at = %request.starts_at, "booking accepted");
    Ok(NewAppointment {
        calendar_id: config.id,
        starts_at: request.starts_at,
        duration_minutes: config.booking_duration,
        client_name: request.client_name.clone(),
        client_phone: request.client_phone.clone(),
    })
}

fn position_of(entries: &[Occupant], pred: impl FnMut(&Occupant) -> bool) -> usize {
    entries
        .iter()
        .position(pred)
        .expect("sentinels and proposal are always present in the merged timeline")
}

/// The grid-alignment walk: steps forward from `anchor` in slot-step
/// increments and accepts only if it lands exactly on `target`.
///
/// Bounded by construction (the walk strictly increases past the target
/// or lands on it); the explicit cap guards against malformed inputs
/// such as a zero step.
fn walk_to(anchor: DateTime<Utc>, target: DateTime<Utc>, step_minutes: u32) -> Result<(), EngineError> {
    if step_minutes == 0 {
        return Err(EngineError::GridMisaligned);
    }
    let step = Duration::minutes(i64::from(step_minutes));
    let mut cursor = anchor;
    for _ in 0..=GRID_WALK_CAP {
        if cursor == target {
            return Ok(());
        }
        if cursor > target {
            break;
        }
        cursor = cursor + step;
    }
    Err(EngineError::GridMisaligned)
}
