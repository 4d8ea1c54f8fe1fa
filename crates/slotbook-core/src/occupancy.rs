//! The merged occupancy sequence of a business day.
//!
//! Calendar opening and closing are modeled as zero-duration virtual
//! occupants merged into the sorted appointment list. Gap computation and
//! the booking walk then see one uniform element type instead of
//! special-casing the first and last gap of the day.

use chrono::{DateTime, Duration, Utc};

use crate::appointment::Appointment;
use crate::grid::DayGrid;

/// One element of a day's occupancy sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Occupant {
    /// Virtual occupant at calendar opening.
    Opening(DateTime<Utc>),
    /// A booking proposal under validation.
    Proposed(DateTime<Utc>),
    /// A persisted appointment occupying `[starts_at, starts_at + duration)`.
    Booked {
        /// When the appointment starts.
        starts_at: DateTime<Utc>,
        /// How long it lasts, in minutes.
        duration_minutes: u32,
    },
    /// Virtual occupant at calendar closing.
    Closing(DateTime<Utc>),
}

impl Occupant {
    /// The instant this occupant starts at.
    pub fn starts_at(&self) -> DateTime<Utc> {
        match self {
            Self::Opening(at) | Self::Proposed(at) | Self::Closing(at) => *at,
            Self::Booked { starts_at, .. } => *starts_at,
        }
    }

    /// The instant this occupant releases the calendar. Virtual occupants
    /// and proposals have zero duration.
    pub fn ends_at(&self) -> DateTime<Utc> {
        match self {
            Self::Booked {
                starts_at,
                duration_minutes,
            } => *starts_at + Duration::minutes(i64::from(*duration_minutes)),
            other => other.starts_at(),
        }
    }

    /// True for the opening and closing sentinels.
    pub fn is_virtual(&self) -> bool {
        matches!(self, Self::Opening(_) | Self::Closing(_))
    }
}

/// A day's occupancy, sorted ascending and bounded by the two sentinels.
///
/// Both sentinels are always present, also on days without appointments:
/// the opening-closing gap itself must be visible to the resolver.
#[derive(Debug, Clone)]
pub struct Timeline {
    entries: Vec<Occupant>,
}

impl Timeline {
    /// Builds the sentinel-bounded sequence for one day.
    pub fn for_day(grid: &DayGrid, appointments: &[Appointment]) -> Self {
        Self::build(grid, appointments, None)
    }

    /// Like [`Timeline::for_day`], with a booking proposal merged in.
    ///
    /// The sort is stable and the proposal is inserted after the opening
    /// sentinel but before the existing appointments. Among occupants at
    /// the same instant the proposal therefore follows the opening
    /// sentinel (a slot at opening is inside business hours) and precedes
    /// a colliding appointment, which the validator then sees as the
    /// proposal's successor.
    pub fn with_proposal(
        grid: &DayGrid,
        appointments: &[Appointment],
        proposed: DateTime<Utc>,
    ) -> Self {
        Self::build(grid, appointments, Some(proposed))
    }

    fn build(grid: &DayGrid, appointments: &[Appointment], proposed: Option<DateTime<Utc>>) -> Self {
        let mut entries = Vec::with_capacity(appointments.len() + 3);
        entries.push(Occupant::Opening(grid.opening));
        if let Some(instant) = proposed {
            entries.push(Occupant::Proposed(instant));
        }
        entries.extend(appointments.iter().map(|a| Occupant::Booked {
            starts_at: a.starts_at,
            duration_minutes: a.duration_minutes,
        }));
        entries.push(Occupant::Closing(grid.closing));
        entries.sort_by_key(Occupant::starts_at);
        Self { entries }
    }

    /// The sorted occupants, sentinels included.
    pub fn entries(&self) -> &[Occupant] {
        &self.entries
    }

    /// Adjacent occupant pairs, in ascending order. Each pair bounds one
    /// candidate gap.
    pub fn gaps(&self) -> impl Iterator<Item = (&Occupant, &Occupant)> {
        self.entries.windows(2).map(|pair| (&pair[0], &pair[1]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CalendarConfig, WorkingDays};
    use chrono::{NaiveDate, TimeZone};

    fn utc(h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, h, min, 0).unwrap()
    }

    fn grid() -> DayGrid {
        let config = CalendarConfig {
            id: 1,
            public_id: "cal-abc".to_string(),
            day_starts_at: "08:00".to_string(),
            day_ends_at: "16:00".to_string(),
            booking_duration: 45,
            break_between_bookings: 15,
            book_in_advance: 7,
            working_days: WorkingDays::monday_to_friday(),
        };
        DayGrid::resolve(&config, NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(), &Utc).unwrap()
    }

    fn booked(h: u32, min: u32) -> Appointment {
        Appointment {
            id: 1,
            calendar_id: 1,
            starts_at: utc(h, min),
            duration_minutes: 45,
            client_name: "Jamie Doe".to_string(),
            client_phone: "opaque".to_string(),
        }
    }

    #[test]
    fn occupant_bounds() {
        let open = Occupant::Opening(utc(8, 0));
        assert_eq!(open.starts_at(), utc(8, 0));
        assert_eq!(open.ends_at(), utc(8, 0));
        assert!(open.is_virtual());

        let real = Occupant::Booked {
            starts_at: utc(9, 0),
            duration_minutes: 45,
        };
        assert_eq!(real.starts_at(), utc(9, 0));
        assert_eq!(real.ends_at(), utc(9, 45));
        assert!(!real.is_virtual());
    }

    #[test]
    fn empty_day_keeps_both_sentinels() {
        let timeline = Timeline::for_day(&grid(), &[]);
        assert_eq!(
            timeline.entries(),
            &[Occupant::Opening(utc(8, 0)), Occupant::Closing(utc(16, 0))]
        );
        assert_eq!(timeline.gaps().count(), 1);
    }

    #[test]
    fn appointments_sort_between_the_sentinels() {
        let timeline = Timeline::for_day(&grid(), &[booked(11, 0), booked(9, 0)]);
        let starts: Vec<_> = timeline.entries().iter().map(Occupant::starts_at).collect();
        assert_eq!(starts, vec![utc(8, 0), utc(9, 0), utc(11, 0), utc(16, 0)]);
    }

    #[test]
    fn proposal_at_opening_sorts_after_the_sentinel() {
        let timeline = Timeline::with_proposal(&grid(), &[], utc(8, 0));
        assert_eq!(
            timeline.entries(),
            &[
                Occupant::Opening(utc(8, 0)),
                Occupant::Proposed(utc(8, 0)),
                Occupant::Closing(utc(16, 0)),
            ]
        );
    }

    #[test]
    fn proposal_precedes_a_colliding_appointment() {
        let timeline = Timeline::with_proposal(&grid(), &[booked(9, 0)], utc(9, 0));
        assert_eq!(
            timeline.entries()[1],
            Occupant::Proposed(utc(9, 0)),
            "the proposal must see the colliding appointment as its successor"
        );
        assert!(matches!(timeline.entries()[2], Occupant::Booked { .. }));
    }

    #[test]
    fn appointment_past_closing_sorts_after_the_closing_sentinel() {
        let timeline = Timeline::for_day(&grid(), &[booked(17, 0)]);
        assert_eq!(timeline.entries()[1], Occupant::Closing(utc(16, 0)));
        assert!(matches!(timeline.entries()[2], Occupant::Booked { .. }));
    }
}
