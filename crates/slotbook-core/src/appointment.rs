//! Appointment records and booking request/confirmation types.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A persisted appointment, occupying `[starts_at, starts_at + duration)`.
///
/// Rows are created exactly once by an accepted booking and never mutated
/// by the engine. The phone number is opaque: the caller encrypts it
/// before it reaches this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    /// Internal numeric key.
    pub id: i64,
    /// The calendar this appointment belongs to.
    pub calendar_id: i64,
    /// When the appointment starts.
    pub starts_at: DateTime<Utc>,
    /// How long it lasts, in minutes.
    pub duration_minutes: u32,
    /// The client's display name.
    pub client_name: String,
    /// The client's phone number (caller-encrypted, opaque here).
    pub client_phone: String,
}

impl Appointment {
    /// When the appointment ends (exclusive).
    pub fn ends_at(&self) -> DateTime<Utc> {
        self.starts_at + Duration::minutes(i64::from(self.duration_minutes))
    }

    /// Checks if the occupied intervals of two appointments intersect.
    pub fn overlaps(&self, other: &Appointment) -> bool {
        self.starts_at < other.ends_at() && other.starts_at < self.ends_at()
    }
}

/// An appointment accepted by the validator but not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAppointment {
    /// The calendar to book on.
    pub calendar_id: i64,
    /// When the appointment starts.
    pub starts_at: DateTime<Utc>,
    /// How long it lasts, in minutes (always the calendar's configured
    /// booking duration).
    pub duration_minutes: u32,
    /// The client's display name.
    pub client_name: String,
    /// The client's phone number (caller-encrypted, opaque here).
    pub client_phone: String,
}

impl NewAppointment {
    /// When the appointment would end (exclusive).
    pub fn ends_at(&self) -> DateTime<Utc> {
        self.starts_at + Duration::minutes(i64::from(self.duration_minutes))
    }
}

/// A client's proposal to book a specific instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    /// The proposed start instant.
    pub starts_at: DateTime<Utc>,
    /// The client's display name.
    pub client_name: String,
    /// The client's phone number (caller-encrypted, opaque here).
    pub client_phone: String,
}

/// What an accepted booking returns to the client, unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingConfirmation {
    /// The client's display name, as supplied.
    pub name: String,
    /// The phone number, as supplied.
    pub phone_number: String,
    /// The booked instant.
    pub date: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, h, min, 0).unwrap()
    }

    fn appointment(id: i64, starts_at: DateTime<Utc>, duration_minutes: u32) -> Appointment {
        Appointment {
            id,
            calendar_id: 1,
            starts_at,
            duration_minutes,
            client_name: "Jamie Doe".to_string(),
            client_phone: "opaque".to_string(),
        }
    }

    #[test]
    fn ends_at_adds_the_duration() {
        let appt = appointment(1, utc(9, 0), 45);
        assert_eq!(appt.ends_at(), utc(9, 45));
    }

    #[test]
    fn overlap_is_half_open() {
        let first = appointment(1, utc(9, 0), 45);
        let adjacent = appointment(2, utc(9, 45), 45);
        let inside = appointment(3, utc(9, 30), 45);
        let disjoint = appointment(4, utc(11, 0), 45);

        // back-to-back intervals do not overlap
        assert!(!first.overlaps(&adjacent));
        assert!(first.overlaps(&inside));
        assert!(inside.overlaps(&first));
        assert!(!first.overlaps(&disjoint));
    }

    #[test]
    fn serde_roundtrip() {
        let appt = appointment(7, utc(10, 0), 30);
        let json = serde_json::to_string(&appt).unwrap();
        let parsed: Appointment = serde_json::from_str(&json).unwrap();
        assert_eq!(appt, parsed);
    }
}
