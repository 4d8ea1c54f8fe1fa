//! Appointment reporting: grouping a calendar's appointments by day.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::appointment::Appointment;

/// One appointment as reported to the calendar owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentSummary {
    /// Internal appointment key.
    pub id: i64,
    /// When the appointment starts.
    pub starts_at: DateTime<Utc>,
    /// When it ends: `starts_at` plus the booked duration.
    pub ends_at: DateTime<Utc>,
}

/// All appointments of one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    /// The day, formatted `YYYY-MM-DD` in the query timezone.
    pub day: String,
    /// The day's appointments, ascending by start.
    pub appointments: Vec<AppointmentSummary>,
}

/// Groups appointments by the calendar day they start on, ascending, with
/// each day's entries ascending by start instant.
pub fn group_by_day<Tz: TimeZone>(appointments: &[Appointment], tz: &Tz) -> Vec<DaySchedule> {
    let mut days: BTreeMap<NaiveDate, Vec<AppointmentSummary>> = BTreeMap::new();
    for appointment in appointments {
        let day = appointment.starts_at.with_timezone(tz).date_naive();
        days.entry(day).or_default().push(AppointmentSummary {
            id: appointment.id,
            starts_at: appointment.starts_at,
            ends_at: appointment.ends_at(),
        });
    }
    days.into_iter()
        .map(|(day, mut appointments)| {
            appointments.sort_by_key(|a| a.starts_at);
            DaySchedule {
                day: day.format("%Y-%m-%d").to_string(),
                appointments,
            }
        })
        .collect()
}
