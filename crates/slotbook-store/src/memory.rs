//! In-memory store implementation.
//!
//! [`MemoryStore`] keeps calendars and appointments in process memory behind
//! a mutex. It backs the test suite and is a reasonable default for demos
//! and single-process deployments; durable backends implement the same
//! [`CalendarStore`] trait.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use tracing::debug;

use slotbook_core::{Appointment, NewAppointment};

use crate::error::{StoreError, StoreResult};
use crate::store::{BoxFuture, CalendarRecord, CalendarStore};

#[derive(Debug, Default)]
struct State {
    calendars: HashMap<String, CalendarRecord>,
    appointments: Vec<Appointment>,
    next_appointment_id: i64,
}

/// An in-memory [`CalendarStore`].
///
/// All state lives behind a single mutex; operations are short and never
/// hold the lock across an await point.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a calendar, keyed by its public identifier.
    ///
    /// Replaces any existing calendar with the same public identifier.
    pub fn add_calendar(&self, record: CalendarRecord) -> StoreResult<()> {
        let mut state = self.lock()?;
        state
            .calendars
            .insert(record.config.public_id.clone(), record);
        Ok(())
    }

    /// Number of stored appointments, across all calendars.
    pub fn appointment_count(&self) -> StoreResult<usize> {
        Ok(self.lock()?.appointments.len())
    }

    fn lock(&self) -> StoreResult<std::sync::MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|_| StoreError::internal("store mutex poisoned"))
    }
}

impl CalendarStore for MemoryStore {
    fn find_calendar(&self, public_id: &str) -> BoxFuture<'_, StoreResult<Option<CalendarRecord>>> {
        let result = self
            .lock()
            .map(|state| state.calendars.get(public_id).cloned());
        Box::pin(async move { result })
    }

    fn appointments_in(
        &self,
        calendar_id: i64,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> BoxFuture<'_, StoreResult<Vec<Appointment>>> {
        let result = self.lock().map(|state| {
            let mut matches: Vec<Appointment> = state
                .appointments
                .iter()
                .filter(|appt| {
                    appt.calendar_id == calendar_id
                        && appt.starts_at >= from
                        && appt.starts_at < until
                })
                .cloned()
                .collect();
            matches.sort_by_key(|appt| appt.starts_at);
            matches
        });
        Box::pin(async move { result })
    }

    fn insert_appointment(
        &self,
        appointment: NewAppointment,
    ) -> BoxFuture<'_, StoreResult<Appointment>> {
        let result = self.lock().and_then(|mut state| {
            let taken = state.appointments.iter().any(|existing| {
                existing.calendar_id == appointment.calendar_id
                    && existing.starts_at == appointment.starts_at
            });
            if taken {
                return Err(StoreError::conflict(format!(
                    "calendar {} already has an appointment at {}",
                    appointment.calendar_id, appointment.starts_at
                )));
            }

            state.next_appointment_id += 1;
            let stored = Appointment {
                id: state.next_appointment_id,
                calendar_id: appointment.calendar_id,
                starts_at: appointment.starts_at,
                duration_minutes: appointment.duration_minutes,
                client_name: appointment.client_name,
                client_phone: appointment.client_phone,
            };
            debug!(
                appointment_id = stored.id,
                calendar_id = stored.calendar_id,
                starts_at = %stored.starts_at,
                "stored appointment"
            );
            state.appointments.push(stored.clone());
            Ok(stored)
        });
        Box::pin(async move { result })
    }

    fn find_appointment(&self, id: i64) -> BoxFuture<'_, StoreResult<Option<Appointment>>> {
        let result = self.lock().map(|state| {
            state
                .appointments
                .iter()
                .find(|appt| appt.id == id)
                .cloned()
        });
        Box::pin(async move { result })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreErrorCode;
    use chrono::TimeZone;
    use slotbook_core::{CalendarConfig, WorkingDays};

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    fn config(id: i64, public_id: &str) -> CalendarConfig {
        CalendarConfig {
            id,
            public_id: public_id.into(),
            day_starts_at: "08:00".into(),
            day_ends_at: "16:00".into(),
            booking_duration: 60,
            break_between_bookings: 0,
            book_in_advance: 7,
            working_days: WorkingDays::monday_to_friday(),
        }
    }

    fn new_appointment(calendar_id: i64, starts_at: DateTime<Utc>) -> NewAppointment {
        NewAppointment {
            calendar_id,
            starts_at,
            duration_minutes: 60,
            client_name: "Dana".into(),
            client_phone: "555-0100".into(),
        }
    }

    #[tokio::test]
    async fn find_calendar_by_public_id() {
        let store = MemoryStore::new();
        store
            .add_calendar(CalendarRecord::new("Downtown Barbers", config(1, "barber")))
            .unwrap();

        let found = store.find_calendar("barber").await.unwrap();
        assert_eq!(found.unwrap().business_name, "Downtown Barbers");

        let missing = store.find_calendar("nope").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn insert_assigns_increasing_ids() {
        let store = MemoryStore::new();

        let first = store
            .insert_appointment(new_appointment(1, utc(2026, 3, 2, 9, 0)))
            .await
            .unwrap();
        let second = store
            .insert_appointment(new_appointment(1, utc(2026, 3, 2, 10, 0)))
            .await
            .unwrap();

        assert!(second.id > first.id);
        assert_eq!(store.appointment_count().unwrap(), 2);
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_instant() {
        let store = MemoryStore::new();
        let at = utc(2026, 3, 2, 9, 0);

        store.insert_appointment(new_appointment(1, at)).await.unwrap();
        let err = store
            .insert_appointment(new_appointment(1, at))
            .await
            .unwrap_err();

        assert_eq!(err.code(), StoreErrorCode::Conflict);
        assert!(err.is_retryable());
        assert_eq!(store.appointment_count().unwrap(), 1);
    }

    #[tokio::test]
    async fn same_instant_on_other_calendar_is_fine() {
        let store = MemoryStore::new();
        let at = utc(2026, 3, 2, 9, 0);

        store.insert_appointment(new_appointment(1, at)).await.unwrap();
        store.insert_appointment(new_appointment(2, at)).await.unwrap();

        assert_eq!(store.appointment_count().unwrap(), 2);
    }

    #[tokio::test]
    async fn appointments_in_is_half_open_and_sorted() {
        let store = MemoryStore::new();
        // Insert out of order on purpose.
        for hour in [11, 9, 10] {
            store
                .insert_appointment(new_appointment(1, utc(2026, 3, 2, hour, 0)))
                .await
                .unwrap();
        }
        // Different calendar, must not leak in.
        store
            .insert_appointment(new_appointment(2, utc(2026, 3, 2, 9, 0)))
            .await
            .unwrap();

        let found = store
            .appointments_in(1, utc(2026, 3, 2, 9, 0), utc(2026, 3, 2, 11, 0))
            .await
            .unwrap();

        let starts: Vec<_> = found.iter().map(|a| a.starts_at).collect();
        assert_eq!(starts, vec![utc(2026, 3, 2, 9, 0), utc(2026, 3, 2, 10, 0)]);
    }

    #[tokio::test]
    async fn find_appointment_by_id() {
        let store = MemoryStore::new();
        let stored = store
            .insert_appointment(new_appointment(1, utc(2026, 3, 2, 9, 0)))
            .await
            .unwrap();

        let found = store.find_appointment(stored.id).await.unwrap();
        assert_eq!(found.unwrap().client_name, "Dana");

        let missing = store.find_appointment(stored.id + 100).await.unwrap();
        assert!(missing.is_none());
    }
}
