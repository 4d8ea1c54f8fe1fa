//! CalendarStore trait definition.
//!
//! This module defines the [`CalendarStore`] trait, the abstraction through
//! which the booking service reads calendar configuration and persists
//! appointments. The engine crate stays pure; everything that touches
//! durable state goes through this seam.

use std::future::Future;
use std::pin::Pin;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use slotbook_core::{Appointment, CalendarConfig, NewAppointment};

use crate::error::StoreResult;

/// A boxed future for async trait methods.
///
/// This is used because async functions in traits are not yet stable in a way
/// that works well with dynamic dispatch. Using boxed futures allows the trait
/// to be object-safe.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A calendar as stored, pairing the owner-facing business details with
/// the scheduling configuration the engine consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarRecord {
    /// Name of the business this calendar belongs to.
    pub business_name: String,
    /// Free-form description shown on the public booking page.
    pub business_description: Option<String>,
    /// The scheduling configuration for this calendar.
    pub config: CalendarConfig,
}

impl CalendarRecord {
    /// Creates a new record for the given business and configuration.
    pub fn new(business_name: impl Into<String>, config: CalendarConfig) -> Self {
        Self {
            business_name: business_name.into(),
            business_description: None,
            config,
        }
    }

    /// Builder method to set the business description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.business_description = Some(description.into());
        self
    }
}

/// The storage abstraction for calendars and appointments.
///
/// Implementations must be `Send + Sync` so a single store can be shared
/// across request handlers behind an `Arc`.
///
/// # Contract
///
/// - `appointments_in` returns appointments ordered by start time ascending.
///   The window is half-open: an appointment is included when its start
///   instant lies in `[from, until)`.
/// - `insert_appointment` enforces uniqueness of `(calendar, start instant)`
///   and fails with a `Conflict` error when another appointment already
///   occupies that instant. This is the last line of defense against two
///   clients racing for the same slot.
pub trait CalendarStore: Send + Sync {
    /// Looks up a calendar by its public identifier.
    ///
    /// Returns `Ok(None)` when no calendar carries that identifier.
    fn find_calendar(&self, public_id: &str) -> BoxFuture<'_, StoreResult<Option<CalendarRecord>>>;

    /// Returns the appointments of a calendar whose start instant falls in
    /// `[from, until)`, ordered by start time ascending.
    fn appointments_in(
        &self,
        calendar_id: i64,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> BoxFuture<'_, StoreResult<Vec<Appointment>>>;

    /// Persists a new appointment and returns it with its assigned id.
    ///
    /// # Errors
    ///
    /// Fails with a `Conflict` error when the calendar already has an
    /// appointment starting at the same instant.
    fn insert_appointment(
        &self,
        appointment: NewAppointment,
    ) -> BoxFuture<'_, StoreResult<Appointment>>;

    /// Looks up an appointment by its id.
    ///
    /// Returns `Ok(None)` when no appointment carries that id.
    fn find_appointment(&self, id: i64) -> BoxFuture<'_, StoreResult<Option<Appointment>>>;
}
