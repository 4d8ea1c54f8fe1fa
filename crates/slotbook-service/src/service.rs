//! The booking service.
//!
//! [`BookingService`] ties the pure engine to a [`CalendarStore`]: every
//! operation loads the relevant snapshot from the store, runs the engine
//! over it, and persists the outcome. The service is generic over the
//! timezone in which a calendar's business hours are interpreted.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use slotbook_core::{
    available_days, available_spots, group_by_day, validate_and_accept, Appointment,
    BookingConfirmation, BookingRequest, DaySchedule, EngineError, TimeWindow, WorkingDays,
};
use slotbook_store::{CalendarRecord, CalendarStore, StoreErrorCode};

use crate::error::{ServiceError, ServiceResult};

/// Widest window `appointments_between` will answer, in days.
pub const MAX_QUERY_WINDOW_DAYS: i64 = 366;

/// What the public booking page learns about a calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarInfo {
    /// Name of the business.
    pub business_name: String,
    /// Free-form description, if the owner set one.
    pub business_description: Option<String>,
    /// Opening time, `HH:MM`.
    pub day_starts_at: String,
    /// Closing time, `HH:MM`.
    pub day_ends_at: String,
    /// Length of one appointment, minutes.
    pub booking_duration: u32,
    /// Pause inserted after each appointment, minutes.
    pub break_between_bookings: u32,
    /// How many days ahead clients may book.
    pub book_in_advance: u32,
    /// Working days, Sunday = 0.
    pub working_days: WorkingDays,
}

/// Booking operations over a calendar store.
pub struct BookingService<Tz: TimeZone> {
    store: Arc<dyn CalendarStore>,
    tz: Tz,
}

impl<Tz: TimeZone> BookingService<Tz> {
    /// Creates a service over the given store, interpreting business
    /// hours in `tz`.
    pub fn new(store: Arc<dyn CalendarStore>, tz: Tz) -> Self {
        Self { store, tz }
    }

    /// Describes a calendar to the public booking page.
    ///
    /// # Errors
    ///
    /// `CalendarNotFound` when no calendar carries `public_id`.
    pub async fn calendar_info(&self, public_id: &str) -> ServiceResult<CalendarInfo> {
        let record = self.calendar(public_id).await?;
        Ok(CalendarInfo {
            business_name: record.business_name,
            business_description: record.business_description,
            day_starts_at: record.config.day_starts_at.clone(),
            day_ends_at: record.config.day_ends_at.clone(),
            booking_duration: record.config.booking_duration,
            break_between_bookings: record.config.break_between_bookings,
            book_in_advance: record.config.book_in_advance,
            working_days: record.config.working_days.clone(),
        })
    }

    /// The working days a client may currently book on, starting today.
    pub async fn available_days(&self, public_id: &str) -> ServiceResult<Vec<NaiveDate>> {
        let today = Utc::now().with_timezone(&self.tz).date_naive();
        self.available_days_from(public_id, today).await
    }

    /// The working days a client may book on, counting the advance
    /// window from `today`.
    pub async fn available_days_from(
        &self,
        public_id: &str,
        today: NaiveDate,
    ) -> ServiceResult<Vec<NaiveDate>> {
        let record = self.calendar(public_id).await?;
        Ok(available_days(&record.config, today))
    }

    /// The bookable start instants of one day.
    pub async fn available_spots(
        &self,
        public_id: &str,
        day: NaiveDate,
    ) -> ServiceResult<Vec<DateTime<Utc>>> {
        let record = self.calendar(public_id).await?;
        let appointments = self.day_snapshot(record.config.id, day).await?;
        let spots = available_spots(&record.config, day, &appointments, &self.tz)?;
        debug!(
            calendar = record.config.id,
            %day,
            spots = spots.len(),
            "computed available spots"
        );
        Ok(spots)
    }

    /// Books an appointment.
    ///
    /// Loads the day's snapshot, lets the engine validate the proposal,
    /// and persists the accepted appointment. If another client wins the
    /// race for the same instant between our read and our write, the
    /// store's uniqueness check fires and the caller sees the same
    /// rejection a stale proposal would get.
    pub async fn book(
        &self,
        public_id: &str,
        request: &BookingRequest,
    ) -> ServiceResult<BookingConfirmation> {
        let record = self.calendar(public_id).await?;
        let day = request.starts_at.with_timezone(&self.tz).date_naive();
        let appointments = self.day_snapshot(record.config.id, day).await?;

        let accepted = validate_and_accept(&record.config, &appointments, request, &self.tz)?;
        let stored = match self.store.insert_appointment(accepted).await {
            Ok(stored) => stored,
            Err(err) if err.code() == StoreErrorCode::Conflict => {
                debug!(calendar = record.config.id, starts_at = %request.starts_at,
                    "lost booking race, reporting slot taken");
                return Err(ServiceError::Engine(EngineError::TooLate));
            }
            Err(err) => return Err(err.into()),
        };

        info!(
            calendar = record.config.id,
            appointment = stored.id,
            starts_at = %stored.starts_at,
            "booked appointment"
        );
        Ok(BookingConfirmation {
            name: stored.client_name,
            phone_number: stored.client_phone,
            date: stored.starts_at,
        })
    }

    /// The calendar's appointments between two instants, grouped by day.
    ///
    /// The window is half-open and capped at [`MAX_QUERY_WINDOW_DAYS`].
    pub async fn appointments_between(
        &self,
        public_id: &str,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> ServiceResult<Vec<DaySchedule>> {
        if until <= from {
            return Err(ServiceError::InvalidWindow(
                "window end must be after its start".into(),
            ));
        }
        let window = TimeWindow::new(from, until);
        if window.num_days() > MAX_QUERY_WINDOW_DAYS {
            return Err(ServiceError::InvalidWindow(format!(
                "window spans {} days, the maximum is {MAX_QUERY_WINDOW_DAYS}",
                window.num_days()
            )));
        }

        let record = self.calendar(public_id).await?;
        let appointments = self
            .store
            .appointments_in(record.config.id, from, until)
            .await?;
        Ok(group_by_day(&appointments, &self.tz))
    }

    /// The calendar's appointments of one month, grouped by day.
    pub async fn appointments_in_month(
        &self,
        public_id: &str,
        year: i32,
        month: u32,
    ) -> ServiceResult<Vec<DaySchedule>> {
        let window = TimeWindow::for_month(year, month, &self.tz).map_err(|_| {
            ServiceError::InvalidWindow(format!("{year}-{month:02} is not a valid month"))
        })?;
        let record = self.calendar(public_id).await?;
        let appointments = self
            .store
            .appointments_in(record.config.id, window.start, window.end)
            .await?;
        Ok(group_by_day(&appointments, &self.tz))
    }

    /// Looks up one appointment by id.
    ///
    /// # Errors
    ///
    /// `AppointmentNotFound` when no appointment carries `id`.
    pub async fn appointment_info(&self, id: i64) -> ServiceResult<Appointment> {
        self.store
            .find_appointment(id)
            .await?
            .ok_or(ServiceError::AppointmentNotFound)
    }

    async fn calendar(&self, public_id: &str) -> ServiceResult<CalendarRecord> {
        self.store
            .find_calendar(public_id)
            .await?
            .ok_or(ServiceError::CalendarNotFound)
    }

    async fn day_snapshot(
        &self,
        calendar_id: i64,
        day: NaiveDate,
    ) -> ServiceResult<Vec<Appointment>> {
        let window = TimeWindow::for_date(day, &self.tz)?;
        Ok(self
            .store
            .appointments_in(calendar_id, window.start, window.end)
            .await?)
    }
}
