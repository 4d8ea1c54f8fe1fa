//! Core engine: calendar config, day grid, availability, booking validation
//!
//! Everything in this crate is a pure, synchronous computation over data
//! the caller has already fetched. The crate owns no storage, transport
//! or authentication; it consumes configuration and appointment snapshots
//! and produces plain data.

pub mod appointment;
pub mod availability;
pub mod booking;
pub mod config;
pub mod error;
pub mod grid;
pub mod occupancy;
pub mod schedule;
pub mod time;
pub mod tracing;

pub use appointment::{Appointment, BookingConfirmation, BookingRequest, NewAppointment};
pub use availability::{available_days, available_spots};
pub use booking::validate_and_accept;
pub use config::{CalendarConfig, ConfigError, MIN_BOOKING_DURATION_MINUTES, WorkingDays};
pub use error::EngineError;
pub use grid::{DayGrid, GRID_WALK_CAP};
pub use occupancy::{Occupant, Timeline};
pub use schedule::{AppointmentSummary, DaySchedule, group_by_day};
pub use time::{ParseTimeOfDayError, TimeOfDay, TimeWindow};
pub use tracing::{TracingConfig, TracingError, TracingFormat, init_tracing};
