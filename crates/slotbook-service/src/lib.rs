//! Booking operations layered over the engine and a calendar store.
//!
//! [`BookingService`] is what a transport (HTTP handler, CLI, test) talks
//! to: it loads snapshots from a [`slotbook_store::CalendarStore`], runs
//! the pure engine from `slotbook-core` over them, and persists accepted
//! bookings.

pub mod error;
pub mod service;

pub use error::{ServiceError, ServiceResult};
pub use service::{BookingService, CalendarInfo, MAX_QUERY_WINDOW_DAYS};
