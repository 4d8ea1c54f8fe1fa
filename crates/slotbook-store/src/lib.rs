//! Storage seam for the booking engine.
//!
//! This crate defines the [`CalendarStore`] trait through which the service
//! layer reads calendar configuration and persists appointments, the
//! [`StoreError`] type its implementations report, and [`MemoryStore`],
//! the in-memory reference implementation.

pub mod error;
pub mod memory;
pub mod store;

pub use error::{StoreError, StoreErrorCode, StoreResult};
pub use memory::MemoryStore;
pub use store::{BoxFuture, CalendarRecord, CalendarStore};
