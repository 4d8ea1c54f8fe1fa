//! Service-level errors.

use thiserror::Error;

use slotbook_core::EngineError;
use slotbook_store::StoreError;

/// Errors reported by the booking service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// No calendar carries the requested public identifier.
    #[error("calendar not found")]
    CalendarNotFound,

    /// No appointment carries the requested id.
    #[error("appointment not found")]
    AppointmentNotFound,

    /// A reporting query asked for an unreasonable window.
    #[error("invalid query window: {0}")]
    InvalidWindow(String),

    /// The engine rejected the request.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    /// Returns true for rejections of a well-formed request, as opposed
    /// to infrastructure failures.
    pub fn is_rejection(&self) -> bool {
        match self {
            Self::CalendarNotFound | Self::AppointmentNotFound | Self::InvalidWindow(_) => true,
            Self::Engine(err) => err.is_rejection(),
            Self::Store(_) => false,
        }
    }
}

/// A specialized Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calendar_not_found_message() {
        assert_eq!(ServiceError::CalendarNotFound.to_string(), "calendar not found");
    }

    #[test]
    fn engine_rejections_pass_through() {
        let err = ServiceError::from(EngineError::TooLate);
        assert!(err.is_rejection());
        assert_eq!(err.to_string(), "cannot book at that time");
    }

    #[test]
    fn store_failures_are_not_rejections() {
        let err = ServiceError::from(StoreError::internal("mutex poisoned"));
        assert!(!err.is_rejection());
    }
}
