//! Error taxonomy of the booking engine.

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::time::ParseTimeOfDayError;

/// An error produced by the engine.
///
/// The four booking rejections carry the user-facing messages shown to
/// clients; they are terminal for a single operation, leave no partial
/// side effects, and are never retried by the engine itself. The client
/// must resubmit with a different instant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A calendar boundary string does not parse as 24-hour "HH:MM".
    /// Fatal for the operation, not retryable.
    #[error(transparent)]
    InvalidTimeFormat(#[from] ParseTimeOfDayError),

    /// The local datetime does not exist or is ambiguous in the injected
    /// timezone. DST transitions are out of scope.
    #[error("local time {0} is not representable in the calendar timezone")]
    UnrepresentableLocalTime(NaiveDateTime),

    /// Booking attempted on a weekday the calendar does not work.
    #[error("cannot book an appointment because on a non-working day")]
    NonWorkingDay,

    /// Booking attempted before opening or after closing time.
    #[error("cannot book an appointment outside of business hours")]
    OutsideBusinessHours,

    /// Not enough room before the next occupant or the closing time.
    #[error("cannot book at that time")]
    TooLate,

    /// The proposed instant is not on the slot grid anchored to the
    /// preceding occupant.
    #[error("cannot book this time")]
    GridMisaligned,

    /// A reporting query window is malformed.
    #[error("invalid query window: {0}")]
    InvalidQueryWindow(String),
}

impl EngineError {
    /// True for the expected, user-facing booking rejections; false for
    /// configuration or query faults.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::NonWorkingDay | Self::OutsideBusinessHours | Self::TooLate | Self::GridMisaligned
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejections_are_flagged() {
        assert!(EngineError::NonWorkingDay.is_rejection());
        assert!(EngineError::OutsideBusinessHours.is_rejection());
        assert!(EngineError::TooLate.is_rejection());
        assert!(EngineError::GridMisaligned.is_rejection());
        assert!(!EngineError::InvalidQueryWindow("x".into()).is_rejection());
    }

    #[test]
    fn rejection_messages_match_the_service_wording() {
        assert_eq!(
            EngineError::NonWorkingDay.to_string(),
            "cannot book an appointment because on a non-working day"
        );
        assert_eq!(
            EngineError::OutsideBusinessHours.to_string(),
            "cannot book an appointment outside of business hours"
        );
        assert_eq!(EngineError::TooLate.to_string(), "cannot book at that time");
        assert_eq!(EngineError::GridMisaligned.to_string(), "cannot book this time");
    }

    #[test]
    fn parse_errors_convert() {
        let parse = "nope".parse::<crate::time::TimeOfDay>().unwrap_err();
        let err: EngineError = parse.into();
        assert!(matches!(err, EngineError::InvalidTimeFormat(_)));
        assert!(!err.is_rejection());
    }
}
