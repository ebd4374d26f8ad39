//! Error types for the Shift Lifecycle & Payroll Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every domain-rule violation the engine can report. Transient
//! infrastructure faults (storage, network) are the persistence layer's
//! concern and never appear here.

use chrono::NaiveTime;
use thiserror::Error;

use crate::models::ShiftStatus;

/// The main error type for the Shift Lifecycle & Payroll Engine.
///
/// All operations in the engine return this error type. Each variant
/// carries enough context (which shift, which actor, which invariant)
/// for a calling UI to explain the failure rather than present a
/// generic message.
///
/// # Example
///
/// ```
/// use shiftmatch_engine::error::EngineError;
///
/// let error = EngineError::ShiftNotFound {
///     shift_id: "shift_001".to_string(),
/// };
/// assert_eq!(error.to_string(), "Shift not found: shift_001");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// A clock time was not on a 15-minute boundary.
    #[error("Invalid time granularity for '{field}': {value} is not on a 15-minute boundary")]
    InvalidTimeGranularity {
        /// Which input field carried the bad time ("start" or "end").
        field: String,
        /// The offending clock time.
        value: NaiveTime,
    },

    /// The acting party is not authorized to trigger the requested transition.
    #[error(
        "Actor '{actor}' is not authorized to {action} on shift '{shift_id}' in status {status}"
    )]
    UnauthorizedTransition {
        /// The shift the transition was attempted on.
        shift_id: String,
        /// A display form of the acting party.
        actor: String,
        /// A short description of the attempted action.
        action: String,
        /// The shift's current status.
        status: ShiftStatus,
    },

    /// A transition was attempted out of an absorbing state.
    #[error(
        "Shift '{shift_id}' is in terminal status {status}: no further transitions are permitted"
    )]
    TerminalStateViolation {
        /// The shift in a terminal state.
        shift_id: String,
        /// The terminal status.
        status: ShiftStatus,
    },

    /// The requested event is not defined from the shift's current status.
    #[error("Cannot {action} on shift '{shift_id}' while in status {status}")]
    InvalidTransition {
        /// The shift the transition was attempted on.
        shift_id: String,
        /// A short description of the attempted action.
        action: String,
        /// The shift's current status.
        status: ShiftStatus,
    },

    /// An offer was attempted while another offer or assignment is outstanding.
    #[error("Shift '{shift_id}' already has an outstanding offer to worker '{offered_to}'")]
    ConflictingOffer {
        /// The shift with the outstanding offer.
        shift_id: String,
        /// The worker the outstanding offer was extended to.
        offered_to: String,
    },

    /// A promo code was unknown, already used, or of the wrong kind.
    #[error("Promo code '{code}' is invalid: {reason}")]
    PromoCodeInvalid {
        /// The code as supplied by the caller.
        code: String,
        /// Why the code could not be applied.
        reason: String,
    },

    /// No shift exists with the given id.
    #[error("Shift not found: {shift_id}")]
    ShiftNotFound {
        /// The id that was not found.
        shift_id: String,
    },

    /// A shift draft or record contained inconsistent data.
    #[error("Invalid shift '{shift_id}': {message}")]
    InvalidShift {
        /// The id of the invalid shift (or draft).
        shift_id: String,
        /// A description of what made the shift invalid.
        message: String,
    },

    /// A block-level invariant was violated.
    #[error("Block '{block_id}' is inconsistent: {message}")]
    BlockMismatch {
        /// The block whose invariant was violated.
        block_id: String,
        /// A description of the violated invariant.
        message: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_time_granularity_displays_field_and_value() {
        let error = EngineError::InvalidTimeGranularity {
            field: "start".to_string(),
            value: NaiveTime::from_hms_opt(9, 10, 0).unwrap(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid time granularity for 'start': 09:10:00 is not on a 15-minute boundary"
        );
    }

    #[test]
    fn test_unauthorized_transition_displays_actor_and_status() {
        let error = EngineError::UnauthorizedTransition {
            shift_id: "shift_001".to_string(),
            actor: "worker:w1".to_string(),
            action: "extend an offer".to_string(),
            status: ShiftStatus::Posted,
        };
        assert_eq!(
            error.to_string(),
            "Actor 'worker:w1' is not authorized to extend an offer on shift 'shift_001' in status posted"
        );
    }

    #[test]
    fn test_terminal_state_violation_displays_status() {
        let error = EngineError::TerminalStateViolation {
            shift_id: "shift_001".to_string(),
            status: ShiftStatus::Cancelled,
        };
        assert_eq!(
            error.to_string(),
            "Shift 'shift_001' is in terminal status cancelled: no further transitions are permitted"
        );
    }

    #[test]
    fn test_conflicting_offer_displays_worker() {
        let error = EngineError::ConflictingOffer {
            shift_id: "shift_001".to_string(),
            offered_to: "worker_007".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Shift 'shift_001' already has an outstanding offer to worker 'worker_007'"
        );
    }

    #[test]
    fn test_promo_code_invalid_displays_reason() {
        let error = EngineError::PromoCodeInvalid {
            code: "FREEJOB".to_string(),
            reason: "already used".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Promo code 'FREEJOB' is invalid: already used"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_shift_not_found() -> EngineResult<()> {
            Err(EngineError::ShiftNotFound {
                shift_id: "missing".to_string(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_shift_not_found()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
