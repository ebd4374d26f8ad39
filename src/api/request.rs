//! Request types for the shift marketplace API.
//!
//! This module defines the JSON request structures for the posting,
//! offering, rescheduling, and settlement endpoints. Every mutating
//! request names its acting party explicitly; the engine never infers
//! identity from transport-level session data.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Actor, ShiftDraft};

/// Request body for the `/quote` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteRequest {
    /// Shift start clock time.
    pub start: NaiveTime,
    /// Shift end clock time. An end at or before the start is read as
    /// the following day.
    pub end: NaiveTime,
    /// Unpaid break, in minutes.
    #[serde(default)]
    pub break_minutes: u32,
    /// The hourly rate to quote at.
    pub hourly_rate: Decimal,
    /// Optional promo code. Quoting with a code consumes it.
    #[serde(default)]
    pub promo_code: Option<String>,
}

/// A shift draft as submitted by a venue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftDraftRequest {
    /// The calendar date the shift starts on.
    pub date: NaiveDate,
    /// Start clock time.
    pub start: NaiveTime,
    /// End clock time; at or before the start means the following day.
    pub end: NaiveTime,
    /// Unpaid break, in minutes.
    #[serde(default)]
    pub break_minutes: u32,
    /// Hourly rate for the shift.
    pub hourly_rate: Decimal,
    /// The role being staffed (e.g., "bartender").
    pub role: String,
    /// Where the shift takes place.
    pub location: String,
    /// Free-text description shown to workers.
    #[serde(default)]
    pub description: Option<String>,
    /// Uniform requirements, if any.
    #[serde(default)]
    pub uniform: Option<String>,
    /// Certifications or other requirements.
    #[serde(default)]
    pub requirements: Vec<String>,
    /// Optional single-use promo code to apply at posting.
    #[serde(default)]
    pub promo_code: Option<String>,
    /// For block members: opt this shift out of the shared-pay rule.
    #[serde(default)]
    pub independent_pay: bool,
}

/// Request body for `POST /shifts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostShiftRequest {
    /// The posting venue.
    pub actor: Actor,
    /// The shift to post.
    pub shift: ShiftDraftRequest,
}

/// Request body for `POST /blocks`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostBlockRequest {
    /// The posting venue.
    pub actor: Actor,
    /// The member shifts of the block.
    pub shifts: Vec<ShiftDraftRequest>,
}

/// Request body for endpoints that need only the acting party
/// (apply, accept, decline, review).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorRequest {
    /// The acting party.
    pub actor: Actor,
}

/// Request body for `POST /shifts/:id/offer` and `POST /blocks/:id/offer`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferRequest {
    /// The offering venue.
    pub actor: Actor,
    /// The worker the offer targets.
    pub worker_id: String,
    /// The venue's current rate; when it differs from the posted rate
    /// the shift is re-quoted before the offer goes out. Ignored for
    /// block offers.
    #[serde(default)]
    pub current_rate: Option<Decimal>,
}

/// Request body for creating a shift directly in the offered state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectOfferRequest {
    /// The offering venue.
    pub actor: Actor,
    /// The worker the direct offer targets.
    pub worker_id: String,
    /// The shift to create.
    pub shift: ShiftDraftRequest,
}

/// Request body for `POST /shifts/:id/changes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeRequest {
    /// The proposing venue.
    pub actor: Actor,
    /// Proposed new date.
    pub new_date: NaiveDate,
    /// Proposed new start time.
    pub new_start: NaiveTime,
    /// Proposed new end time.
    pub new_end: NaiveTime,
    /// Proposed new unpaid break, in minutes.
    #[serde(default)]
    pub new_break_minutes: u32,
}

/// Request body for `POST /shifts/:id/cancel`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelRequest {
    /// The cancelling party.
    pub actor: Actor,
    /// When the cancellation was requested; defaults to now.
    #[serde(default)]
    pub at: Option<DateTime<Utc>>,
    /// Whether to cancel block siblings too; defaults to true.
    #[serde(default = "default_cascade")]
    pub cascade_block: bool,
}

fn default_cascade() -> bool {
    true
}

/// Request body for `POST /shifts/:id/complete`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteRequest {
    /// The instant of the completion check; defaults to now.
    #[serde(default)]
    pub at: Option<DateTime<Utc>>,
}

/// Request body for `POST /shifts/:id/finalize`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalizeRequest {
    /// The finalizing venue.
    pub actor: Actor,
    /// Hours agreed at settlement when they differ from the scheduled
    /// hours (e.g., the worker stayed late).
    #[serde(default)]
    pub adjusted_hours: Option<Decimal>,
}

impl From<ShiftDraftRequest> for ShiftDraft {
    fn from(req: ShiftDraftRequest) -> Self {
        ShiftDraft {
            date: req.date,
            start: req.start,
            end: req.end,
            break_minutes: req.break_minutes,
            hourly_rate: req.hourly_rate,
            role: req.role,
            location: req.location,
            description: req.description,
            uniform: req.uniform,
            requirements: req.requirements,
            promo_code: req.promo_code,
            independent_pay: req.independent_pay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_deserialize_post_shift_request() {
        let json = r#"{
            "actor": {"kind": "venue", "id": "venue_001"},
            "shift": {
                "date": "2026-03-02",
                "start": "09:00:00",
                "end": "17:00:00",
                "break_minutes": 30,
                "hourly_rate": "25.00",
                "role": "bartender",
                "location": "Surry Hills"
            }
        }"#;

        let request: PostShiftRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.actor, Actor::Venue("venue_001".to_string()));
        assert_eq!(request.shift.break_minutes, 30);
        assert_eq!(request.shift.hourly_rate, Decimal::from_str("25.00").unwrap());
        assert_eq!(request.shift.promo_code, None);
        assert!(!request.shift.independent_pay);
    }

    #[test]
    fn test_draft_conversion() {
        let req = ShiftDraftRequest {
            date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            start: NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
            end: NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
            break_minutes: 0,
            hourly_rate: Decimal::from_str("30").unwrap(),
            role: "security".to_string(),
            location: "Newtown".to_string(),
            description: None,
            uniform: None,
            requirements: vec!["rsa".to_string()],
            promo_code: None,
            independent_pay: false,
        };

        let draft: ShiftDraft = req.into();
        assert_eq!(draft.role, "security");
        assert_eq!(draft.requirements, vec!["rsa".to_string()]);
    }

    #[test]
    fn test_cancel_request_defaults_to_cascade() {
        let json = r#"{"actor": {"kind": "venue", "id": "venue_001"}}"#;
        let request: CancelRequest = serde_json::from_str(json).unwrap();
        assert!(request.cascade_block);
        assert_eq!(request.at, None);
    }
}
