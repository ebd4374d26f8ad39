//! Shift model and related types.
//!
//! This module defines the central [`Shift`] entity, its lifecycle status
//! enum, the [`ShiftDraft`] posting form, and the [`PendingChange`] payload
//! used by reschedule proposals.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a shift.
///
/// `Cancelled` and `Paid` are absorbing: no transition is defined out of
/// them. All other statuses are reachable through the transitions in
/// [`crate::lifecycle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftStatus {
    /// Open call for applicants.
    Posted,
    /// An offer is outstanding to a single worker.
    OfferedToWorker,
    /// A worker accepted the offer; the shift is filled.
    Confirmed,
    /// The venue proposed a reschedule awaiting the worker's response.
    PendingChanges,
    /// The shift's end time has passed; eligible for settlement.
    Completed,
    /// Hours finalized and invoice issued; worker pay pending.
    PendingPayment,
    /// Payout settled; the worker is prompted to leave a review.
    PendingWorkerReview,
    /// Review submitted; the shift is fully settled. Terminal.
    Paid,
    /// Cancelled by either party before start. Terminal.
    Cancelled,
}

impl ShiftStatus {
    /// Returns true if no transition is defined out of this status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ShiftStatus::Cancelled | ShiftStatus::Paid)
    }
}

impl fmt::Display for ShiftStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ShiftStatus::Posted => "posted",
            ShiftStatus::OfferedToWorker => "offered_to_worker",
            ShiftStatus::Confirmed => "confirmed",
            ShiftStatus::PendingChanges => "pending_changes",
            ShiftStatus::Completed => "completed",
            ShiftStatus::PendingPayment => "pending_payment",
            ShiftStatus::PendingWorkerReview => "pending_worker_review",
            ShiftStatus::Paid => "paid",
            ShiftStatus::Cancelled => "cancelled",
        };
        write!(f, "{}", s)
    }
}

/// A reschedule proposed by the venue, awaiting worker approval.
///
/// The payload is stored alongside the shift without altering the
/// authoritative start/end/break until the worker accepts it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingChange {
    /// Proposed new start instant.
    pub new_start: DateTime<Utc>,
    /// Proposed new end instant.
    pub new_end: DateTime<Utc>,
    /// Proposed new unpaid break length in minutes.
    pub new_break_minutes: u32,
}

/// A single scheduled work assignment posted by a venue.
///
/// A `Shift` is created in `posted` (open call) or `offered_to_worker`
/// (direct offer) and is mutated only through lifecycle transitions. It is
/// never deleted once any worker has applied or been offered; cancellation
/// is a terminal status, not a deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shift {
    /// Unique identifier for the shift.
    pub id: String,
    /// The venue that owns this shift.
    pub venue_id: String,
    /// Role or category being staffed (e.g., "bartender").
    pub role: String,
    /// Venue location for this shift.
    pub location: String,
    /// Optional free-text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Uniform note shown to the worker.
    #[serde(default)]
    pub uniform: Option<String>,
    /// Requirement tags (e.g., "rsa_certificate").
    #[serde(default)]
    pub requirements: Vec<String>,
    /// Authoritative start instant.
    pub start_time: DateTime<Utc>,
    /// Authoritative end instant.
    pub end_time: DateTime<Utc>,
    /// Unpaid break length in minutes.
    pub break_minutes: u32,
    /// Hourly pay rate offered to the worker.
    pub hourly_rate: Decimal,
    /// Base pay computed from billable hours and the hourly rate.
    pub base_pay: Decimal,
    /// Platform service fee, always derived from base pay.
    pub service_fee: Decimal,
    /// Total cost to the venue.
    pub total_cost: Decimal,
    /// Promo code applied at posting, if any.
    #[serde(default)]
    pub promo_code: Option<String>,
    /// Current lifecycle status.
    pub status: ShiftStatus,
    /// The worker assigned to this shift, once an offer is accepted.
    #[serde(default)]
    pub assigned_worker: Option<String>,
    /// The worker an offer is outstanding to, pending their response.
    #[serde(default)]
    pub offered_worker: Option<String>,
    /// Applicant worker ids in application order, no duplicates.
    #[serde(default)]
    pub applicants: Vec<String>,
    /// Block id linking shifts created together, if any.
    #[serde(default)]
    pub block_id: Option<String>,
    /// Whether this block member may carry its own rate and role.
    #[serde(default)]
    pub independent_pay: bool,
    /// Pending reschedule payload awaiting worker approval, if any.
    #[serde(default)]
    pub pending_change: Option<PendingChange>,
}

impl Shift {
    /// Returns true if the given worker has already applied.
    pub fn has_applicant(&self, worker_id: &str) -> bool {
        self.applicants.iter().any(|w| w == worker_id)
    }
}

/// Form input for posting a shift or extending a direct offer.
///
/// Carries the two clock times exactly as the posting form collects them;
/// the overnight-wrap rule in [`crate::calculation`] resolves them into
/// UTC instants. A shift longer than 24 hours cannot be expressed through
/// this two-clock-time model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftDraft {
    /// The date the shift starts on.
    pub date: NaiveDate,
    /// Start clock time, on a 15-minute boundary.
    pub start: NaiveTime,
    /// End clock time, on a 15-minute boundary. A value at or before
    /// `start` means the shift crosses midnight.
    pub end: NaiveTime,
    /// Unpaid break length in minutes.
    #[serde(default)]
    pub break_minutes: u32,
    /// Hourly pay rate.
    pub hourly_rate: Decimal,
    /// Role or category being staffed.
    pub role: String,
    /// Venue location.
    pub location: String,
    /// Optional free-text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Uniform note.
    #[serde(default)]
    pub uniform: Option<String>,
    /// Requirement tags.
    #[serde(default)]
    pub requirements: Vec<String>,
    /// Promo code to apply to the posting fee, if any.
    #[serde(default)]
    pub promo_code: Option<String>,
    /// Whether this draft opts out of the shared-rate block invariant.
    #[serde(default)]
    pub independent_pay: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_shift() -> Shift {
        Shift {
            id: "shift_001".to_string(),
            venue_id: "venue_001".to_string(),
            role: "bartender".to_string(),
            location: "Surry Hills".to_string(),
            description: None,
            uniform: Some("black shirt".to_string()),
            requirements: vec!["rsa_certificate".to_string()],
            start_time: "2026-03-02T09:00:00Z".parse().unwrap(),
            end_time: "2026-03-02T17:00:00Z".parse().unwrap(),
            break_minutes: 30,
            hourly_rate: dec("25.00"),
            base_pay: dec("187.50"),
            service_fee: dec("22.50"),
            total_cost: dec("210.00"),
            promo_code: None,
            status: ShiftStatus::Posted,
            assigned_worker: None,
            offered_worker: None,
            applicants: vec![],
            block_id: None,
            independent_pay: false,
            pending_change: None,
        }
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(ShiftStatus::Cancelled.is_terminal());
        assert!(ShiftStatus::Paid.is_terminal());
        assert!(!ShiftStatus::Posted.is_terminal());
        assert!(!ShiftStatus::PendingPayment.is_terminal());
    }

    #[test]
    fn test_status_display_matches_wire_form() {
        assert_eq!(ShiftStatus::OfferedToWorker.to_string(), "offered_to_worker");
        assert_eq!(ShiftStatus::PendingWorkerReview.to_string(), "pending_worker_review");
        let json = serde_json::to_string(&ShiftStatus::OfferedToWorker).unwrap();
        assert_eq!(json, "\"offered_to_worker\"");
    }

    #[test]
    fn test_has_applicant() {
        let mut shift = make_shift();
        assert!(!shift.has_applicant("worker_001"));
        shift.applicants.push("worker_001".to_string());
        assert!(shift.has_applicant("worker_001"));
        assert!(!shift.has_applicant("worker_002"));
    }

    #[test]
    fn test_shift_serialization_round_trip() {
        let shift = make_shift();
        let json = serde_json::to_string(&shift).unwrap();
        let back: Shift = serde_json::from_str(&json).unwrap();
        assert_eq!(shift, back);
    }

    #[test]
    fn test_draft_deserialization_with_defaults() {
        let json = r#"{
            "date": "2026-03-02",
            "start": "09:00:00",
            "end": "17:00:00",
            "hourly_rate": "25.00",
            "role": "bartender",
            "location": "Surry Hills"
        }"#;
        let draft: ShiftDraft = serde_json::from_str(json).unwrap();
        assert_eq!(draft.break_minutes, 0);
        assert!(draft.requirements.is_empty());
        assert!(!draft.independent_pay);
    }
}
