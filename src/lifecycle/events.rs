//! Lifecycle events and transition outcomes.

use chrono::{DateTime, Utc};

use crate::models::{Actor, PendingChange, ShiftStatus};

/// An intended transition, named by the triggering action.
///
/// The acting party is passed separately to [`super::apply`]; an event
/// never carries implicit session identity.
#[derive(Debug, Clone, PartialEq)]
pub enum ShiftEvent {
    /// A worker applies to an open shift.
    Apply,
    /// The venue extends an offer to a worker. `direct` offers skip the
    /// applicant-list check.
    ExtendOffer {
        /// The worker the offer targets.
        worker_id: String,
        /// Whether this is a direct offer with no prior application.
        direct: bool,
    },
    /// The offered worker accepts.
    AcceptOffer,
    /// The offered worker declines; the shift reopens.
    DeclineOffer,
    /// The venue proposes a reschedule.
    ProposeChanges(PendingChange),
    /// The worker accepts the pending reschedule.
    AcceptChanges,
    /// The worker declines the pending reschedule.
    DeclineChanges,
    /// Either party cancels before the shift starts.
    Cancel {
        /// The instant the cancellation was requested.
        at: DateTime<Utc>,
    },
    /// The shift's end time has passed.
    MarkCompleted {
        /// The instant of the completion check.
        at: DateTime<Utc>,
    },
    /// The venue finalizes hours and triggers invoicing.
    Finalize,
    /// The payout settled.
    SettlePayout,
    /// The worker submitted their review.
    SubmitReview,
}

impl ShiftEvent {
    /// A short description of the action, used in error messages.
    pub fn action(&self) -> &'static str {
        match self {
            ShiftEvent::Apply => "apply",
            ShiftEvent::ExtendOffer { .. } => "extend an offer",
            ShiftEvent::AcceptOffer => "accept the offer",
            ShiftEvent::DeclineOffer => "decline the offer",
            ShiftEvent::ProposeChanges(_) => "propose changes",
            ShiftEvent::AcceptChanges => "accept changes",
            ShiftEvent::DeclineChanges => "decline changes",
            ShiftEvent::Cancel { .. } => "cancel",
            ShiftEvent::MarkCompleted { .. } => "mark completed",
            ShiftEvent::Finalize => "finalize",
            ShiftEvent::SettlePayout => "settle the payout",
            ShiftEvent::SubmitReview => "submit a review",
        }
    }
}

/// A side effect implied by an applied transition.
///
/// The lifecycle mutates only the shift it was handed; anything touching
/// other records is expressed as an effect for the coordinator to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionEffect {
    /// A new applicant was appended; record an application.
    ApplicantAdded {
        /// The applying worker.
        worker_id: String,
    },
    /// An existing application moved to `offered`.
    ApplicationOffered {
        /// The worker whose application was offered.
        worker_id: String,
    },
    /// Every other pending/offered application on this shift must become
    /// non-actionable, and the accepted worker's application `accepted`.
    SupersedeOtherApplications {
        /// The worker whose offer was accepted.
        accepted_worker: String,
    },
    /// The declining worker's application must become non-actionable.
    ApplicationDeclined {
        /// The worker who declined.
        worker_id: String,
    },
    /// The committed reschedule changed the authoritative times; the
    /// shift's quote must be recomputed.
    ChangesCommitted,
    /// The shift is eligible for settlement.
    ReadyForSettlement,
    /// The finalized invoice payload is due for emission.
    InvoiceDue,
    /// Notify the counterpart actor of the transition. Fire-and-forget.
    Notify {
        /// Who to notify.
        recipient: Actor,
        /// A short event label for the notification payload.
        event: &'static str,
    },
}

/// The result of an applied (or idempotently skipped) transition.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionOutcome {
    /// Status before the event.
    pub from: ShiftStatus,
    /// Status after the event.
    pub to: ShiftStatus,
    /// Side effects for the coordinator to execute.
    pub effects: Vec<TransitionEffect>,
}

impl TransitionOutcome {
    /// Returns true if the event left the shift unchanged (idempotent
    /// re-application).
    pub fn is_noop(&self) -> bool {
        self.from == self.to && self.effects.is_empty()
    }
}
