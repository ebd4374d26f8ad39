//! Transition validation and application.
//!
//! [`apply`] is the single entry point: it validates that the event is
//! defined from the shift's current status, that the acting party is
//! authorized for that edge, and that the edge's guards hold, then
//! mutates the shift and returns the implied side effects.

use crate::error::{EngineError, EngineResult};
use crate::models::{Actor, PendingChange, Shift, ShiftStatus};

use super::events::{ShiftEvent, TransitionEffect, TransitionOutcome};

/// Applies a lifecycle event to a shift on behalf of an actor.
///
/// Checks, in order: the shift is not in an absorbing state
/// (`TerminalStateViolation`), the event is defined from the current
/// status (`InvalidTransition`), the actor is authorized for the edge
/// (`UnauthorizedTransition`), and the edge's guards hold
/// (`ConflictingOffer`, timing rules). The offer edge is the one
/// exception to that order: an outstanding offer or assignment reports
/// `ConflictingOffer` ahead of the status check, so the caller learns
/// which invariant blocked it. Failures never mutate the shift.
///
/// Re-applying by a worker already on the applicant list is an idempotent
/// no-op, not an error.
pub fn apply(shift: &mut Shift, actor: &Actor, event: ShiftEvent) -> EngineResult<TransitionOutcome> {
    if shift.status.is_terminal() {
        return Err(EngineError::TerminalStateViolation {
            shift_id: shift.id.clone(),
            status: shift.status,
        });
    }

    let action = event.action();
    match event {
        ShiftEvent::Apply => worker_applies(shift, actor, action),
        ShiftEvent::ExtendOffer { worker_id, direct } => {
            venue_extends_offer(shift, actor, &worker_id, direct, action)
        }
        ShiftEvent::AcceptOffer => worker_accepts_offer(shift, actor, action),
        ShiftEvent::DeclineOffer => worker_declines_offer(shift, actor, action),
        ShiftEvent::ProposeChanges(change) => venue_proposes_changes(shift, actor, change, action),
        ShiftEvent::AcceptChanges => worker_accepts_changes(shift, actor, action),
        ShiftEvent::DeclineChanges => worker_declines_changes(shift, actor, action),
        ShiftEvent::Cancel { at } => party_cancels(shift, actor, at, action),
        ShiftEvent::MarkCompleted { at } => system_marks_completed(shift, actor, at, action),
        ShiftEvent::Finalize => venue_finalizes(shift, actor, action),
        ShiftEvent::SettlePayout => system_settles_payout(shift, actor, action),
        ShiftEvent::SubmitReview => worker_submits_review(shift, actor, action),
    }
}

fn worker_applies(
    shift: &mut Shift,
    actor: &Actor,
    action: &'static str,
) -> EngineResult<TransitionOutcome> {
    require_status(shift, ShiftStatus::Posted, action)?;
    let worker_id = match actor {
        Actor::Worker(id) => id.clone(),
        _ => return Err(unauthorized(shift, actor, action)),
    };

    // Re-applying is a no-op, not an error.
    if shift.has_applicant(&worker_id) {
        return Ok(outcome(shift.status, shift.status, vec![]));
    }

    shift.applicants.push(worker_id.clone());
    Ok(outcome(
        ShiftStatus::Posted,
        ShiftStatus::Posted,
        vec![
            TransitionEffect::ApplicantAdded {
                worker_id: worker_id.clone(),
            },
            TransitionEffect::Notify {
                recipient: Actor::Venue(shift.venue_id.clone()),
                event: "worker_applied",
            },
        ],
    ))
}

fn venue_extends_offer(
    shift: &mut Shift,
    actor: &Actor,
    worker_id: &str,
    direct: bool,
    action: &'static str,
) -> EngineResult<TransitionOutcome> {
    // An outstanding offer or assignment conflicts with a new offer
    // regardless of the shift's current status.
    if let Some(outstanding) = outstanding_worker(shift) {
        return Err(EngineError::ConflictingOffer {
            shift_id: shift.id.clone(),
            offered_to: outstanding,
        });
    }
    if !matches!(
        shift.status,
        ShiftStatus::Posted | ShiftStatus::OfferedToWorker
    ) {
        return Err(invalid_transition(shift, action));
    }
    if !actor.is_venue(&shift.venue_id) {
        return Err(unauthorized(shift, actor, action));
    }
    if !direct && !shift.has_applicant(worker_id) {
        return Err(EngineError::InvalidShift {
            shift_id: shift.id.clone(),
            message: format!("worker '{}' has not applied to this shift", worker_id),
        });
    }

    let from = shift.status;
    shift.offered_worker = Some(worker_id.to_string());
    shift.status = ShiftStatus::OfferedToWorker;

    let mut effects = vec![];
    if shift.has_applicant(worker_id) {
        effects.push(TransitionEffect::ApplicationOffered {
            worker_id: worker_id.to_string(),
        });
    }
    effects.push(TransitionEffect::Notify {
        recipient: Actor::Worker(worker_id.to_string()),
        event: "offer_extended",
    });
    Ok(outcome(from, ShiftStatus::OfferedToWorker, effects))
}

fn worker_accepts_offer(
    shift: &mut Shift,
    actor: &Actor,
    action: &'static str,
) -> EngineResult<TransitionOutcome> {
    require_status(shift, ShiftStatus::OfferedToWorker, action)?;
    let offered = offered_worker(shift)?;
    if !actor.is_worker(&offered) {
        return Err(unauthorized(shift, actor, action));
    }

    shift.offered_worker = None;
    shift.assigned_worker = Some(offered.clone());
    shift.status = ShiftStatus::Confirmed;
    Ok(outcome(
        ShiftStatus::OfferedToWorker,
        ShiftStatus::Confirmed,
        vec![
            TransitionEffect::SupersedeOtherApplications {
                accepted_worker: offered,
            },
            TransitionEffect::Notify {
                recipient: Actor::Venue(shift.venue_id.clone()),
                event: "offer_accepted",
            },
        ],
    ))
}

fn worker_declines_offer(
    shift: &mut Shift,
    actor: &Actor,
    action: &'static str,
) -> EngineResult<TransitionOutcome> {
    require_status(shift, ShiftStatus::OfferedToWorker, action)?;
    let offered = offered_worker(shift)?;
    if !actor.is_worker(&offered) {
        return Err(unauthorized(shift, actor, action));
    }

    // The shift reopens to the remaining applicants.
    shift.offered_worker = None;
    shift.status = ShiftStatus::Posted;
    Ok(outcome(
        ShiftStatus::OfferedToWorker,
        ShiftStatus::Posted,
        vec![
            TransitionEffect::ApplicationDeclined { worker_id: offered },
            TransitionEffect::Notify {
                recipient: Actor::Venue(shift.venue_id.clone()),
                event: "offer_declined",
            },
        ],
    ))
}

fn venue_proposes_changes(
    shift: &mut Shift,
    actor: &Actor,
    change: PendingChange,
    action: &'static str,
) -> EngineResult<TransitionOutcome> {
    require_status(shift, ShiftStatus::Confirmed, action)?;
    if !actor.is_venue(&shift.venue_id) {
        return Err(unauthorized(shift, actor, action));
    }
    if change.new_end <= change.new_start {
        return Err(EngineError::InvalidShift {
            shift_id: shift.id.clone(),
            message: "proposed end must be after proposed start".to_string(),
        });
    }
    let gross_minutes = (change.new_end - change.new_start).num_minutes();
    if i64::from(change.new_break_minutes) > gross_minutes {
        return Err(EngineError::InvalidShift {
            shift_id: shift.id.clone(),
            message: "proposed break exceeds the proposed shift length".to_string(),
        });
    }

    let worker = assigned_worker(shift)?;
    // Authoritative times stay untouched until the worker accepts.
    shift.pending_change = Some(change);
    shift.status = ShiftStatus::PendingChanges;
    Ok(outcome(
        ShiftStatus::Confirmed,
        ShiftStatus::PendingChanges,
        vec![TransitionEffect::Notify {
            recipient: Actor::Worker(worker),
            event: "changes_proposed",
        }],
    ))
}

fn worker_accepts_changes(
    shift: &mut Shift,
    actor: &Actor,
    action: &'static str,
) -> EngineResult<TransitionOutcome> {
    require_status(shift, ShiftStatus::PendingChanges, action)?;
    let worker = assigned_worker(shift)?;
    if !actor.is_worker(&worker) {
        return Err(unauthorized(shift, actor, action));
    }
    let change = shift
        .pending_change
        .take()
        .ok_or_else(|| EngineError::InvalidShift {
            shift_id: shift.id.clone(),
            message: "no pending change payload to accept".to_string(),
        })?;

    shift.start_time = change.new_start;
    shift.end_time = change.new_end;
    shift.break_minutes = change.new_break_minutes;
    shift.status = ShiftStatus::Confirmed;
    Ok(outcome(
        ShiftStatus::PendingChanges,
        ShiftStatus::Confirmed,
        vec![
            TransitionEffect::ChangesCommitted,
            TransitionEffect::Notify {
                recipient: Actor::Venue(shift.venue_id.clone()),
                event: "changes_accepted",
            },
        ],
    ))
}

fn worker_declines_changes(
    shift: &mut Shift,
    actor: &Actor,
    action: &'static str,
) -> EngineResult<TransitionOutcome> {
    require_status(shift, ShiftStatus::PendingChanges, action)?;
    let worker = assigned_worker(shift)?;
    if !actor.is_worker(&worker) {
        return Err(unauthorized(shift, actor, action));
    }

    // Discard the payload; authoritative times are unchanged.
    shift.pending_change = None;
    shift.status = ShiftStatus::Confirmed;
    Ok(outcome(
        ShiftStatus::PendingChanges,
        ShiftStatus::Confirmed,
        vec![TransitionEffect::Notify {
            recipient: Actor::Venue(shift.venue_id.clone()),
            event: "changes_declined",
        }],
    ))
}

fn party_cancels(
    shift: &mut Shift,
    actor: &Actor,
    at: chrono::DateTime<chrono::Utc>,
    action: &'static str,
) -> EngineResult<TransitionOutcome> {
    if !matches!(
        shift.status,
        ShiftStatus::Posted
            | ShiftStatus::OfferedToWorker
            | ShiftStatus::Confirmed
            | ShiftStatus::PendingChanges
    ) {
        return Err(invalid_transition(shift, action));
    }

    let authorized = actor.is_venue(&shift.venue_id)
        || shift
            .assigned_worker
            .as_deref()
            .is_some_and(|w| actor.is_worker(w));
    if !authorized {
        return Err(unauthorized(shift, actor, action));
    }
    if at >= shift.start_time {
        return Err(EngineError::InvalidTransition {
            shift_id: shift.id.clone(),
            action: "cancel after the shift's start time".to_string(),
            status: shift.status,
        });
    }

    let from = shift.status;
    shift.status = ShiftStatus::Cancelled;

    // Notify whichever party did not initiate the cancellation.
    let counterpart = if actor.is_venue(&shift.venue_id) {
        shift
            .assigned_worker
            .as_ref()
            .or(shift.offered_worker.as_ref())
            .map(|w| Actor::Worker(w.clone()))
    } else {
        Some(Actor::Venue(shift.venue_id.clone()))
    };
    let effects = counterpart
        .map(|recipient| {
            vec![TransitionEffect::Notify {
                recipient,
                event: "shift_cancelled",
            }]
        })
        .unwrap_or_default();
    Ok(outcome(from, ShiftStatus::Cancelled, effects))
}

fn system_marks_completed(
    shift: &mut Shift,
    actor: &Actor,
    at: chrono::DateTime<chrono::Utc>,
    action: &'static str,
) -> EngineResult<TransitionOutcome> {
    require_status(shift, ShiftStatus::Confirmed, action)?;
    if !actor.is_system() {
        return Err(unauthorized(shift, actor, action));
    }
    if at < shift.end_time {
        return Err(EngineError::InvalidTransition {
            shift_id: shift.id.clone(),
            action: "mark completed before the shift's end time".to_string(),
            status: shift.status,
        });
    }

    shift.status = ShiftStatus::Completed;
    Ok(outcome(
        ShiftStatus::Confirmed,
        ShiftStatus::Completed,
        vec![
            TransitionEffect::ReadyForSettlement,
            TransitionEffect::Notify {
                recipient: Actor::Venue(shift.venue_id.clone()),
                event: "shift_completed",
            },
        ],
    ))
}

fn venue_finalizes(
    shift: &mut Shift,
    actor: &Actor,
    action: &'static str,
) -> EngineResult<TransitionOutcome> {
    require_status(shift, ShiftStatus::Completed, action)?;
    if !actor.is_venue(&shift.venue_id) {
        return Err(unauthorized(shift, actor, action));
    }
    let worker = assigned_worker(shift)?;

    shift.status = ShiftStatus::PendingPayment;
    Ok(outcome(
        ShiftStatus::Completed,
        ShiftStatus::PendingPayment,
        vec![
            TransitionEffect::InvoiceDue,
            TransitionEffect::Notify {
                recipient: Actor::Worker(worker),
                event: "hours_finalized",
            },
        ],
    ))
}

fn system_settles_payout(
    shift: &mut Shift,
    actor: &Actor,
    action: &'static str,
) -> EngineResult<TransitionOutcome> {
    require_status(shift, ShiftStatus::PendingPayment, action)?;
    if !actor.is_system() {
        return Err(unauthorized(shift, actor, action));
    }
    let worker = assigned_worker(shift)?;

    shift.status = ShiftStatus::PendingWorkerReview;
    Ok(outcome(
        ShiftStatus::PendingPayment,
        ShiftStatus::PendingWorkerReview,
        vec![TransitionEffect::Notify {
            recipient: Actor::Worker(worker),
            event: "payout_settled",
        }],
    ))
}

fn worker_submits_review(
    shift: &mut Shift,
    actor: &Actor,
    action: &'static str,
) -> EngineResult<TransitionOutcome> {
    require_status(shift, ShiftStatus::PendingWorkerReview, action)?;
    let worker = assigned_worker(shift)?;
    if !actor.is_worker(&worker) {
        return Err(unauthorized(shift, actor, action));
    }

    shift.status = ShiftStatus::Paid;
    Ok(outcome(
        ShiftStatus::PendingWorkerReview,
        ShiftStatus::Paid,
        vec![TransitionEffect::Notify {
            recipient: Actor::Venue(shift.venue_id.clone()),
            event: "review_submitted",
        }],
    ))
}

fn require_status(shift: &Shift, expected: ShiftStatus, action: &str) -> EngineResult<()> {
    if shift.status != expected {
        return Err(EngineError::InvalidTransition {
            shift_id: shift.id.clone(),
            action: action.to_string(),
            status: shift.status,
        });
    }
    Ok(())
}

fn invalid_transition(shift: &Shift, action: &str) -> EngineError {
    EngineError::InvalidTransition {
        shift_id: shift.id.clone(),
        action: action.to_string(),
        status: shift.status,
    }
}

fn unauthorized(shift: &Shift, actor: &Actor, action: &str) -> EngineError {
    EngineError::UnauthorizedTransition {
        shift_id: shift.id.clone(),
        actor: actor.to_string(),
        action: action.to_string(),
        status: shift.status,
    }
}

/// The worker an offer or assignment is outstanding to, if any.
fn outstanding_worker(shift: &Shift) -> Option<String> {
    shift
        .offered_worker
        .clone()
        .or_else(|| shift.assigned_worker.clone())
}

fn offered_worker(shift: &Shift) -> EngineResult<String> {
    shift
        .offered_worker
        .clone()
        .ok_or_else(|| EngineError::InvalidShift {
            shift_id: shift.id.clone(),
            message: "no outstanding offer on this shift".to_string(),
        })
}

fn assigned_worker(shift: &Shift) -> EngineResult<String> {
    shift
        .assigned_worker
        .clone()
        .ok_or_else(|| EngineError::InvalidShift {
            shift_id: shift.id.clone(),
            message: "no worker is assigned to this shift".to_string(),
        })
}

fn outcome(from: ShiftStatus, to: ShiftStatus, effects: Vec<TransitionEffect>) -> TransitionOutcome {
    TransitionOutcome { from, to, effects }
}
