//! The offer coordinator.
//!
//! Sequences single, direct, and block offers, change requests, and
//! settlement on top of the lifecycle state machine, executing the side
//! effects each transition implies against the shift store.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use crate::calculation::{Quote, billable_hours, quote, resolve_instants};
use crate::config::FeeSchedule;
use crate::error::{EngineError, EngineResult};
use crate::lifecycle::{self, ShiftEvent, TransitionEffect, TransitionOutcome};
use crate::models::{
    Actor, Application, ApplicationStatus, Invoice, InvoiceLine, PendingChange, PromoCode,
    PromoKind, PromoRegistry, Shift, ShiftDraft, ShiftStatus,
};

use super::store::ShiftStore;

/// A fire-and-forget notification to the counterpart of a transition.
///
/// Delivery is an external collaborator's job; the coordinator only
/// collects these and logs them.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    /// The shift the transition happened on.
    pub shift_id: String,
    /// Who should be notified.
    pub recipient: Actor,
    /// Short event label (e.g., "offer_extended").
    pub event: &'static str,
}

/// Coordinates offers, change requests, and settlement across shifts.
///
/// Every public operation is a single synchronous read-modify-write
/// against one shift, except the block operations, which validate all
/// member shifts before mutating any of them.
pub struct OfferCoordinator<S: ShiftStore> {
    store: S,
    fees: FeeSchedule,
    promos: PromoRegistry,
    notifications: Vec<Notification>,
}

impl<S: ShiftStore> OfferCoordinator<S> {
    /// Creates a coordinator over the given store and fee schedule.
    pub fn new(store: S, fees: FeeSchedule) -> Self {
        Self {
            store,
            fees,
            promos: PromoRegistry::new(),
            notifications: Vec::new(),
        }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the fee schedule in use.
    pub fn fees(&self) -> &FeeSchedule {
        &self.fees
    }

    /// Returns the promo registry for seeding codes.
    pub fn promos_mut(&mut self) -> &mut PromoRegistry {
        &mut self.promos
    }

    /// Drains the notifications accumulated since the last drain.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Quotes a set of times and a rate without touching any shift.
    ///
    /// Used by posting forms for projected costs. A promo code, if given,
    /// is redeemed (consumed) as part of the quote; an unknown or used
    /// code fails with `PromoCodeInvalid` rather than silently no-oping.
    pub fn quote_times(
        &mut self,
        start: NaiveTime,
        end: NaiveTime,
        break_minutes: u32,
        hourly_rate: Decimal,
        promo_code: Option<&str>,
    ) -> EngineResult<Quote> {
        let hours = billable_hours(start, end, break_minutes)?;
        let promo = match promo_code {
            Some(code) => Some(self.promos.redeem(code)?),
            None => None,
        };
        Ok(quote(hours, hourly_rate, &self.fees, promo.as_ref()))
    }

    /// Posts a new shift as an open call for applicants.
    pub fn post_shift(&mut self, actor: &Actor, draft: ShiftDraft) -> EngineResult<Shift> {
        let venue_id = expect_venue(actor, "post a shift")?;
        self.check_draft(&draft)?;
        let promo = self.redeem_draft_promo(&draft)?;
        let shift = build_shift(&venue_id, &draft, None, promo.as_ref(), &self.fees)?;
        self.store.insert(shift.clone())?;
        info!(shift_id = %shift.id, venue_id = %venue_id, "shift posted");
        Ok(shift)
    }

    /// Posts a set of shifts as a block, offered and cancelled as a unit.
    ///
    /// All member drafts must share the pay rate and role of the block
    /// unless explicitly marked independent-pay; a mismatch fails with
    /// `BlockMismatch` and nothing is posted.
    pub fn post_block(&mut self, actor: &Actor, drafts: Vec<ShiftDraft>) -> EngineResult<Vec<Shift>> {
        let venue_id = expect_venue(actor, "post a block")?;
        if drafts.is_empty() {
            return Err(EngineError::InvalidShift {
                shift_id: "(block)".to_string(),
                message: "a block needs at least one shift".to_string(),
            });
        }

        let block_id = format!("block_{}", Uuid::new_v4());
        check_block_pay(&block_id, &drafts)?;

        // Validate every draft and promo before posting any member.
        let mut seen_codes: Vec<&str> = Vec::new();
        for draft in &drafts {
            self.check_draft(draft)?;
            if let Some(code) = draft.promo_code.as_deref() {
                self.check_promo_available(code, &seen_codes)?;
                seen_codes.push(code);
            }
        }

        let mut posted = Vec::with_capacity(drafts.len());
        for draft in &drafts {
            let promo = self.redeem_draft_promo(draft)?;
            let shift = build_shift(
                &venue_id,
                draft,
                Some(block_id.clone()),
                promo.as_ref(),
                &self.fees,
            )?;
            self.store.insert(shift.clone())?;
            posted.push(shift);
        }
        info!(block_id = %block_id, members = posted.len(), "block posted");
        Ok(posted)
    }

    /// A worker applies to an open shift. Re-applying is a no-op.
    pub fn apply_to_shift(&mut self, actor: &Actor, shift_id: &str) -> EngineResult<Shift> {
        self.transition(actor, shift_id, ShiftEvent::Apply)
    }

    /// Offers a shift to one of its applicants.
    ///
    /// If `current_rate` is given, the shift is re-quoted at that rate
    /// before the offer goes out (the venue's configured rate may have
    /// changed since the draft was posted).
    pub fn offer_single(
        &mut self,
        actor: &Actor,
        shift_id: &str,
        worker_id: &str,
        current_rate: Option<Decimal>,
    ) -> EngineResult<Shift> {
        let mut shift = self.store.get(shift_id)?;
        if let Some(rate) = current_rate {
            if rate != shift.hourly_rate {
                shift.hourly_rate = rate;
                requote(&mut shift, &self.fees)?;
            }
        }
        let outcome = lifecycle::apply(
            &mut shift,
            actor,
            ShiftEvent::ExtendOffer {
                worker_id: worker_id.to_string(),
                direct: false,
            },
        )?;
        self.store.update(shift.clone())?;
        self.execute_effects(&shift, &outcome);
        Ok(shift)
    }

    /// Creates a shift directly in `offered_to_worker`, skipping the
    /// open-application stage. The quoted cost is frozen at creation.
    pub fn offer_direct(
        &mut self,
        actor: &Actor,
        worker_id: &str,
        draft: ShiftDraft,
    ) -> EngineResult<Shift> {
        let venue_id = expect_venue(actor, "send a direct offer")?;
        self.check_draft(&draft)?;
        let promo = self.redeem_draft_promo(&draft)?;
        let mut shift = build_shift(&venue_id, &draft, None, promo.as_ref(), &self.fees)?;
        let outcome = lifecycle::apply(
            &mut shift,
            actor,
            ShiftEvent::ExtendOffer {
                worker_id: worker_id.to_string(),
                direct: true,
            },
        )?;
        self.store.insert(shift.clone())?;
        self.execute_effects(&shift, &outcome);
        Ok(shift)
    }

    /// Offers every member of a block to the same worker, all-or-nothing.
    ///
    /// If any member already carries a conflicting offer, the whole call
    /// fails with `ConflictingOffer` and no member shift is mutated.
    pub fn offer_block(
        &mut self,
        actor: &Actor,
        block_id: &str,
        worker_id: &str,
    ) -> EngineResult<Vec<Shift>> {
        let members = self.store.by_block(block_id);
        if members.is_empty() {
            return Err(EngineError::BlockMismatch {
                block_id: block_id.to_string(),
                message: "block has no member shifts".to_string(),
            });
        }

        // Phase one: validate every member against a scratch copy.
        let mut staged = Vec::with_capacity(members.len());
        for member in members {
            let mut shift = member;
            let outcome = lifecycle::apply(
                &mut shift,
                actor,
                ShiftEvent::ExtendOffer {
                    worker_id: worker_id.to_string(),
                    direct: true,
                },
            )?;
            staged.push((shift, outcome));
        }

        // Phase two: all members validated; commit.
        let mut offered = Vec::with_capacity(staged.len());
        for (shift, outcome) in staged {
            self.store.update(shift.clone())?;
            self.execute_effects(&shift, &outcome);
            offered.push(shift);
        }
        info!(block_id = %block_id, worker_id = %worker_id, "block offered");
        Ok(offered)
    }

    /// The offered worker accepts; every other application on the shift
    /// becomes non-actionable.
    pub fn accept_offer(&mut self, actor: &Actor, shift_id: &str) -> EngineResult<Shift> {
        self.transition(actor, shift_id, ShiftEvent::AcceptOffer)
    }

    /// The offered worker declines; the shift reopens to other applicants.
    pub fn decline_offer(&mut self, actor: &Actor, shift_id: &str) -> EngineResult<Shift> {
        self.transition(actor, shift_id, ShiftEvent::DeclineOffer)
    }

    /// The venue proposes a reschedule. The authoritative times stay
    /// untouched until the worker responds.
    pub fn request_changes(
        &mut self,
        actor: &Actor,
        shift_id: &str,
        new_date: NaiveDate,
        new_start: NaiveTime,
        new_end: NaiveTime,
        new_break_minutes: u32,
    ) -> EngineResult<Shift> {
        let (start, end) = resolve_instants(new_date, new_start, new_end)?;
        self.transition(
            actor,
            shift_id,
            ShiftEvent::ProposeChanges(PendingChange {
                new_start: start,
                new_end: end,
                new_break_minutes,
            }),
        )
    }

    /// The worker accepts the pending reschedule. The committed times are
    /// re-quoted and the updated quote returned.
    pub fn accept_changes(&mut self, actor: &Actor, shift_id: &str) -> EngineResult<(Shift, Quote)> {
        let mut shift = self.store.get(shift_id)?;
        let outcome = lifecycle::apply(&mut shift, actor, ShiftEvent::AcceptChanges)?;
        let updated_quote = requote(&mut shift, &self.fees)?;
        self.store.update(shift.clone())?;
        self.execute_effects(&shift, &outcome);
        Ok((shift, updated_quote))
    }

    /// The worker declines the pending reschedule; nothing changes.
    pub fn decline_changes(&mut self, actor: &Actor, shift_id: &str) -> EngineResult<Shift> {
        self.transition(actor, shift_id, ShiftEvent::DeclineChanges)
    }

    /// Cancels a shift before its start time.
    ///
    /// For a block member, `cascade_block` (the default behavior callers
    /// should opt out of explicitly) cancels every sibling that is still
    /// in a cancellable pre-start state; siblings that are not are left
    /// alone, since partial-block states are a valid steady state.
    pub fn cancel(
        &mut self,
        actor: &Actor,
        shift_id: &str,
        at: DateTime<Utc>,
        cascade_block: bool,
    ) -> EngineResult<Shift> {
        let shift = self.transition(actor, shift_id, ShiftEvent::Cancel { at })?;

        if cascade_block {
            if let Some(block_id) = shift.block_id.clone() {
                for sibling in self.store.by_block(&block_id) {
                    if sibling.id == shift.id {
                        continue;
                    }
                    let mut sibling_shift = sibling;
                    match lifecycle::apply(&mut sibling_shift, actor, ShiftEvent::Cancel { at }) {
                        Ok(outcome) => {
                            self.store.update(sibling_shift.clone())?;
                            self.execute_effects(&sibling_shift, &outcome);
                        }
                        // Siblings past cancellation stay where they are.
                        Err(_) => continue,
                    }
                }
            }
        }
        Ok(shift)
    }

    /// Marks a confirmed shift completed once its end time has passed.
    /// Time-based; triggered by the system, not by either party.
    pub fn complete(&mut self, shift_id: &str, at: DateTime<Utc>) -> EngineResult<Shift> {
        self.transition(&Actor::System, shift_id, ShiftEvent::MarkCompleted { at })
    }

    /// Finalizes a completed shift's hours and emits the immutable
    /// invoice, using the adjusted hours agreed at settlement when given.
    pub fn finalize(
        &mut self,
        actor: &Actor,
        shift_id: &str,
        adjusted_hours: Option<Decimal>,
        issued_at: DateTime<Utc>,
    ) -> EngineResult<Invoice> {
        let mut shift = self.store.get(shift_id)?;

        let hours = match adjusted_hours {
            Some(h) => h,
            None => billable_hours(
                shift.start_time.time(),
                shift.end_time.time(),
                shift.break_minutes,
            )?,
        };
        let settlement = quote(hours, shift.hourly_rate, &self.fees, fee_waiver(&shift).as_ref());

        let outcome = lifecycle::apply(&mut shift, actor, ShiftEvent::Finalize)?;
        shift.base_pay = settlement.base_pay;
        shift.service_fee = settlement.service_fee;
        shift.total_cost = settlement.total_cost;
        self.store.update(shift.clone())?;
        self.execute_effects(&shift, &outcome);

        let display = settlement.rounded();
        let invoice = Invoice {
            id: format!("inv_{}", Uuid::new_v4()),
            venue_id: shift.venue_id.clone(),
            line_items: vec![InvoiceLine {
                shift_id: shift.id.clone(),
                role: shift.role.clone(),
                date: shift.start_time.date_naive(),
                hours,
                rate: shift.hourly_rate,
                subtotal: display.base_pay,
            }],
            subtotal: display.base_pay,
            service_fee: display.service_fee,
            total: display.total_cost,
            shift_ids: vec![shift.id.clone()],
            issued_at,
        };
        info!(shift_id = %shift.id, invoice_id = %invoice.id, total = %invoice.total, "invoice issued");
        Ok(invoice)
    }

    /// Records that the payout settled; the worker is prompted to review.
    pub fn settle_payout(&mut self, shift_id: &str) -> EngineResult<Shift> {
        self.transition(&Actor::System, shift_id, ShiftEvent::SettlePayout)
    }

    /// The worker submits their review; the shift is fully settled.
    pub fn submit_review(&mut self, actor: &Actor, shift_id: &str) -> EngineResult<Shift> {
        self.transition(actor, shift_id, ShiftEvent::SubmitReview)
    }

    fn transition(
        &mut self,
        actor: &Actor,
        shift_id: &str,
        event: ShiftEvent,
    ) -> EngineResult<Shift> {
        let mut shift = self.store.get(shift_id)?;
        let outcome = lifecycle::apply(&mut shift, actor, event)?;
        self.store.update(shift.clone())?;
        self.execute_effects(&shift, &outcome);
        Ok(shift)
    }

    fn execute_effects(&mut self, shift: &Shift, outcome: &TransitionOutcome) {
        if !outcome.is_noop() {
            info!(
                shift_id = %shift.id,
                from = %outcome.from,
                to = %outcome.to,
                "transition applied"
            );
        }
        for effect in &outcome.effects {
            match effect {
                TransitionEffect::ApplicantAdded { worker_id } => {
                    self.store
                        .record_application(Application::new(&shift.id, worker_id, Utc::now()));
                }
                TransitionEffect::ApplicationOffered { worker_id } => {
                    self.store.set_application_status(
                        &shift.id,
                        worker_id,
                        ApplicationStatus::Offered,
                    );
                }
                TransitionEffect::SupersedeOtherApplications { accepted_worker } => {
                    for app in self.store.applications_for(&shift.id) {
                        let status = if app.worker_id == *accepted_worker {
                            ApplicationStatus::Accepted
                        } else if app.is_actionable() {
                            ApplicationStatus::Rejected
                        } else {
                            continue;
                        };
                        self.store
                            .set_application_status(&shift.id, &app.worker_id, status);
                    }
                }
                TransitionEffect::ApplicationDeclined { worker_id } => {
                    self.store.set_application_status(
                        &shift.id,
                        worker_id,
                        ApplicationStatus::Rejected,
                    );
                }
                // Settlement hand-off and requoting are handled by the
                // operation that triggered the transition.
                TransitionEffect::ChangesCommitted
                | TransitionEffect::ReadyForSettlement
                | TransitionEffect::InvoiceDue => {}
                TransitionEffect::Notify { recipient, event } => {
                    info!(shift_id = %shift.id, recipient = %recipient, event, "notification queued");
                    self.notifications.push(Notification {
                        shift_id: shift.id.clone(),
                        recipient: recipient.clone(),
                        event: *event,
                    });
                }
            }
        }
    }

    fn check_draft(&self, draft: &ShiftDraft) -> EngineResult<()> {
        let (start, end) = resolve_instants(draft.date, draft.start, draft.end)?;
        let gross_minutes = (end - start).num_minutes();
        if i64::from(draft.break_minutes) > gross_minutes {
            return Err(EngineError::InvalidShift {
                shift_id: "(draft)".to_string(),
                message: "break exceeds the shift length".to_string(),
            });
        }
        Ok(())
    }

    // Mirrors every check redeem_draft_promo applies, without consuming,
    // so a failing member cannot leave earlier members posted.
    fn check_promo_available(&self, code: &str, already_claimed: &[&str]) -> EngineResult<()> {
        if already_claimed.contains(&code) {
            return Err(EngineError::PromoCodeInvalid {
                code: code.to_string(),
                reason: "already used".to_string(),
            });
        }
        match self.promos.get(code) {
            None => Err(EngineError::PromoCodeInvalid {
                code: code.to_string(),
                reason: "unknown code".to_string(),
            }),
            Some(promo) if promo.used => Err(EngineError::PromoCodeInvalid {
                code: code.to_string(),
                reason: "already used".to_string(),
            }),
            Some(promo) if promo.kind != PromoKind::FreeShiftPosting => {
                Err(EngineError::PromoCodeInvalid {
                    code: code.to_string(),
                    reason: format!(
                        "code is for {}, not {}",
                        promo.kind.label(),
                        PromoKind::FreeShiftPosting.label()
                    ),
                })
            }
            Some(_) => Ok(()),
        }
    }

    fn redeem_draft_promo(&mut self, draft: &ShiftDraft) -> EngineResult<Option<PromoCode>> {
        match draft.promo_code.as_deref() {
            Some(code) => Ok(Some(
                self.promos.redeem_for(code, PromoKind::FreeShiftPosting)?,
            )),
            None => Ok(None),
        }
    }
}

/// Recomputes a shift's quote from its authoritative times and rate,
/// preserving a fee waiver consumed at posting.
fn requote(shift: &mut Shift, fees: &FeeSchedule) -> EngineResult<Quote> {
    let hours = billable_hours(
        shift.start_time.time(),
        shift.end_time.time(),
        shift.break_minutes,
    )?;
    let q = quote(hours, shift.hourly_rate, fees, fee_waiver(shift).as_ref());
    shift.base_pay = q.base_pay;
    shift.service_fee = q.service_fee;
    shift.total_cost = q.total_cost;
    Ok(q)
}

/// The already-consumed posting promo, reconstructed for requoting.
fn fee_waiver(shift: &Shift) -> Option<PromoCode> {
    shift.promo_code.as_ref().map(|code| PromoCode {
        code: code.clone(),
        kind: PromoKind::FreeShiftPosting,
        description: String::new(),
        used: true,
    })
}

fn build_shift(
    venue_id: &str,
    draft: &ShiftDraft,
    block_id: Option<String>,
    promo: Option<&PromoCode>,
    fees: &FeeSchedule,
) -> EngineResult<Shift> {
    let (start, end) = resolve_instants(draft.date, draft.start, draft.end)?;
    let hours = billable_hours(draft.start, draft.end, draft.break_minutes)?;
    let q = quote(hours, draft.hourly_rate, fees, promo);

    Ok(Shift {
        id: format!("shift_{}", Uuid::new_v4()),
        venue_id: venue_id.to_string(),
        role: draft.role.clone(),
        location: draft.location.clone(),
        description: draft.description.clone(),
        uniform: draft.uniform.clone(),
        requirements: draft.requirements.clone(),
        start_time: start,
        end_time: end,
        break_minutes: draft.break_minutes,
        hourly_rate: draft.hourly_rate,
        base_pay: q.base_pay,
        service_fee: q.service_fee,
        total_cost: q.total_cost,
        promo_code: draft.promo_code.clone(),
        status: ShiftStatus::Posted,
        assigned_worker: None,
        offered_worker: None,
        applicants: vec![],
        block_id,
        independent_pay: draft.independent_pay,
        pending_change: None,
    })
}

fn check_block_pay(block_id: &str, drafts: &[ShiftDraft]) -> EngineResult<()> {
    let mut shared: Option<(&Decimal, &str)> = None;
    for draft in drafts.iter().filter(|d| !d.independent_pay) {
        match shared {
            None => shared = Some((&draft.hourly_rate, &draft.role)),
            Some((rate, role)) => {
                if draft.hourly_rate != *rate || draft.role != role {
                    return Err(EngineError::BlockMismatch {
                        block_id: block_id.to_string(),
                        message: "block members must share pay rate and role unless marked independent pay"
                            .to_string(),
                    });
                }
            }
        }
    }
    Ok(())
}

fn expect_venue(actor: &Actor, action: &str) -> EngineResult<String> {
    match actor {
        Actor::Venue(id) => Ok(id.clone()),
        other => Err(EngineError::UnauthorizedTransition {
            shift_id: "(new)".to_string(),
            actor: other.to_string(),
            action: action.to_string(),
            status: ShiftStatus::Posted,
        }),
    }
}
