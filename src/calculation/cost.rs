//! Shift cost and job-posting fee quoting.
//!
//! Turns billable hours and an hourly rate into base pay, platform
//! service fee, optional promo-code discount, and total cost. The same
//! function is used when a venue drafts a shift (projected cost), when an
//! offer is extended (locked cost shown to the worker), and when an
//! invoice is finalized (actual cost at the adjusted settlement hours).

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::config::{FeeSchedule, JobPostingFees};
use crate::models::{PromoCode, PromoKind};

/// A monetary quote for a single shift.
///
/// All intermediate arithmetic is performed at full `Decimal` precision
/// so that rounding error does not compound across the shifts of a block;
/// call [`Quote::rounded`] at the point of display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Billable hours the quote covers.
    pub hours: Decimal,
    /// Hourly rate applied.
    pub hourly_rate: Decimal,
    /// `hours * hourly_rate`.
    pub base_pay: Decimal,
    /// Platform commission, derived from base pay.
    pub service_fee: Decimal,
    /// Promo-code discount, zero when no code was applied.
    pub discount: Decimal,
    /// `base_pay + service_fee - discount`, floored at zero.
    pub total_cost: Decimal,
}

impl Quote {
    /// Returns a copy with every monetary field rounded to cents
    /// (half-up). Hours are left untouched.
    pub fn rounded(&self) -> Quote {
        Quote {
            hours: self.hours,
            hourly_rate: self.hourly_rate,
            base_pay: round_cents(self.base_pay),
            service_fee: round_cents(self.service_fee),
            discount: round_cents(self.discount),
            total_cost: round_cents(self.total_cost),
        }
    }
}

/// Rounds a monetary amount to cents using half-up rounding.
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Produces a cost quote for a shift.
///
/// `service_fee = base_pay * fees.shift.service_fee_rate`. Promo
/// application is kind-directed: a `free_shift_posting` code zeroes the
/// service-fee component; a `free_job_posting` code zeroes the entire
/// transaction total (a job-posting charge is all fee). Promo validation
/// and single-use consumption happen in
/// [`PromoRegistry::redeem`](crate::models::PromoRegistry::redeem) before
/// the redeemed code reaches this function.
///
/// # Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
/// use shiftmatch_engine::calculation::quote;
/// use shiftmatch_engine::config::{FeeSchedule, JobPostingFees, ShiftFees};
///
/// let fees = FeeSchedule {
///     shift: ShiftFees { service_fee_rate: Decimal::from_str("0.12").unwrap() },
///     job_posting: JobPostingFees {
///         listing_fee: Decimal::from_str("49.00").unwrap(),
///         weekly_rate: Decimal::from_str("0.05").unwrap(),
///     },
/// };
/// let q = quote(
///     Decimal::from_str("7.5").unwrap(),
///     Decimal::from_str("25").unwrap(),
///     &fees,
///     None,
/// );
/// assert_eq!(q.total_cost, Decimal::from_str("210.00").unwrap());
/// ```
pub fn quote(
    hours: Decimal,
    hourly_rate: Decimal,
    fees: &FeeSchedule,
    promo: Option<&PromoCode>,
) -> Quote {
    let base_pay = hours * hourly_rate;
    let service_fee = base_pay * fees.shift.service_fee_rate;
    let gross_total = base_pay + service_fee;

    let discount = match promo.map(|p| p.kind) {
        Some(PromoKind::FreeShiftPosting) => service_fee,
        Some(PromoKind::FreeJobPosting) => gross_total,
        None => Decimal::ZERO,
    };

    let total_cost = (gross_total - discount).max(Decimal::ZERO);

    Quote {
        hours,
        hourly_rate,
        base_pay,
        service_fee,
        discount,
        total_cost,
    }
}

/// A fee quote for a permanent-job posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPostingQuote {
    /// Flat listing fee.
    pub listing_fee: Decimal,
    /// Percentage fee on the role's weekly cost.
    pub weekly_fee: Decimal,
    /// Promo-code discount, zero when no code was applied.
    pub discount: Decimal,
    /// `listing_fee + weekly_fee - discount`, floored at zero.
    pub total: Decimal,
}

/// Produces the fee quote for a permanent-job posting.
///
/// Job postings use a flat-fee-plus-percentage schedule distinct from the
/// shift service fee: `total = listing_fee + weekly_cost * weekly_rate`.
/// A `free_job_posting` promo zeroes the whole charge.
pub fn job_posting_quote(
    weekly_cost: Decimal,
    fees: &JobPostingFees,
    promo: Option<&PromoCode>,
) -> JobPostingQuote {
    let listing_fee = fees.listing_fee;
    let weekly_fee = weekly_cost * fees.weekly_rate;
    let gross_total = listing_fee + weekly_fee;

    let discount = match promo.map(|p| p.kind) {
        Some(PromoKind::FreeJobPosting) => gross_total,
        Some(PromoKind::FreeShiftPosting) | None => Decimal::ZERO,
    };

    JobPostingQuote {
        listing_fee,
        weekly_fee,
        discount,
        total: (gross_total - discount).max(Decimal::ZERO),
    }
}
