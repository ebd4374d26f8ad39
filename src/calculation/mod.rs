//! Calculation logic for the Shift Lifecycle & Payroll Engine.
//!
//! This module contains the pure calculation functions: billable-hours
//! computation from clock times with overnight-wrap inference, instant
//! resolution for posting forms, shift cost quoting with service fees and
//! promo-code discounts, and the job-posting fee quote.

mod cost;
mod duration;

pub use cost::{JobPostingQuote, Quote, job_posting_quote, quote, round_cents};
pub use duration::{billable_hours, resolve_instants};
