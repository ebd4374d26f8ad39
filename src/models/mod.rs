//! Domain models for the Shift Lifecycle & Payroll Engine.

mod actor;
mod application;
mod invoice;
mod promo;
mod shift;

pub use actor::Actor;
pub use application::{Application, ApplicationStatus};
pub use invoice::{Invoice, InvoiceLine};
pub use promo::{PromoCode, PromoKind, PromoRegistry};
pub use shift::{PendingChange, Shift, ShiftDraft, ShiftStatus};
