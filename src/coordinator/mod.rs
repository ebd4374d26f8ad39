//! Offer coordination on top of the lifecycle state machine.
//!
//! The coordinator sequences multi-step operations that combine lifecycle
//! transitions with cost computation, and enforces cross-shift invariants
//! the single-shift state machine cannot see (block atomicity, shared
//! block pay, application supersession).

mod offers;
mod store;

pub use offers::{Notification, OfferCoordinator};
pub use store::{InMemoryShiftStore, ShiftStore};
