//! The authoritative shift status state machine.
//!
//! This module defines the valid statuses, the permitted transitions, the
//! actor allowed to trigger each transition, and the side effects each
//! transition implies. Cross-shift concerns (block cascades, application
//! records, invoicing) live in [`crate::coordinator`], which executes the
//! effects this module returns.

mod events;
mod machine;

pub use events::{ShiftEvent, TransitionEffect, TransitionOutcome};
pub use machine::apply;
