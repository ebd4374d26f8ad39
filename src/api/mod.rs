//! HTTP API module for the shift marketplace engine.
//!
//! This module provides the REST API endpoints for quoting, posting,
//! offering, rescheduling, and settling shifts.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    ActorRequest, CancelRequest, ChangeRequest, CompleteRequest, DirectOfferRequest, OfferRequest,
    FinalizeRequest, PostBlockRequest, PostShiftRequest, QuoteRequest, ShiftDraftRequest,
};
pub use response::ApiError;
pub use state::AppState;
