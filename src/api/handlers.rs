//! HTTP request handlers for the shift marketplace API.
//!
//! This module contains the handler functions for all API endpoints.
//! Each handler parses the request, takes the coordinator lock, runs
//! exactly one coordinator operation, and maps the result to JSON.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use super::request::{
    ActorRequest, CancelRequest, ChangeRequest, CompleteRequest, DirectOfferRequest, OfferRequest,
    FinalizeRequest, PostBlockRequest, PostShiftRequest, QuoteRequest,
};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;
use crate::coordinator::ShiftStore;
use crate::error::EngineError;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/quote", post(quote_handler))
        .route("/shifts", post(post_shift_handler))
        .route("/shifts/:id", get(get_shift_handler))
        .route("/shifts/:id/apply", post(apply_handler))
        .route("/shifts/:id/offer", post(offer_handler))
        .route("/shifts/:id/accept", post(accept_handler))
        .route("/shifts/:id/decline", post(decline_handler))
        .route("/shifts/:id/changes", post(propose_changes_handler))
        .route("/shifts/:id/changes/accept", post(accept_changes_handler))
        .route("/shifts/:id/changes/decline", post(decline_changes_handler))
        .route("/shifts/:id/cancel", post(cancel_handler))
        .route("/shifts/:id/complete", post(complete_handler))
        .route("/shifts/:id/finalize", post(finalize_handler))
        .route("/shifts/:id/settle", post(settle_handler))
        .route("/shifts/:id/review", post(review_handler))
        .route("/offers/direct", post(offer_direct_handler))
        .route("/blocks", post(post_block_handler))
        .route("/blocks/:id/offer", post(offer_block_handler))
        .with_state(state)
}

fn json_ok<T: Serialize>(value: &T) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Json(value),
    )
        .into_response()
}

fn engine_error(correlation_id: Uuid, err: EngineError) -> Response {
    warn!(correlation_id = %correlation_id, error = %err, "Request failed");
    let api_error: ApiErrorResponse = err.into();
    (
        api_error.status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(api_error.error),
    )
        .into_response()
}

fn rejection_error(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries the detailed error from serde
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::new("VALIDATION_ERROR", body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    (
        StatusCode::BAD_REQUEST,
        [(header::CONTENT_TYPE, "application/json")],
        Json(error),
    )
        .into_response()
}

/// Unpacks a parsed JSON body or returns the 400 response to send.
macro_rules! parse {
    ($payload:expr, $correlation_id:expr) => {
        match $payload {
            Ok(Json(req)) => req,
            Err(rejection) => return rejection_error($correlation_id, rejection),
        }
    };
}

/// Handler for POST /quote.
///
/// Quotes a set of times and a rate without creating a shift. A promo
/// code given here is consumed.
async fn quote_handler(
    State(state): State<AppState>,
    payload: Result<Json<QuoteRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = parse!(payload, correlation_id);
    info!(correlation_id = %correlation_id, "Processing quote request");

    let mut coordinator = state.coordinator().lock().await;
    match coordinator.quote_times(
        request.start,
        request.end,
        request.break_minutes,
        request.hourly_rate,
        request.promo_code.as_deref(),
    ) {
        Ok(quote) => json_ok(&quote.rounded()),
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for POST /shifts.
async fn post_shift_handler(
    State(state): State<AppState>,
    payload: Result<Json<PostShiftRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = parse!(payload, correlation_id);
    info!(correlation_id = %correlation_id, "Processing shift posting");

    let mut coordinator = state.coordinator().lock().await;
    match coordinator.post_shift(&request.actor, request.shift.into()) {
        Ok(shift) => json_ok(&shift),
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for GET /shifts/:id.
async fn get_shift_handler(State(state): State<AppState>, Path(shift_id): Path<String>) -> Response {
    let correlation_id = Uuid::new_v4();
    let coordinator = state.coordinator().lock().await;
    match coordinator.store().get(&shift_id) {
        Ok(shift) => json_ok(&shift),
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for POST /shifts/:id/apply.
async fn apply_handler(
    State(state): State<AppState>,
    Path(shift_id): Path<String>,
    payload: Result<Json<ActorRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = parse!(payload, correlation_id);
    info!(correlation_id = %correlation_id, shift_id = %shift_id, "Processing application");

    let mut coordinator = state.coordinator().lock().await;
    match coordinator.apply_to_shift(&request.actor, &shift_id) {
        Ok(shift) => json_ok(&shift),
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for POST /shifts/:id/offer.
async fn offer_handler(
    State(state): State<AppState>,
    Path(shift_id): Path<String>,
    payload: Result<Json<OfferRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = parse!(payload, correlation_id);
    info!(
        correlation_id = %correlation_id,
        shift_id = %shift_id,
        worker_id = %request.worker_id,
        "Processing offer"
    );

    let mut coordinator = state.coordinator().lock().await;
    match coordinator.offer_single(
        &request.actor,
        &shift_id,
        &request.worker_id,
        request.current_rate,
    ) {
        Ok(shift) => json_ok(&shift),
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for POST /offers/direct.
async fn offer_direct_handler(
    State(state): State<AppState>,
    payload: Result<Json<DirectOfferRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = parse!(payload, correlation_id);
    info!(
        correlation_id = %correlation_id,
        worker_id = %request.worker_id,
        "Processing direct offer"
    );

    let mut coordinator = state.coordinator().lock().await;
    match coordinator.offer_direct(&request.actor, &request.worker_id, request.shift.into()) {
        Ok(shift) => json_ok(&shift),
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for POST /shifts/:id/accept.
async fn accept_handler(
    State(state): State<AppState>,
    Path(shift_id): Path<String>,
    payload: Result<Json<ActorRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = parse!(payload, correlation_id);
    let mut coordinator = state.coordinator().lock().await;
    match coordinator.accept_offer(&request.actor, &shift_id) {
        Ok(shift) => json_ok(&shift),
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for POST /shifts/:id/decline.
async fn decline_handler(
    State(state): State<AppState>,
    Path(shift_id): Path<String>,
    payload: Result<Json<ActorRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = parse!(payload, correlation_id);
    let mut coordinator = state.coordinator().lock().await;
    match coordinator.decline_offer(&request.actor, &shift_id) {
        Ok(shift) => json_ok(&shift),
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for POST /shifts/:id/changes.
async fn propose_changes_handler(
    State(state): State<AppState>,
    Path(shift_id): Path<String>,
    payload: Result<Json<ChangeRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = parse!(payload, correlation_id);
    info!(correlation_id = %correlation_id, shift_id = %shift_id, "Processing change proposal");

    let mut coordinator = state.coordinator().lock().await;
    match coordinator.request_changes(
        &request.actor,
        &shift_id,
        request.new_date,
        request.new_start,
        request.new_end,
        request.new_break_minutes,
    ) {
        Ok(shift) => json_ok(&shift),
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for POST /shifts/:id/changes/accept.
///
/// Returns the updated shift together with its recomputed quote.
async fn accept_changes_handler(
    State(state): State<AppState>,
    Path(shift_id): Path<String>,
    payload: Result<Json<ActorRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = parse!(payload, correlation_id);
    let mut coordinator = state.coordinator().lock().await;
    match coordinator.accept_changes(&request.actor, &shift_id) {
        Ok((shift, quote)) => json_ok(&serde_json::json!({
            "shift": shift,
            "quote": quote.rounded(),
        })),
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for POST /shifts/:id/changes/decline.
async fn decline_changes_handler(
    State(state): State<AppState>,
    Path(shift_id): Path<String>,
    payload: Result<Json<ActorRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = parse!(payload, correlation_id);
    let mut coordinator = state.coordinator().lock().await;
    match coordinator.decline_changes(&request.actor, &shift_id) {
        Ok(shift) => json_ok(&shift),
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for POST /shifts/:id/cancel.
async fn cancel_handler(
    State(state): State<AppState>,
    Path(shift_id): Path<String>,
    payload: Result<Json<CancelRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = parse!(payload, correlation_id);
    let at = request.at.unwrap_or_else(Utc::now);
    info!(correlation_id = %correlation_id, shift_id = %shift_id, "Processing cancellation");

    let mut coordinator = state.coordinator().lock().await;
    match coordinator.cancel(&request.actor, &shift_id, at, request.cascade_block) {
        Ok(shift) => json_ok(&shift),
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for POST /shifts/:id/complete.
async fn complete_handler(
    State(state): State<AppState>,
    Path(shift_id): Path<String>,
    payload: Result<Json<CompleteRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = parse!(payload, correlation_id);
    let at = request.at.unwrap_or_else(Utc::now);

    let mut coordinator = state.coordinator().lock().await;
    match coordinator.complete(&shift_id, at) {
        Ok(shift) => json_ok(&shift),
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for POST /shifts/:id/finalize.
///
/// Returns the issued invoice.
async fn finalize_handler(
    State(state): State<AppState>,
    Path(shift_id): Path<String>,
    payload: Result<Json<FinalizeRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = parse!(payload, correlation_id);
    info!(correlation_id = %correlation_id, shift_id = %shift_id, "Processing finalization");

    let mut coordinator = state.coordinator().lock().await;
    match coordinator.finalize(&request.actor, &shift_id, request.adjusted_hours, Utc::now()) {
        Ok(invoice) => json_ok(&invoice),
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for POST /shifts/:id/settle.
async fn settle_handler(State(state): State<AppState>, Path(shift_id): Path<String>) -> Response {
    let correlation_id = Uuid::new_v4();
    let mut coordinator = state.coordinator().lock().await;
    match coordinator.settle_payout(&shift_id) {
        Ok(shift) => json_ok(&shift),
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for POST /shifts/:id/review.
async fn review_handler(
    State(state): State<AppState>,
    Path(shift_id): Path<String>,
    payload: Result<Json<ActorRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = parse!(payload, correlation_id);
    let mut coordinator = state.coordinator().lock().await;
    match coordinator.submit_review(&request.actor, &shift_id) {
        Ok(shift) => json_ok(&shift),
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for POST /blocks.
async fn post_block_handler(
    State(state): State<AppState>,
    payload: Result<Json<PostBlockRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = parse!(payload, correlation_id);
    info!(
        correlation_id = %correlation_id,
        members = request.shifts.len(),
        "Processing block posting"
    );

    let mut coordinator = state.coordinator().lock().await;
    let drafts = request.shifts.into_iter().map(Into::into).collect();
    match coordinator.post_block(&request.actor, drafts) {
        Ok(shifts) => json_ok(&shifts),
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for POST /blocks/:id/offer.
async fn offer_block_handler(
    State(state): State<AppState>,
    Path(block_id): Path<String>,
    payload: Result<Json<OfferRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = parse!(payload, correlation_id);
    info!(
        correlation_id = %correlation_id,
        block_id = %block_id,
        worker_id = %request.worker_id,
        "Processing block offer"
    );

    let mut coordinator = state.coordinator().lock().await;
    match coordinator.offer_block(&request.actor, &block_id, &request.worker_id) {
        Ok(shifts) => json_ok(&shifts),
        Err(err) => engine_error(correlation_id, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use crate::coordinator::{InMemoryShiftStore, OfferCoordinator};
    use crate::models::Shift;
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    fn create_test_state() -> AppState {
        let config = ConfigLoader::load("./config").expect("Failed to load config");
        let coordinator = OfferCoordinator::new(InMemoryShiftStore::new(), config.fees().clone());
        AppState::new(coordinator)
    }

    fn post_json(uri: &str, body: String) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    fn valid_post_body() -> String {
        r#"{
            "actor": {"kind": "venue", "id": "venue_001"},
            "shift": {
                "date": "2026-03-02",
                "start": "09:00:00",
                "end": "17:00:00",
                "break_minutes": 30,
                "hourly_rate": "25.00",
                "role": "bartender",
                "location": "Surry Hills"
            }
        }"#
        .to_string()
    }

    #[tokio::test]
    async fn test_api_001_post_shift_returns_200() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(post_json("/shifts", valid_post_body()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers().get("content-type").unwrap();
        assert_eq!(content_type, "application/json");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let shift: Shift = serde_json::from_slice(&body).unwrap();
        assert_eq!(shift.venue_id, "venue_001");
        assert_eq!(
            shift.total_cost,
            rust_decimal::Decimal::from_str_exact("210").unwrap()
        );
    }

    #[tokio::test]
    async fn test_api_002_malformed_json_returns_400() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(post_json("/shifts", "{invalid json".to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_api_003_missing_field_returns_400() {
        let router = create_router(create_test_state());

        // Missing hourly_rate
        let body = r#"{
            "actor": {"kind": "venue", "id": "venue_001"},
            "shift": {
                "date": "2026-03-02",
                "start": "09:00:00",
                "end": "17:00:00",
                "role": "bartender",
                "location": "Surry Hills"
            }
        }"#;

        let response = router
            .oneshot(post_json("/shifts", body.to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert!(
            error.message.contains("missing field")
                || error.message.to_lowercase().contains("hourly_rate"),
            "Expected error message to mention the missing field, got: {}",
            error.message
        );
    }

    #[tokio::test]
    async fn test_api_004_off_grid_time_returns_400() {
        let router = create_router(create_test_state());

        let body = r#"{
            "start": "09:10:00",
            "end": "17:00:00",
            "hourly_rate": "25.00"
        }"#;

        let response = router
            .oneshot(post_json("/quote", body.to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "INVALID_TIME_GRANULARITY");
    }

    #[tokio::test]
    async fn test_api_005_unknown_shift_returns_404() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/shifts/shift_missing")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
