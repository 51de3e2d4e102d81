//! Lifecycle transitions of an event.
//!
//! Each handler maps one engine transition; the engine serializes them per
//! event, so concurrent calls from two dashboards are safe.

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use kanau::processor::Processor;
use santa_core::exchange::{CloseRegistration, GenerateAssignments, OpenReveal, ResetAssignments};
use santa_sdk::objects::admin::{GenerateAssignmentsResponse, ResetAssignmentsResponse};

use crate::api::error::ApiError;
use crate::api::extractors::AdminAuth;
use crate::state::AppState;

use super::event_to_admin_response;

/// `POST /events/{event_id}/close-registration`
pub(super) async fn close_registration(
    state: State<AppState>,
    _auth: AdminAuth,
    Path(event_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let event = state.exchange.process(CloseRegistration { event_id }).await?;
    Ok(Json(event_to_admin_response(&event)))
}

/// `POST /events/{event_id}/generate-assignments`
pub(super) async fn generate_assignments(
    state: State<AppState>,
    _auth: AdminAuth,
    Path(event_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = state
        .exchange
        .process(GenerateAssignments { event_id })
        .await?;
    Ok(Json(GenerateAssignmentsResponse {
        event_id: outcome.event_id,
        assigned: outcome.assigned,
    }))
}

/// `POST /events/{event_id}/open-reveal`
pub(super) async fn open_reveal(
    state: State<AppState>,
    _auth: AdminAuth,
    Path(event_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let event = state.exchange.process(OpenReveal { event_id }).await?;
    Ok(Json(event_to_admin_response(&event)))
}

/// `POST /events/{event_id}/reset-assignments`
///
/// Clears assignments and reveal flags and closes reveal; registration
/// stays closed.
pub(super) async fn reset_assignments(
    state: State<AppState>,
    _auth: AdminAuth,
    Path(event_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = state.exchange.process(ResetAssignments { event_id }).await?;
    Ok(Json(ResetAssignmentsResponse {
        event_id: outcome.event_id,
        cleared: outcome.cleared,
    }))
}
