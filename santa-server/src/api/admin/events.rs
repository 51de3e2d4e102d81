use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use kanau::processor::Processor;
use santa_core::exchange::{CreateEvent, DeleteEvent, GetEvent, ListEvents, UpdateSchedule};
use santa_sdk::objects::admin::AdminEventResponse;
use santa_sdk::objects::event::{CreateEventRequest, UpdateScheduleRequest};

use crate::api::error::{ApiError, parse_timestamp};
use crate::api::extractors::AdminAuth;
use crate::state::AppState;

use super::event_to_admin_response;

/// `GET /events`: all events, newest first.
pub(super) async fn list_events(
    state: State<AppState>,
    _auth: AdminAuth,
) -> Result<impl IntoResponse, ApiError> {
    let events = state.exchange.process(ListEvents).await?;
    let body: Vec<AdminEventResponse> = events.iter().map(event_to_admin_response).collect();
    Ok(Json(body))
}

/// `POST /events`: create an event with registration open.
pub(super) async fn create_event(
    state: State<AppState>,
    _auth: AdminAuth,
    body: Result<Json<CreateEventRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = body?;
    if request.name.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "event name must not be empty".to_string(),
        ));
    }

    let event = state
        .exchange
        .process(CreateEvent {
            name: request.name,
            countdown_at: parse_timestamp("countdown_at", request.countdown_at)?,
            reveal_at: parse_timestamp("reveal_at", request.reveal_at)?,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(event_to_admin_response(&event))))
}

/// `GET /events/{event_id}`
pub(super) async fn get_event(
    state: State<AppState>,
    _auth: AdminAuth,
    Path(event_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let event = state.exchange.process(GetEvent { event_id }).await?;
    Ok(Json(event_to_admin_response(&event)))
}

/// `PUT /events/{event_id}/schedule`: replace both schedule timestamps.
pub(super) async fn update_schedule(
    state: State<AppState>,
    _auth: AdminAuth,
    Path(event_id): Path<i64>,
    body: Result<Json<UpdateScheduleRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = body?;

    let event = state
        .exchange
        .process(UpdateSchedule {
            event_id,
            countdown_at: parse_timestamp("countdown_at", request.countdown_at)?,
            reveal_at: parse_timestamp("reveal_at", request.reveal_at)?,
        })
        .await?;

    Ok(Json(event_to_admin_response(&event)))
}

/// `DELETE /events/{event_id}`: remove the event and its participants.
pub(super) async fn delete_event(
    state: State<AppState>,
    _auth: AdminAuth,
    Path(event_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state.exchange.process(DeleteEvent { event_id }).await?;
    Ok(StatusCode::NO_CONTENT)
}
