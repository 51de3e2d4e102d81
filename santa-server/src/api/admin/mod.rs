//! Admin API handlers.
//!
//! These endpoints are called by the admin dashboard frontend and require
//! the `Santa-Admin-Authorization` header with the plaintext admin secret.
//!
//! # Endpoints
//!
//! - `GET    /events`                              – list events
//! - `POST   /events`                              – create an event
//! - `GET    /events/{event_id}`                   – event detail
//! - `DELETE /events/{event_id}`                   – delete an event and its participants
//! - `PUT    /events/{event_id}/schedule`          – replace countdown/reveal times
//! - `POST   /events/{event_id}/close-registration`
//! - `POST   /events/{event_id}/generate-assignments`
//! - `POST   /events/{event_id}/open-reveal`
//! - `POST   /events/{event_id}/reset-assignments`
//! - `GET    /events/{event_id}/participants`      – paginated, filterable by reveal status
//! - `GET    /events/{event_id}/statistics`        – reveal progress
//! - `GET    /eligible`                            – list the eligibility roster
//! - `POST   /eligible`                            – import roster entries

use axum::{
    Router,
    routing::{get, post, put},
};
use santa_core::entities::event::Event;
use santa_sdk::objects::admin::AdminEventResponse;

use crate::state::AppState;

mod eligible;
mod events;
mod lifecycle;
mod participants;
mod statistics;

/// Build the Admin API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/events", get(events::list_events).post(events::create_event))
        .route(
            "/events/{event_id}",
            get(events::get_event).delete(events::delete_event),
        )
        .route("/events/{event_id}/schedule", put(events::update_schedule))
        .route(
            "/events/{event_id}/close-registration",
            post(lifecycle::close_registration),
        )
        .route(
            "/events/{event_id}/generate-assignments",
            post(lifecycle::generate_assignments),
        )
        .route("/events/{event_id}/open-reveal", post(lifecycle::open_reveal))
        .route(
            "/events/{event_id}/reset-assignments",
            post(lifecycle::reset_assignments),
        )
        .route(
            "/events/{event_id}/participants",
            get(participants::list_participants),
        )
        .route(
            "/events/{event_id}/statistics",
            get(statistics::get_statistics),
        )
        .route(
            "/eligible",
            get(eligible::list_eligible).post(eligible::import_eligible),
        )
}

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

pub(crate) fn event_to_admin_response(e: &Event) -> AdminEventResponse {
    AdminEventResponse {
        event_id: e.id,
        name: e.name.clone(),
        registration_open: e.registration_open,
        reveal_open: e.reveal_open,
        countdown_at: e.countdown_at.map(|t| t.unix_timestamp()),
        reveal_at: e.reveal_at.map(|t| t.unix_timestamp()),
        created_at: e.created_at.unix_timestamp(),
    }
}
