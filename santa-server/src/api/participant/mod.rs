//! Participant API handlers.
//!
//! No authentication: registration is gated by the eligibility roster and
//! reveal by the participant's token.
//!
//! # Endpoints
//!
//! - `GET  /events/{event_id}`          – public event overview
//! - `POST /events/{event_id}/register` – register and receive a reveal token
//! - `POST /events/{event_id}/reveal`   – reveal the assigned recipient

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

mod event;
mod register;
mod reveal;

/// Build the Participant API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/events/{event_id}", get(event::get_event_overview))
        .route("/events/{event_id}/register", post(register::register))
        .route("/events/{event_id}/reveal", post(reveal::reveal))
}
