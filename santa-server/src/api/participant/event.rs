use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use kanau::processor::Processor;
use santa_core::exchange::{DescribeEvent, EventOverview};
use santa_sdk::objects::EventOverviewResponse;

use crate::api::error::ApiError;
use crate::state::AppState;

fn overview_to_response(overview: EventOverview) -> EventOverviewResponse {
    let event = overview.event;
    EventOverviewResponse {
        event_id: event.id,
        name: event.name,
        phase: overview.phase,
        registration_open: event.registration_open,
        reveal_open: event.reveal_open,
        countdown_at: event.countdown_at.map(|t| t.unix_timestamp()),
        reveal_at: event.reveal_at.map(|t| t.unix_timestamp()),
        countdown_active: overview.countdown_active,
        reveal_locked: overview.reveal_locked,
    }
}

/// `GET /events/{event_id}`: phase, schedule, and gate flags of an event.
pub(super) async fn get_event_overview(
    state: State<AppState>,
    Path(event_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let overview = state.exchange.process(DescribeEvent { event_id }).await?;
    Ok(Json(overview_to_response(overview)))
}
