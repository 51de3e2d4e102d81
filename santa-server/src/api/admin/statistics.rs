use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use kanau::processor::Processor;
use santa_core::exchange::GetStatistics;
use santa_sdk::objects::admin::{ParticipantSummary, StatisticsResponse};

use crate::api::error::ApiError;
use crate::api::extractors::AdminAuth;
use crate::state::AppState;

/// `GET /events/{event_id}/statistics`: reveal progress of an event.
pub(super) async fn get_statistics(
    state: State<AppState>,
    _auth: AdminAuth,
    Path(event_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let stats = state.exchange.process(GetStatistics { event_id }).await?;

    Ok(Json(StatisticsResponse {
        event_id: stats.event_id,
        total: stats.total,
        revealed: stats.revealed,
        pending: stats.pending,
        revealed_percent: stats.revealed_percent,
        pending_percent: stats.pending_percent,
        pending_participants: stats
            .pending_participants
            .into_iter()
            .map(|p| ParticipantSummary {
                participant_id: p.id,
                external_id: p.external_id,
                display_name: p.display_name,
            })
            .collect(),
    }))
}
