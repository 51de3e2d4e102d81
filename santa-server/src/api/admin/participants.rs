use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    response::IntoResponse,
};
use kanau::processor::Processor;
use santa_core::entities::participant::ParticipantListing;
use santa_core::exchange::ListEventParticipants;
use santa_sdk::objects::admin::{AdminParticipantResponse, ListParticipantsQuery, clamp_pagination};

use crate::api::error::ApiError;
use crate::api::extractors::AdminAuth;
use crate::state::AppState;

fn listing_to_response(p: ParticipantListing) -> AdminParticipantResponse {
    AdminParticipantResponse {
        participant_id: p.id,
        external_id: p.external_id,
        display_name: p.display_name,
        has_revealed: p.has_revealed,
        assigned_to_name: p.assigned_to_name,
        created_at: p.created_at.unix_timestamp(),
    }
}

/// `GET /events/{event_id}/participants?status=&limit=&offset=`
pub(super) async fn list_participants(
    state: State<AppState>,
    _auth: AdminAuth,
    Path(event_id): Path<i64>,
    query: Result<Query<ListParticipantsQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query?;
    let (limit, offset) = clamp_pagination(query.limit, query.offset);

    let participants = state
        .exchange
        .process(ListEventParticipants {
            event_id,
            status: query.status,
            limit,
            offset,
        })
        .await?;

    let body: Vec<AdminParticipantResponse> =
        participants.into_iter().map(listing_to_response).collect();
    Ok(Json(body))
}
