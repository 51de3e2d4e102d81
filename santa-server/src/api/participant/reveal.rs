use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    response::IntoResponse,
};
use kanau::processor::Processor;
use santa_core::exchange::RevealAssignment;
use santa_sdk::objects::{RevealRequest, RevealResponse};

use crate::api::error::ApiError;
use crate::state::AppState;

/// `POST /events/{event_id}/reveal`: one-time reveal of the recipient.
pub(super) async fn reveal(
    state: State<AppState>,
    Path(event_id): Path<i64>,
    body: Result<Json<RevealRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = body?;

    let recipient = state
        .exchange
        .process(RevealAssignment {
            event_id,
            external_id: request.external_id,
            token: request.token,
        })
        .await?;

    Ok(Json(RevealResponse {
        recipient_name: recipient.display_name,
        recipient_initials: recipient.initials,
    }))
}
