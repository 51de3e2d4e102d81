use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use kanau::processor::Processor;
use santa_core::exchange::Register;
use santa_sdk::objects::{RegisterRequest, RegistrationResponse};

use crate::api::error::ApiError;
use crate::state::AppState;

/// `POST /events/{event_id}/register`: register an eligible person.
///
/// The reveal token is returned here and nowhere else.
pub(super) async fn register(
    state: State<AppState>,
    Path(event_id): Path<i64>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = body?;

    let participant = state
        .exchange
        .process(Register {
            event_id,
            display_name: request.display_name,
            external_id: request.external_id,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegistrationResponse {
            participant_id: participant.id,
            display_name: participant.display_name,
            external_id: participant.external_id,
            reveal_token: participant.reveal_token,
        }),
    ))
}
