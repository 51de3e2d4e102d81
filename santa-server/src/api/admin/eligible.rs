use axum::{
    Json,
    extract::{Query, State, rejection::{JsonRejection, QueryRejection}},
    response::IntoResponse,
};
use kanau::processor::Processor;
use santa_core::entities::eligible_student::EligibleStudentInsert;
use santa_core::exchange::{ImportEligible, ListEligible};
use santa_sdk::objects::admin::{
    AdminEligibleResponse, ImportEligibleRequest, ImportEligibleResponse, ListEligibleQuery,
    clamp_pagination,
};

use crate::api::error::ApiError;
use crate::api::extractors::AdminAuth;
use crate::state::AppState;

/// `GET /eligible?registered=&limit=&offset=`: the eligibility roster.
pub(super) async fn list_eligible(
    state: State<AppState>,
    _auth: AdminAuth,
    query: Result<Query<ListEligibleQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query?;
    let (limit, offset) = clamp_pagination(query.limit, query.offset);

    let students = state
        .exchange
        .process(ListEligible {
            registered: query.registered,
            limit,
            offset,
        })
        .await?;

    let body: Vec<AdminEligibleResponse> = students
        .into_iter()
        .map(|s| AdminEligibleResponse {
            id: s.id,
            external_id: s.external_id,
            display_name: s.display_name,
            is_registered: s.is_registered,
        })
        .collect();
    Ok(Json(body))
}

/// `POST /eligible`: import roster entries.
///
/// Entries failing the configured external id pattern are counted as
/// invalid rather than failing the whole import.
pub(super) async fn import_eligible(
    state: State<AppState>,
    _auth: AdminAuth,
    body: Result<Json<ImportEligibleRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = body?;
    let registry = state.config.registry.read().await.clone();

    let summary = state
        .exchange
        .process(ImportEligible {
            records: request
                .records
                .into_iter()
                .map(|r| EligibleStudentInsert {
                    external_id: r.external_id,
                    display_name: r.display_name,
                })
                .collect(),
            update_existing: request.update_existing,
            registry,
        })
        .await?;

    Ok(Json(ImportEligibleResponse {
        created: summary.created,
        updated: summary.updated,
        skipped: summary.skipped,
        invalid: summary.invalid,
    }))
}
