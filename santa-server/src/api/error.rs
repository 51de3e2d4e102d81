//! Error responses shared by the participant and admin APIs.
//!
//! Every non-2xx response carries an [`ErrorResponse`] JSON body.

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use santa_core::exchange::ExchangeError;
use santa_sdk::objects::{ErrorKind, ErrorResponse};
use time::OffsetDateTime;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Exchange(#[from] ExchangeError),
    #[error("{0}")]
    BadRequest(String),
    #[error("missing or invalid admin secret")]
    AdminUnauthorized,
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Exchange(e) => e.kind(),
            ApiError::BadRequest(_) => ErrorKind::BadRequest,
            ApiError::AdminUnauthorized => ErrorKind::AdminUnauthorized,
        }
    }
}

pub(crate) fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::InsufficientParticipants
        | ErrorKind::NoParticipants
        | ErrorKind::NotEligible
        | ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
        ErrorKind::InvalidCredentials | ErrorKind::AdminUnauthorized => StatusCode::UNAUTHORIZED,
        ErrorKind::RevealLocked | ErrorKind::RevealNotOpen | ErrorKind::RegistrationClosed => {
            StatusCode::FORBIDDEN
        }
        ErrorKind::EventNotFound => StatusCode::NOT_FOUND,
        ErrorKind::InvalidTransition
        | ErrorKind::AlreadyAssigned
        | ErrorKind::AlreadyRegistered
        | ErrorKind::AlreadyRevealed
        | ErrorKind::NotAssignedYet => StatusCode::CONFLICT,
        ErrorKind::Unexpected => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let message = if kind.is_validation() {
            self.to_string()
        } else {
            tracing::error!(error = %self, "API request failed");
            "internal server error".to_string()
        };
        (status_for(kind), Json(ErrorResponse { kind, message })).into_response()
    }
}

/// Parse an optional unix-seconds timestamp from a request body.
pub(crate) fn parse_timestamp(
    field: &str,
    seconds: Option<i64>,
) -> Result<Option<OffsetDateTime>, ApiError> {
    seconds
        .map(|s| {
            OffsetDateTime::from_unix_timestamp(s)
                .map_err(|_| ApiError::BadRequest(format!("{field} is out of range")))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use santa_core::store::StoreError;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(ErrorKind::InvalidCredentials),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(status_for(ErrorKind::RevealLocked), StatusCode::FORBIDDEN);
        assert_eq!(status_for(ErrorKind::AlreadyRevealed), StatusCode::CONFLICT);
        assert_eq!(status_for(ErrorKind::NotEligible), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(ErrorKind::EventNotFound), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_unexpected_errors_are_masked() {
        let err = ApiError::Exchange(ExchangeError::Store(StoreError::Database(
            sqlx::Error::PoolTimedOut,
        )));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(parse_timestamp("reveal_at", None).unwrap(), None);
        assert_eq!(
            parse_timestamp("reveal_at", Some(0)).unwrap(),
            Some(OffsetDateTime::UNIX_EPOCH)
        );
        assert!(matches!(
            parse_timestamp("reveal_at", Some(i64::MAX)),
            Err(ApiError::BadRequest(_))
        ));
    }
}
