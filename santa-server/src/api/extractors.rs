//! Custom Axum extractors for request authentication.
//!
//! The participant API is unauthenticated (the reveal token is the
//! capability); the admin API requires [`AdminAuth`].

use axum::{extract::FromRequestParts, http::request::Parts};
use santa_sdk::objects::admin::ADMIN_AUTH_HEADER;

use crate::api::error::ApiError;
use crate::state::AppState;

/// An Axum extractor that checks the `Santa-Admin-Authorization` header
/// against the argon2 hash of the admin secret.
///
/// ```text
/// Santa-Admin-Authorization: {plaintext admin secret}
/// ```
///
/// Missing, non-UTF-8, and wrong secrets are all rejected the same way.
pub struct AdminAuth;

impl FromRequestParts<AppState> for AdminAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let secret = parts
            .headers
            .get(ADMIN_AUTH_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::AdminUnauthorized)?;

        let admin = state.config.admin.read().await.clone();
        if admin.verify_secret(secret) {
            Ok(AdminAuth)
        } else {
            tracing::warn!("Rejected admin request with a wrong secret");
            Err(ApiError::AdminUnauthorized)
        }
    }
}
