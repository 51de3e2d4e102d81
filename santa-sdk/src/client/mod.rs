//! HTTP clients for the gift exchange APIs.
//!
//! Gated behind the `client` cargo feature so downstream crates that only
//! need the shared types do not pull in `reqwest`.

mod admin;
mod participant;

pub use admin::AdminClient;
pub use participant::ParticipantClient;

use reqwest::StatusCode;

use crate::objects::ErrorResponse;

/// Errors produced by the SDK HTTP clients.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport-level failure (DNS, TLS, connection reset, …).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server rejected the request with a typed error body.
    #[error("api error: status {status}: {}", .error.message)]
    Api {
        status: StatusCode,
        error: ErrorResponse,
    },

    /// The server returned a non-2xx status without a typed error body.
    #[error("http status {status}, body: {body}")]
    Status { status: StatusCode, body: String },

    /// Response body could not be deserialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The base URL could not be joined with the endpoint path.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

impl ClientError {
    /// The typed error body, if the server sent one.
    pub fn api_error(&self) -> Option<&ErrorResponse> {
        match self {
            ClientError::Api { error, .. } => Some(error),
            _ => None,
        }
    }
}

async fn parse_response<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, ClientError> {
    let status = resp.status();
    let bytes = resp.bytes().await?;
    if !status.is_success() {
        return Err(match serde_json::from_slice::<ErrorResponse>(&bytes) {
            Ok(error) => ClientError::Api { status, error },
            Err(_) => ClientError::Status {
                status,
                body: String::from_utf8_lossy(&bytes).into_owned(),
            },
        });
    }
    serde_json::from_slice(&bytes).map_err(ClientError::Json)
}
