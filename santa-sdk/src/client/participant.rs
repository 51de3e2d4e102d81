//! Participant API client (registration page / reveal page → server).

use reqwest::Client;
use url::Url;

use super::{ClientError, parse_response};
use crate::objects::{
    EventOverviewResponse, RegisterRequest, RegistrationResponse, RevealRequest, RevealResponse,
};

/// Typed HTTP client for the **Participant API**.
///
/// No credentials are attached; reveals are authorized by the
/// participant's own external id and reveal token.
#[derive(Debug, Clone)]
pub struct ParticipantClient {
    http: Client,
    base_url: Url,
}

impl ParticipantClient {
    pub fn new(base_url: Url) -> Self {
        Self {
            http: Client::new(),
            base_url,
        }
    }

    /// Replace the default `reqwest::Client` with a custom one.
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// `GET /api/v1/events/{event_id}`
    pub async fn event(&self, event_id: i64) -> Result<EventOverviewResponse, ClientError> {
        let url = self
            .base_url
            .join(&format!("/api/v1/events/{event_id}"))?;
        let resp = self.http.get(url).send().await?;
        parse_response(resp).await
    }

    /// `POST /api/v1/events/{event_id}/register`
    pub async fn register(
        &self,
        event_id: i64,
        request: &RegisterRequest,
    ) -> Result<RegistrationResponse, ClientError> {
        let url = self
            .base_url
            .join(&format!("/api/v1/events/{event_id}/register"))?;
        let resp = self.http.post(url).json(request).send().await?;
        parse_response(resp).await
    }

    /// `POST /api/v1/events/{event_id}/reveal`
    pub async fn reveal(
        &self,
        event_id: i64,
        request: &RevealRequest,
    ) -> Result<RevealResponse, ClientError> {
        let url = self
            .base_url
            .join(&format!("/api/v1/events/{event_id}/reveal"))?;
        let resp = self.http.post(url).json(request).send().await?;
        parse_response(resp).await
    }
}
