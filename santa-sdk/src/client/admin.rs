//! Admin API client (organizer dashboard → server).
//!
//! All requests carry the plaintext admin secret in the
//! `Santa-Admin-Authorization` header.

use reqwest::{Client, Method, RequestBuilder};
use url::Url;

use super::{ClientError, parse_response};
use crate::objects::admin::{
    ADMIN_AUTH_HEADER, AdminEligibleResponse, AdminEventResponse, AdminParticipantResponse,
    GenerateAssignmentsResponse, ImportEligibleRequest, ImportEligibleResponse, ListEligibleQuery,
    ListParticipantsQuery, ResetAssignmentsResponse, StatisticsResponse,
};
use crate::objects::event::{CreateEventRequest, UpdateScheduleRequest};

/// Typed HTTP client for the **Admin API**.
///
/// Authentication uses a plaintext secret sent in the
/// `Santa-Admin-Authorization` header, verified server-side against an
/// argon2-hashed value.
#[derive(Debug, Clone)]
pub struct AdminClient {
    http: Client,
    base_url: Url,
    admin_secret: String,
}

impl AdminClient {
    /// Create a new `AdminClient`.
    ///
    /// * `base_url` – root URL of the server.
    /// * `admin_secret` – the plaintext admin secret.
    pub fn new(base_url: Url, admin_secret: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url,
            admin_secret: admin_secret.into(),
        }
    }

    /// Replace the default `reqwest::Client` with a custom one.
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let url = self.base_url.join(path)?;
        Ok(self
            .http
            .request(method, url)
            .header(ADMIN_AUTH_HEADER, &self.admin_secret))
    }

    /// `GET /api/v1/admin/events`
    pub async fn list_events(&self) -> Result<Vec<AdminEventResponse>, ClientError> {
        let resp = self
            .request(Method::GET, "/api/v1/admin/events")?
            .send()
            .await?;
        parse_response(resp).await
    }

    /// `POST /api/v1/admin/events`
    pub async fn create_event(
        &self,
        request: &CreateEventRequest,
    ) -> Result<AdminEventResponse, ClientError> {
        let resp = self
            .request(Method::POST, "/api/v1/admin/events")?
            .json(request)
            .send()
            .await?;
        parse_response(resp).await
    }

    /// `PUT /api/v1/admin/events/{event_id}/schedule`
    pub async fn update_schedule(
        &self,
        event_id: i64,
        request: &UpdateScheduleRequest,
    ) -> Result<AdminEventResponse, ClientError> {
        let resp = self
            .request(
                Method::PUT,
                &format!("/api/v1/admin/events/{event_id}/schedule"),
            )?
            .json(request)
            .send()
            .await?;
        parse_response(resp).await
    }

    /// `POST /api/v1/admin/events/{event_id}/close-registration`
    pub async fn close_registration(
        &self,
        event_id: i64,
    ) -> Result<AdminEventResponse, ClientError> {
        self.lifecycle(event_id, "close-registration").await
    }

    /// `POST /api/v1/admin/events/{event_id}/generate-assignments`
    pub async fn generate_assignments(
        &self,
        event_id: i64,
    ) -> Result<GenerateAssignmentsResponse, ClientError> {
        self.lifecycle(event_id, "generate-assignments").await
    }

    /// `POST /api/v1/admin/events/{event_id}/open-reveal`
    pub async fn open_reveal(&self, event_id: i64) -> Result<AdminEventResponse, ClientError> {
        self.lifecycle(event_id, "open-reveal").await
    }

    /// `POST /api/v1/admin/events/{event_id}/reset-assignments`
    pub async fn reset_assignments(
        &self,
        event_id: i64,
    ) -> Result<ResetAssignmentsResponse, ClientError> {
        self.lifecycle(event_id, "reset-assignments").await
    }

    async fn lifecycle<T: serde::de::DeserializeOwned>(
        &self,
        event_id: i64,
        action: &str,
    ) -> Result<T, ClientError> {
        let resp = self
            .request(
                Method::POST,
                &format!("/api/v1/admin/events/{event_id}/{action}"),
            )?
            .send()
            .await?;
        parse_response(resp).await
    }

    /// `GET /api/v1/admin/events/{event_id}/participants`
    pub async fn list_participants(
        &self,
        event_id: i64,
        query: &ListParticipantsQuery,
    ) -> Result<Vec<AdminParticipantResponse>, ClientError> {
        let resp = self
            .request(
                Method::GET,
                &format!("/api/v1/admin/events/{event_id}/participants"),
            )?
            .query(query)
            .send()
            .await?;
        parse_response(resp).await
    }

    /// `GET /api/v1/admin/events/{event_id}/statistics`
    pub async fn statistics(&self, event_id: i64) -> Result<StatisticsResponse, ClientError> {
        let resp = self
            .request(
                Method::GET,
                &format!("/api/v1/admin/events/{event_id}/statistics"),
            )?
            .send()
            .await?;
        parse_response(resp).await
    }

    /// `GET /api/v1/admin/eligible`
    pub async fn list_eligible(
        &self,
        query: &ListEligibleQuery,
    ) -> Result<Vec<AdminEligibleResponse>, ClientError> {
        let resp = self
            .request(Method::GET, "/api/v1/admin/eligible")?
            .query(query)
            .send()
            .await?;
        parse_response(resp).await
    }

    /// `POST /api/v1/admin/eligible`
    pub async fn import_eligible(
        &self,
        request: &ImportEligibleRequest,
    ) -> Result<ImportEligibleResponse, ClientError> {
        let resp = self
            .request(Method::POST, "/api/v1/admin/eligible")?
            .json(request)
            .send()
            .await?;
        parse_response(resp).await
    }
}
