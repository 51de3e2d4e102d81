//! Admin API request and response types.

use serde::{Deserialize, Serialize};

/// Header name for admin API authentication (plaintext secret).
pub const ADMIN_AUTH_HEADER: &str = "Santa-Admin-Authorization";

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Full event detail for admin API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminEventResponse {
    pub event_id: i64,
    pub name: String,
    pub registration_open: bool,
    pub reveal_open: bool,
    pub countdown_at: Option<i64>,
    pub reveal_at: Option<i64>,
    pub created_at: i64,
}

/// A participant as listed on the admin dashboard.
///
/// The reveal token is deliberately absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminParticipantResponse {
    pub participant_id: i64,
    pub external_id: String,
    pub display_name: String,
    pub has_revealed: bool,
    pub assigned_to_name: Option<String>,
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantSummary {
    pub participant_id: i64,
    pub external_id: String,
    pub display_name: String,
}

/// Reveal progress of an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsResponse {
    pub event_id: i64,
    pub total: u64,
    pub revealed: u64,
    pub pending: u64,
    pub revealed_percent: u8,
    pub pending_percent: u8,
    pub pending_participants: Vec<ParticipantSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateAssignmentsResponse {
    pub event_id: i64,
    pub assigned: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetAssignmentsResponse {
    pub event_id: i64,
    pub cleared: u64,
}

/// An entry of the eligibility roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminEligibleResponse {
    pub id: i64,
    pub external_id: String,
    pub display_name: String,
    pub is_registered: bool,
}

/// Outcome counts of a roster import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportEligibleResponse {
    pub created: u64,
    pub updated: u64,
    pub skipped: u64,
    pub invalid: u64,
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibleRecordInput {
    pub external_id: String,
    pub display_name: String,
}

/// Request body for importing roster entries.
///
/// Existing entries keep their name unless `update_existing` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportEligibleRequest {
    pub records: Vec<EligibleRecordInput>,
    #[serde(default)]
    pub update_existing: bool,
}

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 500;
const MAX_OFFSET: i64 = 100_000;

/// Reveal-status filter for participant listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantStatusFilter {
    #[default]
    All,
    Revealed,
    Pending,
}

/// Query parameters for listing the participants of an event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListParticipantsQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
    #[serde(default)]
    pub status: ParticipantStatusFilter,
}

/// Query parameters for listing the eligibility roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListEligibleQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
    pub registered: Option<bool>,
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

/// Clamp limit and offset to safe maximums.
pub fn clamp_pagination(limit: i64, offset: i64) -> (i64, i64) {
    (limit.clamp(1, MAX_LIMIT), offset.clamp(0, MAX_OFFSET))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_pagination() {
        assert_eq!(clamp_pagination(0, -5), (1, 0));
        assert_eq!(clamp_pagination(20, 40), (20, 40));
        assert_eq!(clamp_pagination(10_000, 1_000_000), (MAX_LIMIT, MAX_OFFSET));
    }

    #[test]
    fn test_participants_query_defaults() {
        let query: ListParticipantsQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.limit, DEFAULT_LIMIT);
        assert_eq!(query.offset, 0);
        assert_eq!(query.status, ParticipantStatusFilter::All);

        let query: ListParticipantsQuery =
            serde_json::from_str(r#"{"status":"pending","limit":5}"#).unwrap();
        assert_eq!(query.status, ParticipantStatusFilter::Pending);
        assert_eq!(query.limit, 5);
    }
}
