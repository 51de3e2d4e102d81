//! Participant API request and response types.

use serde::{Deserialize, Serialize};

/// Request body for registering in an event.
///
/// `display_name` is accepted for form compatibility only; the registered
/// name always comes from the eligibility roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub display_name: String,
    pub external_id: String,
}

/// Returned once, right after registration. The token is not shown again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationResponse {
    pub participant_id: i64,
    pub display_name: String,
    pub external_id: String,
    pub reveal_token: String,
}

/// Request body for revealing an assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealRequest {
    pub external_id: String,
    pub token: String,
}

/// The recipient a participant must gift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealResponse {
    pub recipient_name: String,
    pub recipient_initials: String,
}
