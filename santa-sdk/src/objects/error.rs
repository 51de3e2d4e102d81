//! Error taxonomy shared by the server and its clients.

use serde::{Deserialize, Serialize};

/// Every failure kind the API can report.
///
/// All kinds except [`ErrorKind::Unexpected`] are validation outcomes: the
/// request was rejected, nothing was written, and retrying with corrected
/// input is safe. `Unexpected` means the server failed and the same
/// request may succeed later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidTransition,
    InsufficientParticipants,
    AlreadyAssigned,
    NoParticipants,
    RegistrationClosed,
    NotEligible,
    AlreadyRegistered,
    RevealLocked,
    /// Unknown external id or wrong token. The two are never distinguished.
    InvalidCredentials,
    RevealNotOpen,
    AlreadyRevealed,
    NotAssignedYet,
    EventNotFound,
    /// Missing or wrong admin secret.
    AdminUnauthorized,
    /// The request body or query could not be parsed.
    BadRequest,
    Unexpected,
}

impl ErrorKind {
    /// Whether this kind is a caller-recoverable validation failure.
    pub fn is_validation(self) -> bool {
        !matches!(self, ErrorKind::Unexpected)
    }
}

/// JSON body returned with every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub kind: ErrorKind,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_wire_names() {
        assert_eq!(
            serde_json::to_string(&ErrorKind::InvalidCredentials).unwrap(),
            "\"invalid_credentials\""
        );
        let parsed: ErrorResponse =
            serde_json::from_str(r#"{"kind":"already_revealed","message":"nope"}"#).unwrap();
        assert_eq!(parsed.kind, ErrorKind::AlreadyRevealed);
        assert!(parsed.kind.is_validation());
        assert!(!ErrorKind::Unexpected.is_validation());
    }
}
