use crate::store::StoreError;
use santa_sdk::objects::ErrorKind;
use thiserror::Error;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

fn format_reveal_time(at: &OffsetDateTime) -> String {
    at.to_offset(UtcOffset::UTC)
        .format(format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second]"
        ))
        .unwrap_or_else(|_| at.to_string())
}

/// Lifecycle step refused because the event is in the wrong phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidTransition {
    #[error("Registration already closed.")]
    RegistrationAlreadyClosed,
    #[error("Registration must be closed before generating assignments.")]
    RegistrationStillOpen,
    #[error("Close registration before opening reveal.")]
    RevealNeedsClosedRegistration,
    #[error("Assignments have not been generated.")]
    NoAssignments,
}

/// Every way an engine operation can fail.
///
/// All variants except [`ExchangeError::Store`] and
/// [`ExchangeError::Entropy`] are validation failures: nothing was written
/// and the `Display` text is meant for the end user as is.
#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),

    #[error("Not enough participants.")]
    InsufficientParticipants,

    #[error("Assignments already exist. Use reset before regenerating.")]
    AlreadyAssigned,

    #[error("No participants to reset.")]
    NoParticipants,

    #[error("Registration is closed.")]
    RegistrationClosed,

    #[error("You are not eligible for this gift exchange.")]
    NotEligible,

    #[error("You have already registered.")]
    AlreadyRegistered,

    #[error("Reveal is locked until {}.", format_reveal_time(.until))]
    RevealLocked { until: OffsetDateTime },

    /// Unknown external id or wrong token; deliberately one variant.
    #[error("Invalid external id or token.")]
    InvalidCredentials,

    #[error("Reveal phase is not open yet.")]
    RevealNotOpen,

    #[error("You have already revealed your assignment.")]
    AlreadyRevealed,

    #[error("Assignments have not been generated yet.")]
    NotAssignedYet,

    #[error("Event not found.")]
    EventNotFound,

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("system random source failed")]
    Entropy,
}

impl ExchangeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExchangeError::InvalidTransition(_) => ErrorKind::InvalidTransition,
            ExchangeError::InsufficientParticipants => ErrorKind::InsufficientParticipants,
            ExchangeError::AlreadyAssigned => ErrorKind::AlreadyAssigned,
            ExchangeError::NoParticipants => ErrorKind::NoParticipants,
            ExchangeError::RegistrationClosed => ErrorKind::RegistrationClosed,
            ExchangeError::NotEligible => ErrorKind::NotEligible,
            ExchangeError::AlreadyRegistered => ErrorKind::AlreadyRegistered,
            ExchangeError::RevealLocked { .. } => ErrorKind::RevealLocked,
            ExchangeError::InvalidCredentials => ErrorKind::InvalidCredentials,
            ExchangeError::RevealNotOpen => ErrorKind::RevealNotOpen,
            ExchangeError::AlreadyRevealed => ErrorKind::AlreadyRevealed,
            ExchangeError::NotAssignedYet => ErrorKind::NotAssignedYet,
            ExchangeError::EventNotFound => ErrorKind::EventNotFound,
            ExchangeError::Store(_) | ExchangeError::Entropy => ErrorKind::Unexpected,
        }
    }

    /// Whether the caller can fix this by changing its input.
    pub fn is_validation(&self) -> bool {
        self.kind().is_validation()
    }
}
