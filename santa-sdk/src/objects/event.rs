//! Event request and response types.

use serde::{Deserialize, Serialize};

/// Where an event is in its lifecycle.
///
/// Derived from the event flags and whether assignments exist; never
/// stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventPhase {
    RegistrationOpen,
    RegistrationClosed,
    AssignmentsGenerated,
    RevealOpen,
}

impl std::fmt::Display for EventPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventPhase::RegistrationOpen => write!(f, "registration_open"),
            EventPhase::RegistrationClosed => write!(f, "registration_closed"),
            EventPhase::AssignmentsGenerated => write!(f, "assignments_generated"),
            EventPhase::RevealOpen => write!(f, "reveal_open"),
        }
    }
}

/// Public view of an event, as shown to participants.
///
/// Timestamps are unix seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventOverviewResponse {
    pub event_id: i64,
    pub name: String,
    pub phase: EventPhase,
    pub registration_open: bool,
    pub reveal_open: bool,
    pub countdown_at: Option<i64>,
    pub reveal_at: Option<i64>,
    pub countdown_active: bool,
    pub reveal_locked: bool,
}

/// Request body for creating an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub name: String,
    #[serde(default)]
    pub countdown_at: Option<i64>,
    #[serde(default)]
    pub reveal_at: Option<i64>,
}

/// Request body for replacing an event's schedule.
///
/// Both fields are written; `null` clears a timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateScheduleRequest {
    pub countdown_at: Option<i64>,
    pub reveal_at: Option<i64>,
}
