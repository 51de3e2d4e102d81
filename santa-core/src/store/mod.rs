//! Persistence seam for the gift exchange engine.
//!
//! Every mutating engine operation runs inside an [`EventScope`]: a unit of
//! work that holds its event in a [`LockMode`] until it is committed or
//! dropped. Dropping a scope without committing discards every write made
//! through it.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::{PgEventScope, PgStore};

use crate::entities::eligible_student::{EligibleStudent, EligibleStudentInsert, ListEligibleStudents};
use crate::entities::event::{Event, EventInsert, UpdateEventSchedule};
use crate::entities::participant::{ListParticipants, Participant, ParticipantInsert, ParticipantListing};
use crate::framework::LockMode;
use std::future::Future;

/// Unique constraint on `(event_id, external_id)` of participants.
pub const PARTICIPANT_EXTERNAL_ID_KEY: &str = "participants_event_id_external_id_key";
/// Unique constraint on participant reveal tokens.
pub const REVEAL_TOKEN_KEY: &str = "participants_reveal_token_key";
/// Unique constraint tying a participant to one roster entry.
pub const ELIGIBLE_RECORD_KEY: &str = "participants_eligible_record_id_key";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(sqlx::Error),
    #[error("unique constraint violated: {constraint}")]
    Duplicate { constraint: String },
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err
            && db.is_unique_violation()
        {
            return StoreError::Duplicate {
                constraint: db.constraint().unwrap_or_default().to_string(),
            };
        }
        StoreError::Database(err)
    }
}

/// Counts reported by a roster import, excluding ids rejected before
/// reaching the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportCounts {
    pub created: u64,
    pub updated: u64,
    pub skipped: u64,
}

/// The eligibility roster as seen from inside a unit of work.
pub trait EligibilityRegistry: Send {
    /// Find a roster entry by normalized external id and hold it
    /// exclusively until the unit of work ends.
    fn lock_eligible(
        &mut self,
        external_id: &str,
    ) -> impl Future<Output = Result<Option<EligibleStudent>, StoreError>> + Send;

    /// Flip `is_registered`. Callers check the flag first; marking an
    /// already registered entry is a no-op that returns `false`.
    fn mark_registered(
        &mut self,
        eligible_id: i64,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;
}

/// A unit of work holding one event.
pub trait EventScope: EligibilityRegistry + Sized {
    /// The event as loaded when the scope began, with this scope's own
    /// flag changes applied.
    fn event(&self) -> &Event;

    /// Every participant of the event, ordered by id. In an exclusive scope
    /// the returned rows stay locked until the scope ends.
    fn participants(&mut self) -> impl Future<Output = Result<Vec<Participant>, StoreError>> + Send;

    fn participant_exists(
        &mut self,
        external_id: &str,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;

    fn insert_participant(
        &mut self,
        insert: ParticipantInsert,
    ) -> impl Future<Output = Result<Participant, StoreError>> + Send;

    /// The participant matching both credentials exactly, locked for the
    /// rest of the scope.
    fn lock_participant_by_credentials(
        &mut self,
        external_id: &str,
        reveal_token: &str,
    ) -> impl Future<Output = Result<Option<Participant>, StoreError>> + Send;

    fn participant(
        &mut self,
        participant_id: i64,
    ) -> impl Future<Output = Result<Option<Participant>, StoreError>> + Send;

    /// Write `(giver_id, recipient_id)` pairs in one statement.
    fn assign(
        &mut self,
        pairs: &[(i64, i64)],
    ) -> impl Future<Output = Result<u64, StoreError>> + Send;

    /// Clear assignments and reveal flags; returns how many participants
    /// had anything to clear.
    fn clear_assignments(&mut self) -> impl Future<Output = Result<u64, StoreError>> + Send;

    fn mark_revealed(
        &mut self,
        participant_id: i64,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;

    fn set_registration_open(
        &mut self,
        open: bool,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn set_reveal_open(&mut self, open: bool) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn commit(self) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Storage backing a [`crate::exchange::GiftExchange`].
pub trait ExchangeStore: Send + Sync + 'static {
    type Scope: EventScope;

    /// Begin a unit of work on an event. `None` when the event does not
    /// exist.
    fn begin(
        &self,
        event_id: i64,
        mode: LockMode,
    ) -> impl Future<Output = Result<Option<Self::Scope>, StoreError>> + Send;

    fn create_event(
        &self,
        insert: EventInsert,
    ) -> impl Future<Output = Result<Event, StoreError>> + Send;

    fn get_event(&self, event_id: i64)
    -> impl Future<Output = Result<Option<Event>, StoreError>> + Send;

    /// All events, newest first.
    fn list_events(&self) -> impl Future<Output = Result<Vec<Event>, StoreError>> + Send;

    fn update_schedule(
        &self,
        update: UpdateEventSchedule,
    ) -> impl Future<Output = Result<Option<Event>, StoreError>> + Send;

    /// Delete an event and its participants. Returns whether it existed.
    fn delete_event(&self, event_id: i64) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Unlocked snapshot of an event's participants, ordered by id.
    fn participants_of_event(
        &self,
        event_id: i64,
    ) -> impl Future<Output = Result<Vec<Participant>, StoreError>> + Send;

    fn list_participants(
        &self,
        query: ListParticipants,
    ) -> impl Future<Output = Result<Vec<ParticipantListing>, StoreError>> + Send;

    fn find_eligible(
        &self,
        external_id: &str,
    ) -> impl Future<Output = Result<Option<EligibleStudent>, StoreError>> + Send;

    fn list_eligible(
        &self,
        query: ListEligibleStudents,
    ) -> impl Future<Output = Result<Vec<EligibleStudent>, StoreError>> + Send;

    /// Create or update roster entries as one atomic unit.
    ///
    /// Records must already be normalized and validated.
    fn import_eligible(
        &self,
        records: Vec<EligibleStudentInsert>,
        update_existing: bool,
    ) -> impl Future<Output = Result<ImportCounts, StoreError>> + Send;
}
