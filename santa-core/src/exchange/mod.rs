//! The gift exchange engine.
//!
//! [`GiftExchange`] runs every caller-facing operation as a
//! [`kanau::processor::Processor`] over a command struct. Each mutating
//! operation runs in one [`EventScope`](crate::store::EventScope): its guards
//! are checked and its writes applied against the same locked snapshot, and
//! a failed guard drops the scope so nothing is written.
//!
//! | Operation | Event lock |
//! |---|---|
//! | register, reveal | shared |
//! | close registration, generate, open reveal, reset | exclusive |
//! | statistics, listings, overview | none |

mod clock;
pub mod derangement;
mod error;
mod events;
mod lifecycle;
mod registration;
mod reveal;
mod roster;
mod statistics;
pub mod token;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ExchangeError, InvalidTransition};
pub use events::{
    CreateEvent, DeleteEvent, DescribeEvent, EventOverview, GetEvent, ListEvents, UpdateSchedule,
    phase_of,
};
pub use lifecycle::{
    AssignmentOutcome, CloseRegistration, GenerateAssignments, OpenReveal, ResetAssignments,
    ResetOutcome,
};
pub use registration::Register;
pub use reveal::{RevealAssignment, RevealedRecipient, initials};
pub use roster::{FindEligible, ImportEligible, ImportSummary, ListEligible};
pub use statistics::{EventStatistics, GetStatistics, ListEventParticipants};

use crate::framework::LockMode;
use crate::store::ExchangeStore;
use ring::rand::SystemRandom;
use time::OffsetDateTime;

pub struct GiftExchange<S, C = SystemClock> {
    store: S,
    clock: C,
    rng: SystemRandom,
}

impl<S: ExchangeStore> GiftExchange<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            clock: SystemClock,
            rng: SystemRandom::new(),
        }
    }
}

impl<S: ExchangeStore, C: Clock> GiftExchange<S, C> {
    /// Replace the time source used by the schedule gates.
    pub fn with_clock<C2: Clock>(self, clock: C2) -> GiftExchange<S, C2> {
        GiftExchange {
            store: self.store,
            clock,
            rng: self.rng,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn now(&self) -> OffsetDateTime {
        self.clock.now()
    }

    async fn begin(&self, event_id: i64, mode: LockMode) -> Result<S::Scope, ExchangeError> {
        self.store
            .begin(event_id, mode)
            .await?
            .ok_or(ExchangeError::EventNotFound)
    }
}
