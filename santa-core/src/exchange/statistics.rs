//! Read-only views over an event's participants.
//!
//! Computed on every call from committed rows; nothing here takes an event
//! lock.

use super::{Clock, ExchangeError, GiftExchange};
use crate::entities::participant::{ListParticipants, Participant, ParticipantListing};
use crate::store::ExchangeStore;
use kanau::processor::Processor;
use santa_sdk::objects::admin::ParticipantStatusFilter;

#[derive(Debug, Clone, Copy)]
pub struct GetStatistics {
    pub event_id: i64,
}

/// Reveal progress of an event.
///
/// `revealed + pending == total`. Percentages round half to even; an empty
/// event is 0% revealed and 100% pending.
#[derive(Debug, Clone, PartialEq)]
pub struct EventStatistics {
    pub event_id: i64,
    pub total: u64,
    pub revealed: u64,
    pub pending: u64,
    pub revealed_percent: u8,
    pub pending_percent: u8,
    pub pending_participants: Vec<Participant>,
}

impl EventStatistics {
    pub fn from_participants(event_id: i64, participants: Vec<Participant>) -> Self {
        let total = participants.len() as u64;
        let (revealed, pending_participants): (Vec<Participant>, Vec<Participant>) =
            participants.into_iter().partition(|p| p.has_revealed);
        let revealed = revealed.len() as u64;

        let (revealed_percent, pending_percent) = if total == 0 {
            (0, 100)
        } else {
            let percent = (revealed as f64 * 100.0 / total as f64).round_ties_even() as u8;
            (percent, 100 - percent)
        };

        Self {
            event_id,
            total,
            revealed,
            pending: total - revealed,
            revealed_percent,
            pending_percent,
            pending_participants,
        }
    }
}

impl<S: ExchangeStore, C: Clock> Processor<GetStatistics> for GiftExchange<S, C> {
    type Output = EventStatistics;
    type Error = ExchangeError;
    #[tracing::instrument(skip_all, err, name = "Exchange:GetStatistics")]
    async fn process(&self, query: GetStatistics) -> Result<EventStatistics, ExchangeError> {
        if self.store.get_event(query.event_id).await?.is_none() {
            return Err(ExchangeError::EventNotFound);
        }
        let participants = self.store.participants_of_event(query.event_id).await?;
        Ok(EventStatistics::from_participants(query.event_id, participants))
    }
}

/// Admin listing of an event's participants, newest first.
#[derive(Debug, Clone, Copy)]
pub struct ListEventParticipants {
    pub event_id: i64,
    pub status: ParticipantStatusFilter,
    pub limit: i64,
    pub offset: i64,
}

impl<S: ExchangeStore, C: Clock> Processor<ListEventParticipants> for GiftExchange<S, C> {
    type Output = Vec<ParticipantListing>;
    type Error = ExchangeError;
    #[tracing::instrument(skip_all, err, name = "Exchange:ListEventParticipants")]
    async fn process(
        &self,
        query: ListEventParticipants,
    ) -> Result<Vec<ParticipantListing>, ExchangeError> {
        if self.store.get_event(query.event_id).await?.is_none() {
            return Err(ExchangeError::EventNotFound);
        }
        Ok(self
            .store
            .list_participants(ListParticipants {
                event_id: query.event_id,
                status: query.status,
                limit: query.limit,
                offset: query.offset,
            })
            .await?)
    }
}
