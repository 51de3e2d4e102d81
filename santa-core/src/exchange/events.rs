//! Event administration and the participant-facing overview.

use super::{Clock, ExchangeError, GiftExchange};
use crate::entities::event::{Event, EventInsert, UpdateEventSchedule};
use crate::store::ExchangeStore;
use kanau::processor::Processor;
use santa_sdk::objects::EventPhase;
use time::OffsetDateTime;
use tracing::info;

/// Lifecycle phase from the event flags and whether any assignment exists.
pub fn phase_of(event: &Event, has_assignments: bool) -> EventPhase {
    if event.registration_open {
        EventPhase::RegistrationOpen
    } else if event.reveal_open {
        EventPhase::RevealOpen
    } else if has_assignments {
        EventPhase::AssignmentsGenerated
    } else {
        EventPhase::RegistrationClosed
    }
}

#[derive(Debug, Clone)]
pub struct CreateEvent {
    pub name: String,
    pub countdown_at: Option<OffsetDateTime>,
    pub reveal_at: Option<OffsetDateTime>,
}

impl<S: ExchangeStore, C: Clock> Processor<CreateEvent> for GiftExchange<S, C> {
    type Output = Event;
    type Error = ExchangeError;
    #[tracing::instrument(skip_all, err, name = "Exchange:CreateEvent")]
    async fn process(&self, cmd: CreateEvent) -> Result<Event, ExchangeError> {
        let event = self
            .store
            .create_event(EventInsert {
                name: cmd.name.trim().to_string(),
                countdown_at: cmd.countdown_at,
                reveal_at: cmd.reveal_at,
            })
            .await?;
        info!(event_id = event.id, "Event created");
        Ok(event)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GetEvent {
    pub event_id: i64,
}

impl<S: ExchangeStore, C: Clock> Processor<GetEvent> for GiftExchange<S, C> {
    type Output = Event;
    type Error = ExchangeError;
    #[tracing::instrument(skip_all, err, name = "Exchange:GetEvent")]
    async fn process(&self, query: GetEvent) -> Result<Event, ExchangeError> {
        self.store
            .get_event(query.event_id)
            .await?
            .ok_or(ExchangeError::EventNotFound)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ListEvents;

impl<S: ExchangeStore, C: Clock> Processor<ListEvents> for GiftExchange<S, C> {
    type Output = Vec<Event>;
    type Error = ExchangeError;
    #[tracing::instrument(skip_all, err, name = "Exchange:ListEvents")]
    async fn process(&self, _query: ListEvents) -> Result<Vec<Event>, ExchangeError> {
        Ok(self.store.list_events().await?)
    }
}

/// Replace both schedule hints. `countdown_at` and `reveal_at` are not
/// checked against each other.
#[derive(Debug, Clone, Copy)]
pub struct UpdateSchedule {
    pub event_id: i64,
    pub countdown_at: Option<OffsetDateTime>,
    pub reveal_at: Option<OffsetDateTime>,
}

impl<S: ExchangeStore, C: Clock> Processor<UpdateSchedule> for GiftExchange<S, C> {
    type Output = Event;
    type Error = ExchangeError;
    #[tracing::instrument(skip_all, err, name = "Exchange:UpdateSchedule")]
    async fn process(&self, cmd: UpdateSchedule) -> Result<Event, ExchangeError> {
        let event = self
            .store
            .update_schedule(UpdateEventSchedule {
                event_id: cmd.event_id,
                countdown_at: cmd.countdown_at,
                reveal_at: cmd.reveal_at,
            })
            .await?
            .ok_or(ExchangeError::EventNotFound)?;
        info!(event_id = event.id, "Event schedule updated");
        Ok(event)
    }
}

/// Delete an event with all its participants. Roster entries keep their
/// `is_registered` flag.
#[derive(Debug, Clone, Copy)]
pub struct DeleteEvent {
    pub event_id: i64,
}

impl<S: ExchangeStore, C: Clock> Processor<DeleteEvent> for GiftExchange<S, C> {
    type Output = ();
    type Error = ExchangeError;
    #[tracing::instrument(skip_all, err, name = "Exchange:DeleteEvent")]
    async fn process(&self, cmd: DeleteEvent) -> Result<(), ExchangeError> {
        if !self.store.delete_event(cmd.event_id).await? {
            return Err(ExchangeError::EventNotFound);
        }
        info!(event_id = cmd.event_id, "Event deleted");
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DescribeEvent {
    pub event_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventOverview {
    pub event: Event,
    pub phase: EventPhase,
    /// `countdown_at` is still in the future.
    pub countdown_active: bool,
    /// `reveal_at` is still in the future.
    pub reveal_locked: bool,
}

impl<S: ExchangeStore, C: Clock> Processor<DescribeEvent> for GiftExchange<S, C> {
    type Output = EventOverview;
    type Error = ExchangeError;
    #[tracing::instrument(skip_all, err, name = "Exchange:DescribeEvent")]
    async fn process(&self, query: DescribeEvent) -> Result<EventOverview, ExchangeError> {
        let event = self
            .store
            .get_event(query.event_id)
            .await?
            .ok_or(ExchangeError::EventNotFound)?;
        let has_assignments = !event.registration_open
            && !event.reveal_open
            && self
                .store
                .participants_of_event(event.id)
                .await?
                .iter()
                .any(|p| p.assigned_to_id.is_some());

        let now = self.now();
        Ok(EventOverview {
            phase: phase_of(&event, has_assignments),
            countdown_active: event.is_countdown_active(now),
            reveal_locked: event.is_reveal_locked(now),
            event,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::{CloseRegistration, ManualClock};
    use crate::store::MemoryStore;
    use time::Duration;
    use time::macros::datetime;

    fn event(registration_open: bool, reveal_open: bool) -> Event {
        Event {
            id: 1,
            name: "Phases".to_string(),
            registration_open,
            reveal_open,
            countdown_at: None,
            reveal_at: None,
            created_at: datetime!(2025-11-01 0:00 UTC),
        }
    }

    #[test]
    fn test_phase_of() {
        assert_eq!(phase_of(&event(true, false), false), EventPhase::RegistrationOpen);
        assert_eq!(phase_of(&event(false, false), false), EventPhase::RegistrationClosed);
        assert_eq!(phase_of(&event(false, false), true), EventPhase::AssignmentsGenerated);
        assert_eq!(phase_of(&event(false, true), true), EventPhase::RevealOpen);
    }

    #[tokio::test]
    async fn test_describe_uses_injected_clock() {
        let clock = ManualClock::new(datetime!(2025-12-01 0:00 UTC));
        let exchange = GiftExchange::new(MemoryStore::new()).with_clock(clock.clone());
        let created = exchange
            .process(CreateEvent {
                name: "  Office Party ".to_string(),
                countdown_at: Some(datetime!(2025-12-10 0:00 UTC)),
                reveal_at: Some(datetime!(2025-12-20 0:00 UTC)),
            })
            .await
            .unwrap();
        assert_eq!(created.name, "Office Party");

        let overview = exchange
            .process(DescribeEvent {
                event_id: created.id,
            })
            .await
            .unwrap();
        assert_eq!(overview.phase, EventPhase::RegistrationOpen);
        assert!(overview.countdown_active);
        assert!(overview.reveal_locked);

        clock.advance(Duration::days(15));
        exchange
            .process(CloseRegistration {
                event_id: created.id,
            })
            .await
            .unwrap();
        let overview = exchange
            .process(DescribeEvent {
                event_id: created.id,
            })
            .await
            .unwrap();
        assert_eq!(overview.phase, EventPhase::RegistrationClosed);
        assert!(!overview.countdown_active);
        assert!(overview.reveal_locked);
    }

    #[tokio::test]
    async fn test_schedule_and_delete() {
        let exchange = GiftExchange::new(MemoryStore::new());
        let created = exchange
            .process(CreateEvent {
                name: "Temp".to_string(),
                countdown_at: None,
                reveal_at: None,
            })
            .await
            .unwrap();

        let reveal_at = datetime!(2025-12-24 18:00 UTC);
        let updated = exchange
            .process(UpdateSchedule {
                event_id: created.id,
                countdown_at: None,
                reveal_at: Some(reveal_at),
            })
            .await
            .unwrap();
        assert_eq!(updated.reveal_at, Some(reveal_at));

        exchange
            .process(DeleteEvent {
                event_id: created.id,
            })
            .await
            .unwrap();
        let err = exchange
            .process(GetEvent {
                event_id: created.id,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ExchangeError::EventNotFound));
        assert!(exchange.process(ListEvents).await.unwrap().is_empty());
    }
}
