//! Event lifecycle transitions.
//!
//! ```text
//! registration_open -> registration_closed -> assignments_generated -> reveal_open
//!                              ^                       |                    |
//!                              +------- reset ---------+--------------------+
//! ```
//!
//! Registration never reopens.

use super::derangement;
use super::{Clock, ExchangeError, GiftExchange, InvalidTransition};
use crate::entities::event::Event;
use crate::framework::LockMode;
use crate::store::{EventScope, ExchangeStore};
use kanau::processor::Processor;
use tracing::info;

#[derive(Debug, Clone, Copy)]
pub struct CloseRegistration {
    pub event_id: i64,
}

#[derive(Debug, Clone, Copy)]
pub struct GenerateAssignments {
    pub event_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignmentOutcome {
    pub event_id: i64,
    pub assigned: u64,
    /// Shuffles the sampler needed.
    pub attempts: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct OpenReveal {
    pub event_id: i64,
}

#[derive(Debug, Clone, Copy)]
pub struct ResetAssignments {
    pub event_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetOutcome {
    pub event_id: i64,
    /// Participants that had an assignment or a reveal to clear.
    pub cleared: u64,
}

impl<S: ExchangeStore, C: Clock> Processor<CloseRegistration> for GiftExchange<S, C> {
    type Output = Event;
    type Error = ExchangeError;
    #[tracing::instrument(skip_all, err, name = "Exchange:CloseRegistration")]
    async fn process(&self, cmd: CloseRegistration) -> Result<Event, ExchangeError> {
        let mut scope = self.begin(cmd.event_id, LockMode::Exclusive).await?;
        if !scope.event().registration_open {
            return Err(InvalidTransition::RegistrationAlreadyClosed.into());
        }

        scope.set_registration_open(false).await?;
        let event = scope.event().clone();
        scope.commit().await?;

        info!(event_id = event.id, "Registration closed");
        Ok(event)
    }
}

impl<S: ExchangeStore, C: Clock> Processor<GenerateAssignments> for GiftExchange<S, C> {
    type Output = AssignmentOutcome;
    type Error = ExchangeError;
    #[tracing::instrument(skip_all, err, name = "Exchange:GenerateAssignments")]
    async fn process(&self, cmd: GenerateAssignments) -> Result<AssignmentOutcome, ExchangeError> {
        let mut scope = self.begin(cmd.event_id, LockMode::Exclusive).await?;
        if scope.event().registration_open {
            return Err(InvalidTransition::RegistrationStillOpen.into());
        }

        let participants = scope.participants().await?;
        if participants.len() < 2 {
            return Err(ExchangeError::InsufficientParticipants);
        }
        if participants.iter().any(|p| p.assigned_to_id.is_some()) {
            return Err(ExchangeError::AlreadyAssigned);
        }

        let sampled = {
            let mut rng = rand::rng();
            derangement::sample(participants.len(), &mut rng)
        };
        let Some(sampled) = sampled else {
            return Err(ExchangeError::InsufficientParticipants);
        };

        let pairs: Vec<(i64, i64)> = participants
            .iter()
            .zip(&sampled.targets)
            .map(|(giver, &target)| (giver.id, participants[target].id))
            .collect();
        let assigned = scope.assign(&pairs).await?;
        scope.commit().await?;

        info!(
            event_id = cmd.event_id,
            assigned,
            attempts = sampled.attempts,
            "Assignments generated"
        );
        Ok(AssignmentOutcome {
            event_id: cmd.event_id,
            assigned,
            attempts: sampled.attempts,
        })
    }
}

impl<S: ExchangeStore, C: Clock> Processor<OpenReveal> for GiftExchange<S, C> {
    type Output = Event;
    type Error = ExchangeError;
    #[tracing::instrument(skip_all, err, name = "Exchange:OpenReveal")]
    async fn process(&self, cmd: OpenReveal) -> Result<Event, ExchangeError> {
        let mut scope = self.begin(cmd.event_id, LockMode::Exclusive).await?;
        if scope.event().registration_open {
            return Err(InvalidTransition::RevealNeedsClosedRegistration.into());
        }
        let participants = scope.participants().await?;
        if !participants.iter().any(|p| p.assigned_to_id.is_some()) {
            return Err(InvalidTransition::NoAssignments.into());
        }

        scope.set_reveal_open(true).await?;
        let event = scope.event().clone();
        scope.commit().await?;

        info!(event_id = event.id, "Reveal opened");
        Ok(event)
    }
}

impl<S: ExchangeStore, C: Clock> Processor<ResetAssignments> for GiftExchange<S, C> {
    type Output = ResetOutcome;
    type Error = ExchangeError;
    #[tracing::instrument(skip_all, err, name = "Exchange:ResetAssignments")]
    async fn process(&self, cmd: ResetAssignments) -> Result<ResetOutcome, ExchangeError> {
        let mut scope = self.begin(cmd.event_id, LockMode::Exclusive).await?;
        if scope.participants().await?.is_empty() {
            return Err(ExchangeError::NoParticipants);
        }

        let cleared = scope.clear_assignments().await?;
        scope.set_reveal_open(false).await?;
        scope.commit().await?;

        info!(event_id = cmd.event_id, cleared, "Assignments reset");
        Ok(ResetOutcome {
            event_id: cmd.event_id,
            cleared,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::event::EventInsert;
    use crate::entities::participant::ParticipantInsert;
    use crate::store::MemoryStore;

    async fn event_with(store: &MemoryStore, names: &[&str]) -> i64 {
        let event = store
            .create_event(EventInsert {
                name: "Lifecycle".to_string(),
                countdown_at: None,
                reveal_at: None,
            })
            .await
            .unwrap();
        let mut scope = store.begin(event.id, LockMode::Shared).await.unwrap().unwrap();
        for (i, name) in names.iter().enumerate() {
            scope
                .insert_participant(ParticipantInsert {
                    event_id: event.id,
                    external_id: format!("UG22ICT{i:04}"),
                    display_name: name.to_string(),
                    reveal_token: format!("TOKEN{i:011}"),
                    eligible_record_id: i as i64 + 1,
                })
                .await
                .unwrap();
        }
        scope.commit().await.unwrap();
        event.id
    }

    #[tokio::test]
    async fn test_close_registration_only_once() {
        let store = MemoryStore::new();
        let event_id = event_with(&store, &[]).await;
        let exchange = GiftExchange::new(store);

        let event = exchange.process(CloseRegistration { event_id }).await.unwrap();
        assert!(!event.registration_open);
        let err = exchange
            .process(CloseRegistration { event_id })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ExchangeError::InvalidTransition(InvalidTransition::RegistrationAlreadyClosed)
        ));
    }

    #[tokio::test]
    async fn test_generate_requires_closed_registration() {
        let store = MemoryStore::new();
        let event_id = event_with(&store, &["Ama", "Kofi"]).await;
        let exchange = GiftExchange::new(store);

        let err = exchange
            .process(GenerateAssignments { event_id })
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Registration must be closed before generating assignments."
        );
    }

    #[tokio::test]
    async fn test_generate_assigns_everyone() {
        let store = MemoryStore::new();
        let event_id = event_with(&store, &["Ama", "Kofi", "Efua", "Yaw"]).await;
        let exchange = GiftExchange::new(store.clone());
        exchange.process(CloseRegistration { event_id }).await.unwrap();

        let outcome = exchange
            .process(GenerateAssignments { event_id })
            .await
            .unwrap();
        assert_eq!(outcome.assigned, 4);
        assert!(outcome.attempts >= 1);

        let participants = store.participants_of_event(event_id).await.unwrap();
        let mut recipients: Vec<i64> = participants
            .iter()
            .map(|p| {
                let to = p.assigned_to_id.unwrap();
                assert_ne!(to, p.id);
                to
            })
            .collect();
        recipients.sort_unstable();
        let mut ids: Vec<i64> = participants.iter().map(|p| p.id).collect();
        ids.sort_unstable();
        assert_eq!(recipients, ids);
    }

    #[tokio::test]
    async fn test_open_reveal_needs_assignments() {
        let store = MemoryStore::new();
        let event_id = event_with(&store, &["Ama", "Kofi"]).await;
        let exchange = GiftExchange::new(store);

        let err = exchange.process(OpenReveal { event_id }).await.unwrap_err();
        assert_eq!(err.to_string(), "Close registration before opening reveal.");

        exchange.process(CloseRegistration { event_id }).await.unwrap();
        let err = exchange.process(OpenReveal { event_id }).await.unwrap_err();
        assert_eq!(err.to_string(), "Assignments have not been generated.");

        exchange
            .process(GenerateAssignments { event_id })
            .await
            .unwrap();
        let event = exchange.process(OpenReveal { event_id }).await.unwrap();
        assert!(event.reveal_open);
    }

    #[tokio::test]
    async fn test_reset_closes_reveal() {
        let store = MemoryStore::new();
        let event_id = event_with(&store, &["Ama", "Kofi", "Efua"]).await;
        let exchange = GiftExchange::new(store.clone());
        exchange.process(CloseRegistration { event_id }).await.unwrap();
        exchange
            .process(GenerateAssignments { event_id })
            .await
            .unwrap();
        exchange.process(OpenReveal { event_id }).await.unwrap();

        let outcome = exchange
            .process(ResetAssignments { event_id })
            .await
            .unwrap();
        assert_eq!(outcome.cleared, 3);
        let event = store.get_event(event_id).await.unwrap().unwrap();
        assert!(!event.reveal_open);
        assert!(!event.registration_open);
        assert!(
            store
                .participants_of_event(event_id)
                .await
                .unwrap()
                .iter()
                .all(|p| p.assigned_to_id.is_none() && !p.has_revealed)
        );
    }

    #[tokio::test]
    async fn test_reset_without_participants() {
        let store = MemoryStore::new();
        let event_id = event_with(&store, &[]).await;
        let exchange = GiftExchange::new(store);
        let err = exchange
            .process(ResetAssignments { event_id })
            .await
            .unwrap_err();
        assert!(matches!(err, ExchangeError::NoParticipants));
    }

    #[tokio::test]
    async fn test_unknown_event() {
        let exchange = GiftExchange::new(MemoryStore::new());
        let err = exchange
            .process(CloseRegistration { event_id: 404 })
            .await
            .unwrap_err();
        assert!(matches!(err, ExchangeError::EventNotFound));
    }
}
