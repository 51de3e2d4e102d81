use super::token::issue_reveal_token;
use super::{Clock, ExchangeError, GiftExchange};
use crate::config::normalize_external_id;
use crate::entities::participant::{Participant, ParticipantInsert};
use crate::framework::LockMode;
use crate::store::{EligibilityRegistry, EventScope, ExchangeStore, REVEAL_TOKEN_KEY, StoreError};
use kanau::processor::Processor;
use tracing::info;

/// Register an eligible person for an event.
///
/// The participant's name always comes from the roster;
/// `display_name` is accepted for API compatibility and ignored.
#[derive(Debug, Clone)]
pub struct Register {
    pub event_id: i64,
    pub display_name: String,
    pub external_id: String,
}

/// A unique violation while registering means another registration for the
/// same person won; only a token collision is a genuine failure.
fn registration_conflict(err: StoreError) -> ExchangeError {
    match err {
        StoreError::Duplicate { constraint } if constraint != REVEAL_TOKEN_KEY => {
            ExchangeError::AlreadyRegistered
        }
        other => other.into(),
    }
}

impl<S: ExchangeStore, C: Clock> Processor<Register> for GiftExchange<S, C> {
    type Output = Participant;
    type Error = ExchangeError;
    #[tracing::instrument(skip_all, err, name = "Exchange:Register")]
    async fn process(&self, cmd: Register) -> Result<Participant, ExchangeError> {
        let external_id = normalize_external_id(&cmd.external_id);
        let mut scope = self.begin(cmd.event_id, LockMode::Shared).await?;
        if !scope.event().registration_open {
            return Err(ExchangeError::RegistrationClosed);
        }

        let Some(eligible) = scope.lock_eligible(&external_id).await? else {
            return Err(ExchangeError::NotEligible);
        };
        if eligible.is_registered || scope.participant_exists(&external_id).await? {
            return Err(ExchangeError::AlreadyRegistered);
        }

        let reveal_token = issue_reveal_token(&self.rng)?;
        let participant = scope
            .insert_participant(ParticipantInsert {
                event_id: cmd.event_id,
                external_id,
                display_name: eligible.display_name,
                reveal_token,
                eligible_record_id: eligible.id,
            })
            .await
            .map_err(registration_conflict)?;
        if !scope.mark_registered(eligible.id).await? {
            return Err(ExchangeError::AlreadyRegistered);
        }
        scope.commit().await.map_err(registration_conflict)?;

        info!(
            event_id = cmd.event_id,
            participant_id = participant.id,
            "Participant registered"
        );
        Ok(participant)
    }
}
