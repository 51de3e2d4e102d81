use super::{Clock, ExchangeError, GiftExchange};
use crate::config::normalize_external_id;
use crate::framework::LockMode;
use crate::store::{EventScope, ExchangeStore};
use kanau::processor::Processor;
use tracing::info;

/// Reveal who a participant must gift. The token is the capability.
#[derive(Clone)]
pub struct RevealAssignment {
    pub event_id: i64,
    pub external_id: String,
    pub token: String,
}

impl std::fmt::Debug for RevealAssignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevealAssignment")
            .field("event_id", &self.event_id)
            .field("external_id", &self.external_id)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// What a participant learns on reveal. Never carries the recipient's
/// token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealedRecipient {
    pub display_name: String,
    pub initials: String,
}

/// Upper-cased first letters of the first and last words of a name.
pub fn initials(name: &str) -> String {
    let first_letter = |word: &str| {
        word.chars()
            .next()
            .map(|c| c.to_uppercase().collect::<String>())
            .unwrap_or_default()
    };
    let mut words = name.split_whitespace();
    let Some(first) = words.next() else {
        return String::new();
    };
    let mut out = first_letter(first);
    if let Some(last) = words.last() {
        out.push_str(&first_letter(last));
    }
    out
}

impl<S: ExchangeStore, C: Clock> Processor<RevealAssignment> for GiftExchange<S, C> {
    type Output = RevealedRecipient;
    type Error = ExchangeError;
    #[tracing::instrument(skip_all, err, name = "Exchange:RevealAssignment")]
    async fn process(&self, cmd: RevealAssignment) -> Result<RevealedRecipient, ExchangeError> {
        let external_id = normalize_external_id(&cmd.external_id);
        let token = cmd.token.trim();

        let mut scope = self.begin(cmd.event_id, LockMode::Shared).await?;
        if let Some(until) = scope.event().reveal_at
            && self.now() < until
        {
            return Err(ExchangeError::RevealLocked { until });
        }

        let Some(participant) = scope
            .lock_participant_by_credentials(&external_id, token)
            .await?
        else {
            return Err(ExchangeError::InvalidCredentials);
        };
        if !scope.event().reveal_open {
            return Err(ExchangeError::RevealNotOpen);
        }
        if participant.has_revealed {
            return Err(ExchangeError::AlreadyRevealed);
        }
        let Some(recipient_id) = participant.assigned_to_id else {
            return Err(ExchangeError::NotAssignedYet);
        };
        let Some(recipient) = scope.participant(recipient_id).await? else {
            return Err(ExchangeError::NotAssignedYet);
        };

        if !scope.mark_revealed(participant.id).await? {
            return Err(ExchangeError::AlreadyRevealed);
        }
        scope.commit().await?;

        info!(
            event_id = cmd.event_id,
            participant_id = participant.id,
            "Assignment revealed"
        );
        Ok(RevealedRecipient {
            initials: initials(&recipient.display_name),
            display_name: recipient.display_name,
        })
    }
}
