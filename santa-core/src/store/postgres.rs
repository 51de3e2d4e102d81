use super::{EligibilityRegistry, EventScope, ExchangeStore, ImportCounts, StoreError};
use crate::entities::eligible_student::{
    EligibleStudent, EligibleStudentInsert, GetEligibleStudentByExternalId, ListEligibleStudents,
};
use crate::entities::event::{
    DeleteEvent, Event, EventInsert, GetEventById, ListEvents, UpdateEventSchedule,
};
use crate::entities::participant::{
    GetParticipantsOfEvent, ListParticipants, Participant, ParticipantInsert, ParticipantListing,
};
use crate::framework::{DatabaseProcessor, LockMode};
use kanau::processor::Processor;
use sqlx::{PgPool, Postgres, Transaction};

/// Postgres-backed store. Event scopes are transactions holding a row lock
/// on the event.
pub struct PgStore {
    db: DatabaseProcessor,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            db: DatabaseProcessor { pool },
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.db.pool
    }
}

pub struct PgEventScope {
    tx: Transaction<'static, Postgres>,
    event: Event,
    mode: LockMode,
}

impl EligibilityRegistry for PgEventScope {
    async fn lock_eligible(
        &mut self,
        external_id: &str,
    ) -> Result<Option<EligibleStudent>, StoreError> {
        Ok(EligibleStudent::lock_by_external_id_tx(&mut self.tx, external_id).await?)
    }

    async fn mark_registered(&mut self, eligible_id: i64) -> Result<bool, StoreError> {
        let rows = EligibleStudent::mark_registered_tx(&mut self.tx, eligible_id).await?;
        Ok(rows > 0)
    }
}

impl EventScope for PgEventScope {
    fn event(&self) -> &Event {
        &self.event
    }

    async fn participants(&mut self) -> Result<Vec<Participant>, StoreError> {
        let for_update = self.mode == LockMode::Exclusive;
        Ok(Participant::list_for_event_tx(&mut self.tx, self.event.id, for_update).await?)
    }

    async fn participant_exists(&mut self, external_id: &str) -> Result<bool, StoreError> {
        Ok(Participant::exists_in_event_tx(&mut self.tx, self.event.id, external_id).await?)
    }

    async fn insert_participant(
        &mut self,
        insert: ParticipantInsert,
    ) -> Result<Participant, StoreError> {
        Ok(Participant::insert_tx(&mut self.tx, insert).await?)
    }

    async fn lock_participant_by_credentials(
        &mut self,
        external_id: &str,
        reveal_token: &str,
    ) -> Result<Option<Participant>, StoreError> {
        Ok(Participant::lock_by_credentials_tx(
            &mut self.tx,
            self.event.id,
            external_id,
            reveal_token,
        )
        .await?)
    }

    async fn participant(&mut self, participant_id: i64) -> Result<Option<Participant>, StoreError> {
        Ok(Participant::get_in_event_tx(&mut self.tx, self.event.id, participant_id).await?)
    }

    async fn assign(&mut self, pairs: &[(i64, i64)]) -> Result<u64, StoreError> {
        let (givers, recipients): (Vec<i64>, Vec<i64>) = pairs.iter().copied().unzip();
        Ok(Participant::assign_many_tx(&mut self.tx, self.event.id, &givers, &recipients).await?)
    }

    async fn clear_assignments(&mut self) -> Result<u64, StoreError> {
        Ok(Participant::clear_assignments_tx(&mut self.tx, self.event.id).await?)
    }

    async fn mark_revealed(&mut self, participant_id: i64) -> Result<bool, StoreError> {
        let rows = Participant::mark_revealed_tx(&mut self.tx, participant_id).await?;
        Ok(rows > 0)
    }

    async fn set_registration_open(&mut self, open: bool) -> Result<(), StoreError> {
        Event::set_registration_open_tx(&mut self.tx, self.event.id, open).await?;
        self.event.registration_open = open;
        Ok(())
    }

    async fn set_reveal_open(&mut self, open: bool) -> Result<(), StoreError> {
        Event::set_reveal_open_tx(&mut self.tx, self.event.id, open).await?;
        self.event.reveal_open = open;
        Ok(())
    }

    async fn commit(self) -> Result<(), StoreError> {
        Ok(self.tx.commit().await?)
    }
}

impl ExchangeStore for PgStore {
    type Scope = PgEventScope;

    #[tracing::instrument(skip_all, err, name = "SQL:BeginEventScope")]
    async fn begin(
        &self,
        event_id: i64,
        mode: LockMode,
    ) -> Result<Option<PgEventScope>, StoreError> {
        let mut tx = self.db.pool.begin().await?;
        let Some(event) = Event::lock_tx(&mut tx, event_id, mode).await? else {
            return Ok(None);
        };
        Ok(Some(PgEventScope { tx, event, mode }))
    }

    async fn create_event(&self, insert: EventInsert) -> Result<Event, StoreError> {
        Ok(self.db.process(insert).await?)
    }

    async fn get_event(&self, event_id: i64) -> Result<Option<Event>, StoreError> {
        Ok(self.db.process(GetEventById { event_id }).await?)
    }

    async fn list_events(&self) -> Result<Vec<Event>, StoreError> {
        Ok(self.db.process(ListEvents).await?)
    }

    async fn update_schedule(
        &self,
        update: UpdateEventSchedule,
    ) -> Result<Option<Event>, StoreError> {
        Ok(self.db.process(update).await?)
    }

    async fn delete_event(&self, event_id: i64) -> Result<bool, StoreError> {
        Ok(self.db.process(DeleteEvent { event_id }).await?)
    }

    async fn participants_of_event(&self, event_id: i64) -> Result<Vec<Participant>, StoreError> {
        Ok(self.db.process(GetParticipantsOfEvent { event_id }).await?)
    }

    async fn list_participants(
        &self,
        query: ListParticipants,
    ) -> Result<Vec<ParticipantListing>, StoreError> {
        Ok(self.db.process(query).await?)
    }

    async fn find_eligible(&self, external_id: &str) -> Result<Option<EligibleStudent>, StoreError> {
        Ok(self
            .db
            .process(GetEligibleStudentByExternalId {
                external_id: external_id.to_string(),
            })
            .await?)
    }

    async fn list_eligible(
        &self,
        query: ListEligibleStudents,
    ) -> Result<Vec<EligibleStudent>, StoreError> {
        Ok(self.db.process(query).await?)
    }

    #[tracing::instrument(skip_all, err, name = "SQL:ImportEligibleStudents")]
    async fn import_eligible(
        &self,
        records: Vec<EligibleStudentInsert>,
        update_existing: bool,
    ) -> Result<ImportCounts, StoreError> {
        let mut tx = self.db.pool.begin().await?;
        let mut counts = ImportCounts::default();
        for record in &records {
            if EligibleStudent::insert_if_absent_tx(&mut tx, record).await? {
                counts.created += 1;
            } else if update_existing {
                EligibleStudent::update_name_tx(&mut tx, record).await?;
                counts.updated += 1;
            } else {
                counts.skipped += 1;
            }
        }
        tx.commit().await?;
        Ok(counts)
    }
}
