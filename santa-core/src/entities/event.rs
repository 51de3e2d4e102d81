use crate::framework::{DatabaseProcessor, LockMode};
use kanau::processor::Processor;
use time::OffsetDateTime;

/// One gift exchange instance.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub registration_open: bool,
    pub reveal_open: bool,
    /// Display hint for a countdown; never gates anything.
    pub countdown_at: Option<OffsetDateTime>,
    /// Reveals are refused before this instant, whatever `reveal_open` says.
    pub reveal_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
}

impl Event {
    pub fn is_countdown_active(&self, now: OffsetDateTime) -> bool {
        self.countdown_at.is_some_and(|at| at > now)
    }

    pub fn is_reveal_locked(&self, now: OffsetDateTime) -> bool {
        self.reveal_at.is_some_and(|at| now < at)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventInsert {
    pub name: String,
    pub countdown_at: Option<OffsetDateTime>,
    pub reveal_at: Option<OffsetDateTime>,
}

impl Processor<EventInsert> for DatabaseProcessor {
    type Output = Event;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:InsertEvent")]
    async fn process(&self, insert: EventInsert) -> Result<Event, sqlx::Error> {
        sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (name, countdown_at, reveal_at)
            VALUES ($1, $2, $3)
            RETURNING id, name, registration_open, reveal_open, countdown_at, reveal_at, created_at
            "#,
        )
        .bind(insert.name)
        .bind(insert.countdown_at)
        .bind(insert.reveal_at)
        .fetch_one(&self.pool)
        .await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GetEventById {
    pub event_id: i64,
}

impl Processor<GetEventById> for DatabaseProcessor {
    type Output = Option<Event>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetEventById")]
    async fn process(&self, query: GetEventById) -> Result<Option<Event>, sqlx::Error> {
        sqlx::query_as::<_, Event>(
            r#"
            SELECT id, name, registration_open, reveal_open, countdown_at, reveal_at, created_at
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(query.event_id)
        .fetch_optional(&self.pool)
        .await
    }
}

#[derive(Debug, Clone, Copy)]
/// All events, newest first.
pub struct ListEvents;

impl Processor<ListEvents> for DatabaseProcessor {
    type Output = Vec<Event>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:ListEvents")]
    async fn process(&self, _query: ListEvents) -> Result<Vec<Event>, sqlx::Error> {
        sqlx::query_as::<_, Event>(
            r#"
            SELECT id, name, registration_open, reveal_open, countdown_at, reveal_at, created_at
            FROM events
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }
}

#[derive(Debug, Clone, Copy)]
/// Replace both schedule timestamps of an event.
pub struct UpdateEventSchedule {
    pub event_id: i64,
    pub countdown_at: Option<OffsetDateTime>,
    pub reveal_at: Option<OffsetDateTime>,
}

impl Processor<UpdateEventSchedule> for DatabaseProcessor {
    type Output = Option<Event>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:UpdateEventSchedule")]
    async fn process(&self, cmd: UpdateEventSchedule) -> Result<Option<Event>, sqlx::Error> {
        sqlx::query_as::<_, Event>(
            r#"
            UPDATE events
            SET countdown_at = $2, reveal_at = $3
            WHERE id = $1
            RETURNING id, name, registration_open, reveal_open, countdown_at, reveal_at, created_at
            "#,
        )
        .bind(cmd.event_id)
        .bind(cmd.countdown_at)
        .bind(cmd.reveal_at)
        .fetch_optional(&self.pool)
        .await
    }
}

#[derive(Debug, Clone, Copy)]
/// Delete an event; its participants go with it.
///
/// Returns whether a row was deleted.
pub struct DeleteEvent {
    pub event_id: i64,
}

impl Processor<DeleteEvent> for DatabaseProcessor {
    type Output = bool;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:DeleteEvent")]
    async fn process(&self, cmd: DeleteEvent) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(cmd.event_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

impl Event {
    /// Load an event and lock its row for the rest of the transaction.
    pub async fn lock_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        event_id: i64,
        mode: LockMode,
    ) -> Result<Option<Event>, sqlx::Error> {
        let sql = format!(
            "SELECT id, name, registration_open, reveal_open, countdown_at, reveal_at, created_at \
             FROM events WHERE id = $1 {}",
            mode.row_lock_clause()
        );
        sqlx::query_as::<_, Event>(&sql)
            .bind(event_id)
            .fetch_optional(&mut **tx)
            .await
    }

    pub async fn set_registration_open_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        event_id: i64,
        open: bool,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE events SET registration_open = $2 WHERE id = $1")
            .bind(event_id)
            .bind(open)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    pub async fn set_reveal_open_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        event_id: i64,
        open: bool,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE events SET reveal_open = $2 WHERE id = $1")
            .bind(event_id)
            .bind(open)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }
}
