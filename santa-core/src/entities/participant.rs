use crate::framework::DatabaseProcessor;
use kanau::processor::Processor;
use santa_sdk::objects::admin::ParticipantStatusFilter;
use time::OffsetDateTime;

/// A registered person within one event.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Participant {
    pub id: i64,
    pub event_id: i64,
    pub external_id: String,
    pub display_name: String,
    pub reveal_token: String,
    /// Who this participant must gift. Always another participant of the
    /// same event; set for every participant of the event or for none.
    pub assigned_to_id: Option<i64>,
    pub has_revealed: bool,
    pub eligible_record_id: i64,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantInsert {
    pub event_id: i64,
    pub external_id: String,
    pub display_name: String,
    pub reveal_token: String,
    pub eligible_record_id: i64,
}

/// A participant joined with the name of its recipient, for listings.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ParticipantListing {
    pub id: i64,
    pub external_id: String,
    pub display_name: String,
    pub has_revealed: bool,
    pub assigned_to_name: Option<String>,
    pub created_at: OffsetDateTime,
}

const PARTICIPANT_COLUMNS: &str = "id, event_id, external_id, display_name, reveal_token, \
     assigned_to_id, has_revealed, eligible_record_id, created_at";

#[derive(Debug, Clone, Copy)]
/// Every participant of an event, ordered by id.
pub struct GetParticipantsOfEvent {
    pub event_id: i64,
}

impl Processor<GetParticipantsOfEvent> for DatabaseProcessor {
    type Output = Vec<Participant>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetParticipantsOfEvent")]
    async fn process(&self, query: GetParticipantsOfEvent) -> Result<Vec<Participant>, sqlx::Error> {
        let sql = format!(
            "SELECT {PARTICIPANT_COLUMNS} FROM participants WHERE event_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, Participant>(&sql)
            .bind(query.event_id)
            .fetch_all(&self.pool)
            .await
    }
}

#[derive(Debug, Clone, Copy)]
/// Paginated participant listing for the admin dashboard, newest first.
pub struct ListParticipants {
    pub event_id: i64,
    pub status: ParticipantStatusFilter,
    pub limit: i64,
    pub offset: i64,
}

impl Processor<ListParticipants> for DatabaseProcessor {
    type Output = Vec<ParticipantListing>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:ListParticipants")]
    async fn process(&self, query: ListParticipants) -> Result<Vec<ParticipantListing>, sqlx::Error> {
        let revealed = match query.status {
            ParticipantStatusFilter::All => None,
            ParticipantStatusFilter::Revealed => Some(true),
            ParticipantStatusFilter::Pending => Some(false),
        };
        sqlx::query_as::<_, ParticipantListing>(
            r#"
            SELECT
                p.id,
                p.external_id,
                p.display_name,
                p.has_revealed,
                r.display_name AS assigned_to_name,
                p.created_at
            FROM participants p
            LEFT JOIN participants r ON r.id = p.assigned_to_id
            WHERE p.event_id = $1
              AND ($2::boolean IS NULL OR p.has_revealed = $2)
            ORDER BY p.created_at DESC, p.id DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(query.event_id)
        .bind(revealed)
        .bind(query.limit)
        .bind(query.offset)
        .fetch_all(&self.pool)
        .await
    }
}

impl Participant {
    /// All participants of an event, optionally row-locked for update.
    pub async fn list_for_event_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        event_id: i64,
        for_update: bool,
    ) -> Result<Vec<Participant>, sqlx::Error> {
        let sql = format!(
            "SELECT {PARTICIPANT_COLUMNS} FROM participants WHERE event_id = $1 ORDER BY id {}",
            if for_update { "FOR UPDATE" } else { "" }
        );
        sqlx::query_as::<_, Participant>(&sql)
            .bind(event_id)
            .fetch_all(&mut **tx)
            .await
    }

    pub async fn get_in_event_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        event_id: i64,
        participant_id: i64,
    ) -> Result<Option<Participant>, sqlx::Error> {
        let sql = format!(
            "SELECT {PARTICIPANT_COLUMNS} FROM participants WHERE event_id = $1 AND id = $2"
        );
        sqlx::query_as::<_, Participant>(&sql)
            .bind(event_id)
            .bind(participant_id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Find the participant holding both credentials and lock its row.
    ///
    /// Both values must match exactly.
    pub async fn lock_by_credentials_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        event_id: i64,
        external_id: &str,
        reveal_token: &str,
    ) -> Result<Option<Participant>, sqlx::Error> {
        let sql = format!(
            "SELECT {PARTICIPANT_COLUMNS} FROM participants \
             WHERE event_id = $1 AND external_id = $2 AND reveal_token = $3 \
             FOR UPDATE"
        );
        sqlx::query_as::<_, Participant>(&sql)
            .bind(event_id)
            .bind(external_id)
            .bind(reveal_token)
            .fetch_optional(&mut **tx)
            .await
    }

    pub async fn exists_in_event_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        event_id: i64,
        external_id: &str,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM participants WHERE event_id = $1 AND external_id = $2
            )
            "#,
        )
        .bind(event_id)
        .bind(external_id)
        .fetch_one(&mut **tx)
        .await
    }

    pub async fn insert_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        insert: ParticipantInsert,
    ) -> Result<Participant, sqlx::Error> {
        let sql = format!(
            "INSERT INTO participants \
             (event_id, external_id, display_name, reveal_token, eligible_record_id) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {PARTICIPANT_COLUMNS}"
        );
        sqlx::query_as::<_, Participant>(&sql)
            .bind(insert.event_id)
            .bind(insert.external_id)
            .bind(insert.display_name)
            .bind(insert.reveal_token)
            .bind(insert.eligible_record_id)
            .fetch_one(&mut **tx)
            .await
    }

    /// Set `assigned_to_id` for many givers in a single statement.
    ///
    /// `giver_ids[i]` gets `recipient_ids[i]`.
    pub async fn assign_many_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        event_id: i64,
        giver_ids: &[i64],
        recipient_ids: &[i64],
    ) -> Result<u64, sqlx::Error> {
        if giver_ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query(
            r#"
            UPDATE participants AS p
            SET assigned_to_id = u.recipient_id
            FROM UNNEST($2::bigint[], $3::bigint[]) AS u(giver_id, recipient_id)
            WHERE p.id = u.giver_id AND p.event_id = $1
            "#,
        )
        .bind(event_id)
        .bind(giver_ids)
        .bind(recipient_ids)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected())
    }

    /// Clear every assignment and reveal flag of an event.
    ///
    /// Returns the number of participants that had anything to clear.
    pub async fn clear_assignments_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        event_id: i64,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE participants
            SET assigned_to_id = NULL, has_revealed = false
            WHERE event_id = $1
              AND (assigned_to_id IS NOT NULL OR has_revealed)
            "#,
        )
        .bind(event_id)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn mark_revealed_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        participant_id: i64,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE participants SET has_revealed = true WHERE id = $1 AND NOT has_revealed",
        )
        .bind(participant_id)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected())
    }
}
