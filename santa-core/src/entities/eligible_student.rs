use crate::framework::DatabaseProcessor;
use kanau::processor::Processor;

/// A roster entry: someone allowed to register.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct EligibleStudent {
    pub id: i64,
    pub external_id: String,
    pub display_name: String,
    /// Flips to true at the one successful registration and stays true.
    pub is_registered: bool,
}

/// Data for inserting or updating a roster entry.
///
/// `external_id` is expected in normalized form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibleStudentInsert {
    pub external_id: String,
    pub display_name: String,
}

#[derive(Debug, Clone)]
pub struct GetEligibleStudentByExternalId {
    pub external_id: String,
}

impl Processor<GetEligibleStudentByExternalId> for DatabaseProcessor {
    type Output = Option<EligibleStudent>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetEligibleStudentByExternalId")]
    async fn process(
        &self,
        query: GetEligibleStudentByExternalId,
    ) -> Result<Option<EligibleStudent>, sqlx::Error> {
        sqlx::query_as::<_, EligibleStudent>(
            r#"
            SELECT id, external_id, display_name, is_registered
            FROM eligible_students
            WHERE external_id = $1
            "#,
        )
        .bind(query.external_id)
        .fetch_optional(&self.pool)
        .await
    }
}

#[derive(Debug, Clone, Copy)]
/// Paginated roster listing, ordered by name.
pub struct ListEligibleStudents {
    pub registered: Option<bool>,
    pub limit: i64,
    pub offset: i64,
}

impl Processor<ListEligibleStudents> for DatabaseProcessor {
    type Output = Vec<EligibleStudent>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:ListEligibleStudents")]
    async fn process(
        &self,
        query: ListEligibleStudents,
    ) -> Result<Vec<EligibleStudent>, sqlx::Error> {
        sqlx::query_as::<_, EligibleStudent>(
            r#"
            SELECT id, external_id, display_name, is_registered
            FROM eligible_students
            WHERE ($1::boolean IS NULL OR is_registered = $1)
            ORDER BY display_name, id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(query.registered)
        .bind(query.limit)
        .bind(query.offset)
        .fetch_all(&self.pool)
        .await
    }
}

impl EligibleStudent {
    /// Find a roster entry and lock its row for the rest of the transaction.
    pub async fn lock_by_external_id_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        external_id: &str,
    ) -> Result<Option<EligibleStudent>, sqlx::Error> {
        sqlx::query_as::<_, EligibleStudent>(
            r#"
            SELECT id, external_id, display_name, is_registered
            FROM eligible_students
            WHERE external_id = $1
            FOR UPDATE
            "#,
        )
        .bind(external_id)
        .fetch_optional(&mut **tx)
        .await
    }

    /// Returns the number of rows flipped; 0 if it was already registered.
    pub async fn mark_registered_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        eligible_id: i64,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE eligible_students SET is_registered = true WHERE id = $1 AND NOT is_registered",
        )
        .bind(eligible_id)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected())
    }

    /// Insert a roster entry unless its external id is already present.
    ///
    /// Returns whether a row was created.
    pub async fn insert_if_absent_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        insert: &EligibleStudentInsert,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO eligible_students (external_id, display_name)
            VALUES ($1, $2)
            ON CONFLICT (external_id) DO NOTHING
            "#,
        )
        .bind(&insert.external_id)
        .bind(&insert.display_name)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn update_name_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        insert: &EligibleStudentInsert,
    ) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("UPDATE eligible_students SET display_name = $2 WHERE external_id = $1")
                .bind(&insert.external_id)
                .bind(&insert.display_name)
                .execute(&mut **tx)
                .await?;
        Ok(result.rows_affected())
    }
}
