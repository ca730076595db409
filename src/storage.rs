use crate::{
    dispatch::{MailingStore, NewAttempt},
    domain::{Mailing, MailingStatus, MessageContent, Recipient},
};
use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

/// [`MailingStore`] backed by Postgres.
#[derive(Clone)]
pub struct PgMailingStore {
    db_pool: PgPool,
}

impl PgMailingStore {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl MailingStore for PgMailingStore {
    #[tracing::instrument(skip(self))]
    async fn find_mailing(&self, id: Uuid) -> Result<Option<Mailing>, anyhow::Error> {
        let mailing = sqlx::query_as::<_, Mailing>(
            r#"
            SELECT id, message_id, start_time, end_time, status, is_active, owner
            FROM mailings
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(mailing)
    }

    #[tracing::instrument(skip(self))]
    async fn due_mailings(&self, now: OffsetDateTime) -> Result<Vec<Mailing>, anyhow::Error> {
        let mailings = sqlx::query_as::<_, Mailing>(
            r#"
            SELECT id, message_id, start_time, end_time, status, is_active, owner
            FROM mailings
            WHERE is_active AND status <> $1 AND start_time <= $2
            ORDER BY start_time, end_time
            "#,
        )
        .bind(MailingStatus::Launched.as_ref())
        .bind(now)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(mailings)
    }

    #[tracing::instrument(skip(self))]
    async fn claim_launch(&self, id: Uuid) -> Result<bool, anyhow::Error> {
        // Single conditional update; two dispatchers racing for the same
        // mailing cannot both see rows_affected = 1.
        let result = sqlx::query(
            r#"
            UPDATE mailings
            SET status = $1
            WHERE id = $2 AND is_active AND status <> $1
            "#,
        )
        .bind(MailingStatus::Launched.as_ref())
        .bind(id)
        .execute(&self.db_pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self))]
    async fn recipients(&self, mailing_id: Uuid) -> Result<Vec<Recipient>, anyhow::Error> {
        let recipients = sqlx::query_as::<_, Recipient>(
            r#"
            SELECT r.id, r.email, r.full_name, r.comment, r.owner
            FROM recipients r
            JOIN mailing_recipients mr ON mr.recipient_id = r.id
            WHERE mr.mailing_id = $1
            ORDER BY r.email, r.full_name
            "#,
        )
        .bind(mailing_id)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(recipients)
    }

    #[tracing::instrument(skip(self))]
    async fn message_content(&self, message_id: Uuid) -> Result<MessageContent, anyhow::Error> {
        let message = sqlx::query_as::<_, MessageContent>(
            r#"
            SELECT subject, body
            FROM messages
            WHERE id = $1
            "#,
        )
        .bind(message_id)
        .fetch_one(&self.db_pool)
        .await?;

        Ok(message)
    }

    #[tracing::instrument(skip(self, attempt), fields(mailing_id = %attempt.mailing_id))]
    async fn append_attempt(&self, attempt: NewAttempt) -> Result<(), anyhow::Error> {
        sqlx::query(
            r#"
            INSERT INTO attempts (id, created_at, status, server_response, mailing_id)
            VALUES ($1, now(), $2, $3, $4)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(attempt.status.as_ref())
        .bind(&attempt.server_response)
        .bind(attempt.mailing_id)
        .execute(&self.db_pool)
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn mark_completed(&self, id: Uuid) -> Result<(), anyhow::Error> {
        sqlx::query(
            r#"
            UPDATE mailings
            SET status = $1
            WHERE id = $2
            "#,
        )
        .bind(MailingStatus::Completed.as_ref())
        .bind(id)
        .execute(&self.db_pool)
        .await?;

        Ok(())
    }
}
