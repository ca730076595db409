use crate::domain::{AttemptStatus, Mailing, MessageContent, Recipient};
use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

/// Persistence contract consumed by the dispatch engine.
///
/// The engine never talks to the database directly; everything it needs is
/// behind this trait so its semantics can be tested without Postgres.
#[async_trait]
pub trait MailingStore: Send + Sync {
    async fn find_mailing(&self, id: Uuid) -> Result<Option<Mailing>, anyhow::Error>;

    /// Mailings due for scheduled dispatch at `now`:
    /// active, not currently launched, and past their start time.
    async fn due_mailings(&self, now: OffsetDateTime) -> Result<Vec<Mailing>, anyhow::Error>;

    /// Atomically flip the mailing to `Launched`.
    ///
    /// Returns `false` when the mailing is already launched or inactive, in
    /// which case the caller must not dispatch. This single conditional
    /// update is what keeps a concurrent scanner and a manual trigger from
    /// both sending the same mailing.
    async fn claim_launch(&self, id: Uuid) -> Result<bool, anyhow::Error>;

    /// The mailing's current recipient set, in stable (email, full name) order.
    async fn recipients(&self, mailing_id: Uuid) -> Result<Vec<Recipient>, anyhow::Error>;

    /// Live read of the message content, deliberately not cached: a re-launch
    /// sends whatever the message says at that moment.
    async fn message_content(&self, message_id: Uuid) -> Result<MessageContent, anyhow::Error>;

    async fn append_attempt(&self, attempt: NewAttempt) -> Result<(), anyhow::Error>;

    async fn mark_completed(&self, id: Uuid) -> Result<(), anyhow::Error>;
}

/// One delivery outcome, about to be appended to the attempt log.
#[derive(Debug, Clone)]
pub struct NewAttempt {
    pub mailing_id: Uuid,
    pub status: AttemptStatus,
    pub server_response: String,
}

impl NewAttempt {
    pub fn successful(mailing_id: Uuid) -> Self {
        Self {
            mailing_id,
            status: AttemptStatus::Successful,
            server_response: "Message accepted by the mail server.".to_string(),
        }
    }

    pub fn failed(mailing_id: Uuid, server_response: String) -> Self {
        Self {
            mailing_id,
            status: AttemptStatus::Failed,
            server_response,
        }
    }
}
