use super::MailingStatus;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// A campaign binding one message to a recipient set and a delivery window.
///
/// The recipient set lives in a join table and is re-read at dispatch time;
/// it is not part of this record.
#[derive(Debug, Clone, FromRow)]
pub struct Mailing {
    pub id: Uuid,
    pub message_id: Uuid,
    pub start_time: OffsetDateTime,
    pub end_time: Option<OffsetDateTime>,
    pub status: MailingStatus,
    pub is_active: bool,
    pub owner: Option<Uuid>,
}
