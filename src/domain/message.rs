use super::MessageSubject;
use sqlx::FromRow;

/// What actually goes out on the wire for a mailing.
///
/// Re-read from storage at send time, so editing a message changes what a
/// future re-launch delivers.
#[derive(Debug, Clone, FromRow)]
pub struct MessageContent {
    pub subject: MessageSubject,
    pub body: String,
}
