use super::RecipientEmail;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct Recipient {
    pub id: Uuid,
    pub email: RecipientEmail,
    pub full_name: Option<String>,
    pub comment: Option<String>,
    pub owner: Option<Uuid>,
}
