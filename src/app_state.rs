use crate::{email_client::EmailClient, storage::PgMailingStore};
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub store: PgMailingStore,
    pub email_client: EmailClient,
}
