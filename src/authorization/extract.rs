use super::{Actor, Role};
use crate::app_state::AppState;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use sqlx::Row;
use uuid::Uuid;

// Authentication itself is the fronting proxy's job; it passes the verified
// user id along in this header.
const USER_ID_HEADER: &str = "x-user-id";

#[async_trait]
impl FromRequestParts<AppState> for Actor {
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| Uuid::parse_str(value).ok())
            .ok_or(StatusCode::UNAUTHORIZED)?;

        let row = sqlx::query("SELECT is_manager, is_superuser FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&state.db_pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to resolve actor role: {e:?}");
                StatusCode::INTERNAL_SERVER_ERROR
            })?
            .ok_or(StatusCode::UNAUTHORIZED)?;

        let (is_manager, is_superuser) = row
            .try_get("is_manager")
            .and_then(|m| row.try_get("is_superuser").map(|s| (m, s)))
            .map_err(|e| {
                tracing::error!("Malformed users row: {e:?}");
                StatusCode::INTERNAL_SERVER_ERROR
            })?;

        Ok(Actor {
            user_id,
            role: Role::resolve(is_manager, is_superuser),
        })
    }
}
