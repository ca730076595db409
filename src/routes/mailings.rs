use crate::{
    app_state::AppState,
    authorization::Actor,
    dispatch::{self, DispatchSummary, LaunchError},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

pub fn router() -> Router<AppState> {
    Router::new().route("/mailings/:id/launch", post(launch_mailing))
}

#[tracing::instrument(skip(app_state), fields(actor_id = %actor.user_id))]
async fn launch_mailing(
    State(app_state): State<AppState>,
    actor: Actor,
    Path(mailing_id): Path<Uuid>,
) -> (StatusCode, Json<LaunchResponse>) {
    let outcome = dispatch::launch(
        &app_state.store,
        &app_state.email_client,
        mailing_id,
        &actor,
        OffsetDateTime::now_utc(),
    )
    .await;

    match outcome {
        Ok(summary) => (StatusCode::OK, Json(LaunchResponse::dispatched(&summary))),
        // Double-clicking "launch" is not an error worth a 4xx.
        Err(e @ LaunchError::AlreadyLaunched) => {
            (StatusCode::OK, Json(LaunchResponse::info(e.to_string())))
        }
        Err(e @ LaunchError::NotFound) => {
            (StatusCode::NOT_FOUND, Json(LaunchResponse::info(e.to_string())))
        }
        Err(e @ LaunchError::Unauthorized) => {
            (StatusCode::FORBIDDEN, Json(LaunchResponse::info(e.to_string())))
        }
        Err(e @ (LaunchError::Inactive | LaunchError::NotEligible)) => {
            (StatusCode::CONFLICT, Json(LaunchResponse::info(e.to_string())))
        }
        Err(LaunchError::Unexpected(e)) => {
            tracing::error!(
                error_cause_chain = ?e,
                error.message = %e,
                "Failed to launch mailing"
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(LaunchResponse::info("Something went wrong.".to_string())),
            )
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LaunchResponse {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    delivered: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    failed: Option<u64>,
}

impl LaunchResponse {
    fn dispatched(summary: &DispatchSummary) -> Self {
        Self {
            message: format!(
                "Mailing dispatch finished. Delivered: {}, failed: {}.",
                summary.delivered, summary.failed
            ),
            delivered: Some(summary.delivered),
            failed: Some(summary.failed),
        }
    }

    fn info(message: String) -> Self {
        Self {
            message,
            delivered: None,
            failed: None,
        }
    }
}
