//! Feedback widget and dashboard handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::MarcoError,
    feedback::{Analytics, FeedbackForm, MSG_STORE_FAILED, MSG_THANKS, Submission},
};

use super::super::state::AppState;

/// Response from the submit endpoint.
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub id: Uuid,
    pub message: &'static str,
}

/// Validation messages go to the user verbatim; anything else is generic.
fn submit_error(e: MarcoError) -> (StatusCode, String) {
    if e.is_validation() {
        (StatusCode::BAD_REQUEST, e.to_string())
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, MSG_STORE_FAILED.to_string())
    }
}

fn store_error(e: MarcoError) -> (StatusCode, String) {
    tracing::error!(error = %e, "failed to list feedback");
    (StatusCode::INTERNAL_SERVER_ERROR, "Failed to load feedback".to_string())
}

/// POST /api/feedback - Submit the feedback form.
pub async fn submit(
    State(state): State<Arc<AppState>>,
    Json(form): Json<FeedbackForm>,
) -> Result<(StatusCode, Json<SubmitResponse>), (StatusCode, String)> {
    let submission = state.feedback.submit(&form).await.map_err(submit_error)?;
    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            success: true,
            id: submission.id,
            message: MSG_THANKS,
        }),
    ))
}

/// GET /api/feedback - All submissions, newest first.
pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Submission>>, (StatusCode, String)> {
    let submissions = state.feedback.list().await.map_err(store_error)?;
    Ok(Json(submissions))
}

/// GET /api/feedback/analytics - Dashboard aggregates.
pub async fn analytics(State(state): State<Arc<AppState>>) -> Result<Json<Analytics>, (StatusCode, String)> {
    let analytics = state.feedback.analytics().await.map_err(store_error)?;
    Ok(Json(analytics))
}
