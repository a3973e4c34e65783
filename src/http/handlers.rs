use super::state::AppState;
use crate::error::RecorderError;
use crate::widget::Control;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(e: &RecorderError) -> Response {
    let status = match e {
        RecorderError::PermissionDenied(_) => StatusCode::FORBIDDEN,
        RecorderError::DeviceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        RecorderError::Unsupported(_) => StatusCode::NOT_IMPLEMENTED,
        RecorderError::NotFound(_) => StatusCode::NOT_FOUND,
        RecorderError::Recorder(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
        .into_response()
}

/// Press a button and answer with the updated view
async fn run_control(state: AppState, control: Control) -> Response {
    let mut recorder = state.recorder.write().await;

    match recorder.dispatch(control).await {
        Ok(()) => (StatusCode::OK, Json(recorder.view())).into_response(),
        Err(e) => {
            error!("{} failed: {}", control, e);
            error_response(&e)
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /access
/// Request microphone and camera access
pub async fn request_access(State(state): State<AppState>) -> impl IntoResponse {
    run_control(state, Control::GetCameraAccess).await
}

/// POST /start
pub async fn start_recording(State(state): State<AppState>) -> impl IntoResponse {
    run_control(state, Control::StartRecording).await
}

/// POST /pause
pub async fn pause_recording(State(state): State<AppState>) -> impl IntoResponse {
    run_control(state, Control::PauseRecording).await
}

/// POST /resume
pub async fn resume_recording(State(state): State<AppState>) -> impl IntoResponse {
    run_control(state, Control::ResumeRecording).await
}

/// POST /stop
/// Stop recording; the recording shows up in the view once finalized
pub async fn stop_recording(State(state): State<AppState>) -> impl IntoResponse {
    run_control(state, Control::StopRecording).await
}

/// GET /view
pub async fn get_view(State(state): State<AppState>) -> impl IntoResponse {
    let recorder = state.recorder.read().await;
    (StatusCode::OK, Json(recorder.view()))
}

/// GET /stats
pub async fn get_stats(State(state): State<AppState>) -> impl IntoResponse {
    let recorder = state.recorder.read().await;
    (StatusCode::OK, Json(recorder.stats().await))
}

/// GET /recordings/:id
/// Download the current recording; replaced recordings are gone
pub async fn get_recording(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let artifact = state.recorder.read().await.artifact();

    match artifact {
        Some(artifact) if artifact.id == id => {
            info!(
                "Serving recording {} ({} bytes)",
                artifact.id, artifact.size_bytes
            );
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, artifact.mime_type.clone()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", artifact.filename),
                    ),
                ],
                artifact.data().to_vec(),
            )
                .into_response()
        }
        _ => error_response(&RecorderError::NotFound(format!("recording {}", id))),
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
