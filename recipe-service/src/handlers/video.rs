use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

use crate::models::VideoArtifact;
use crate::services::record_genai_request;
use crate::startup::AppState;
use service_core::error::AppError;

#[derive(Debug, Deserialize, Validate)]
pub struct GenerateVideoRequest {
    #[validate(length(min = 1, max = 2000, message = "Prompt must be 1-2000 characters"))]
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateVideoResponse {
    pub message: String,
    pub filename: String,
}

/// Submit a video generation job, wait for it to finish, and store the
/// media under a collision-free file name.
///
/// The request blocks for the whole generation; with no configured
/// deadline that wait is unbounded, matching the upstream job API.
#[tracing::instrument(skip(state, request))]
pub async fn generate_video(
    State(state): State<AppState>,
    Json(request): Json<GenerateVideoRequest>,
) -> Result<Json<GenerateVideoResponse>, AppError> {
    request.validate()?;

    let handle = state.video.submit(&request.prompt).await.map_err(|e| {
        record_genai_request("generate_video", "failure");
        e
    })?;

    let result = state
        .video
        .await_completion(&handle, state.config.video.deadline)
        .await
        .map_err(|e| {
            record_genai_request("generate_video", "failure");
            e
        })?;

    let bytes = state.video.fetch(&result.result_uri).await.map_err(|e| {
        record_genai_request("generate_video", "failure");
        e
    })?;
    record_genai_request("generate_video", "success");

    let media_dir = Path::new(&state.config.video.media_dir);
    tokio::fs::create_dir_all(media_dir).await?;

    let file_path = media_dir.join(&result.artifact_name);
    tokio::fs::write(&file_path, &bytes).await?;
    tracing::info!(path = %file_path.display(), "generated video saved");

    state
        .db
        .record_video_artifact(
            &result.artifact_name,
            &request.prompt,
            &file_path.display().to_string(),
        )
        .await?;

    Ok(Json(GenerateVideoResponse {
        message: "Video generated successfully".to_string(),
        filename: result.artifact_name,
    }))
}

/// Stored artifacts, newest first.
#[tracing::instrument(skip(state))]
pub async fn list_videos(
    State(state): State<AppState>,
) -> Result<Json<Vec<VideoArtifact>>, AppError> {
    let artifacts = state.db.list_video_artifacts().await?;
    Ok(Json(artifacts))
}
