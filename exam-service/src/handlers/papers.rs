use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::models::PaperWithQuestions;
use crate::services::segmenter::split_sentences;
use crate::startup::AppState;
use service_core::error::AppError;

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePaperRequest {
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Content cannot be empty"))]
    pub content: String,
}

/// Create a paper for a user, seeding one question per sentence of the
/// submitted content.
#[tracing::instrument(skip(state, request), fields(user_id = %user_id))]
pub async fn create_paper(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(request): Json<CreatePaperRequest>,
) -> Result<(StatusCode, Json<PaperWithQuestions>), AppError> {
    request.validate()?;

    if state.db.find_user(user_id).await?.is_none() {
        return Err(AppError::NotFound(anyhow::anyhow!("User not found")));
    }

    let sentences = split_sentences(&request.content);
    if sentences.is_empty() {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Content cannot be empty"
        )));
    }

    let title = request.title.as_deref().unwrap_or("Untitled Paper");
    let (paper, questions) = state.db.create_paper(user_id, title, &sentences).await?;

    Ok((
        StatusCode::CREATED,
        Json(PaperWithQuestions { paper, questions }),
    ))
}

/// List a user's papers, each with its questions.
#[tracing::instrument(skip(state), fields(user_id = %user_id))]
pub async fn list_papers(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<PaperWithQuestions>>, AppError> {
    if state.db.find_user(user_id).await?.is_none() {
        return Err(AppError::NotFound(anyhow::anyhow!("User not found")));
    }

    let papers = state.db.list_papers(user_id).await?;

    let mut result = Vec::with_capacity(papers.len());
    for paper in papers {
        let questions = state.db.list_questions(paper.paper_id).await?;
        result.push(PaperWithQuestions { paper, questions });
    }

    Ok(Json(result))
}
