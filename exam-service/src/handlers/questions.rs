use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::models::Question;
use crate::services::generation;
use crate::services::record_genai_request;
use crate::startup::AppState;
use service_core::error::AppError;

#[derive(Debug, Default, Deserialize)]
pub struct RegenerateRequest {
    pub extra_prompt: Option<String>,
}

/// Rephrase one question via the generative backend and persist the result.
#[tracing::instrument(skip(state, request), fields(paper_id = %paper_id, question_id = %question_id))]
pub async fn regenerate_question(
    State(state): State<AppState>,
    Path((paper_id, question_id)): Path<(Uuid, Uuid)>,
    request: Option<Json<RegenerateRequest>>,
) -> Result<Json<Question>, AppError> {
    let request = request.map(|Json(r)| r).unwrap_or_default();

    if state.db.find_paper(paper_id).await?.is_none() {
        return Err(AppError::NotFound(anyhow::anyhow!("Paper not found")));
    }

    let question = state
        .db
        .find_question(paper_id, question_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Question not found")))?;

    let questions = state.db.list_questions(paper_id).await?;
    let document_context = questions
        .iter()
        .map(|q| q.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    let new_text = generation::rephrase_question(
        &state.generator,
        &document_context,
        &question.text,
        request.extra_prompt.as_deref(),
    )
    .await
    .map_err(|e| {
        record_genai_request("regenerate_question", "failure");
        e
    })?;
    record_genai_request("regenerate_question", "success");

    let updated = state
        .db
        .update_question_text(question.question_id, &new_text)
        .await?;

    Ok(Json(updated))
}

/// Generate a brand-new question from the paper's existing questions.
#[tracing::instrument(skip(state), fields(paper_id = %paper_id))]
pub async fn generate_question(
    State(state): State<AppState>,
    Path(paper_id): Path<Uuid>,
) -> Result<(StatusCode, Json<Question>), AppError> {
    if state.db.find_paper(paper_id).await?.is_none() {
        return Err(AppError::NotFound(anyhow::anyhow!("Paper not found")));
    }

    let questions = state.db.list_questions(paper_id).await?;
    if questions.is_empty() {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Cannot generate a question for an empty paper"
        )));
    }

    let document_context = questions
        .iter()
        .map(|q| q.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    let new_text = generation::new_question_from_context(&state.generator, &document_context)
        .await
        .map_err(|e| {
            record_genai_request("generate_question", "failure");
            e
        })?;
    record_genai_request("generate_question", "success");

    let question = state.db.insert_question(paper_id, &new_text).await?;

    Ok((StatusCode::CREATED, Json(question)))
}
