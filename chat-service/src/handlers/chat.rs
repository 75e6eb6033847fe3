use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::ChatMessage;
use crate::services::chat::reply_and_sentiment;
use crate::services::{record_genai_request, record_sentiment};
use crate::startup::AppState;
use service_core::error::AppError;
use service_core::genai::response::Sentiment;

#[derive(Debug, Deserialize, Validate)]
pub struct SendMessageRequest {
    #[validate(length(min = 1, message = "user_id is required"))]
    pub user_id: String,
    #[validate(length(min = 1, max = 2000, message = "Message must be 1-2000 characters"))]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    pub reply: String,
    pub sentiment: Sentiment,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert: Option<bool>,
}

/// Answer a message and classify its sentiment. The exchange is recorded
/// only once the model produced a usable result; a failed call records
/// nothing and surfaces as a gateway error.
#[tracing::instrument(skip(state, request))]
pub async fn send_message(
    State(state): State<AppState>,
    Json(request): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<SendMessageResponse>), AppError> {
    request.validate()?;

    let exchange = reply_and_sentiment(&state.generator, &request.message)
        .await
        .map_err(|e| {
            record_genai_request("failure");
            e
        })?;
    record_genai_request("success");
    record_sentiment(exchange.sentiment.as_str());

    state
        .db
        .record_chat(
            &request.user_id,
            &request.message,
            &exchange.reply,
            exchange.sentiment.as_str(),
        )
        .await?;

    if exchange.sentiment == Sentiment::Negative {
        tracing::warn!(user_id = %request.user_id, "negative sentiment detected");
    }

    Ok((
        StatusCode::CREATED,
        Json(SendMessageResponse {
            reply: exchange.reply,
            alert: (exchange.sentiment == Sentiment::Negative).then_some(true),
            sentiment: exchange.sentiment,
        }),
    ))
}

#[derive(Debug, Deserialize, Validate)]
pub struct HistoryQuery {
    #[validate(length(min = 1, message = "user_id is required"))]
    pub user_id: String,
    #[validate(range(min = 1, max = 100, message = "limit must be 1-100"))]
    #[serde(default = "default_history_limit")]
    pub limit: i64,
}

fn default_history_limit() -> i64 {
    10
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub history: Vec<ChatMessage>,
}

/// Most recent messages for a user, oldest-first.
#[tracing::instrument(skip(state, query), fields(user_id = %query.user_id))]
pub async fn chat_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, AppError> {
    query.validate()?;

    let history = state.db.chat_history(&query.user_id, query.limit).await?;
    Ok(Json(HistoryResponse { history }))
}
