//! Chat message model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A recorded exchange: the user's message plus the model's reply and
/// sentiment classification.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ChatMessage {
    pub message_id: Uuid,
    pub user_id: String,
    pub user_message: String,
    pub bot_reply: Option<String>,
    pub sentiment: String,
    pub created_utc: DateTime<Utc>,
}

/// One row of the daily sentiment aggregation.
#[derive(Debug, Clone, FromRow)]
pub struct DailySentimentCount {
    pub day: NaiveDate,
    pub sentiment: String,
    pub count: i64,
}
