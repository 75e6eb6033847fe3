//! Question paper models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A paper owned by a user; a container for questions.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuestionPaper {
    pub paper_id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub created_utc: DateTime<Utc>,
}

/// A single question on a paper.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Question {
    pub question_id: Uuid,
    pub paper_id: Uuid,
    pub text: String,
}

/// A paper together with its questions, as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct PaperWithQuestions {
    #[serde(flatten)]
    pub paper: QuestionPaper,
    pub questions: Vec<Question>,
}
