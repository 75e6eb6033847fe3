//! Persisted records for recipe recommendations and video artifacts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One recommendation request with the recipes the model approved.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RecipeRequestRecord {
    pub request_id: Uuid,
    pub profile: serde_json::Value,
    pub ingredients: serde_json::Value,
    pub matched: serde_json::Value,
    pub created_utc: DateTime<Utc>,
}

/// A generated video stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VideoArtifact {
    pub artifact_id: String,
    pub prompt: String,
    pub file_path: String,
    pub created_utc: DateTime<Utc>,
}
