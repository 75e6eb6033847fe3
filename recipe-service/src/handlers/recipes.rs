use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{HealthProfile, RecipeRequestRecord};
use crate::services::filter::select_suitable;
use crate::services::{record_genai_request, record_recipe_search};
use crate::startup::AppState;
use service_core::error::AppError;

#[derive(Debug, Deserialize, Validate)]
pub struct GenerateRecipesRequest {
    #[serde(flatten)]
    #[validate(nested)]
    pub profile: HealthProfile,
    #[validate(length(min = 1, message = "ingredients list cannot be empty"))]
    pub ingredients: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateRecipesResponse {
    pub recipes: Vec<serde_json::Value>,
}

/// Fetch candidate recipes for the ingredients, let the model pick the
/// ones suitable for the user's health profile, and persist the match.
#[tracing::instrument(skip(state, request))]
pub async fn generate_recipes(
    State(state): State<AppState>,
    Json(request): Json<GenerateRecipesRequest>,
) -> Result<Json<GenerateRecipesResponse>, AppError> {
    request.validate()?;

    let candidates = state
        .source
        .search(&request.ingredients)
        .await
        .map_err(|e| {
            record_recipe_search("failure");
            AppError::BadGateway(format!("Could not fetch recipes: {}", e))
        })?;
    record_recipe_search("success");

    if candidates.is_empty() {
        return Err(AppError::NotFound(anyhow::anyhow!(
            "No recipes found for the given ingredients"
        )));
    }

    let indices = select_suitable(&state.generator, &request.profile, &candidates)
        .await
        .map_err(|e| {
            record_genai_request("filter_recipes", "failure");
            e
        })?;
    record_genai_request("filter_recipes", "success");

    if indices.is_empty() {
        return Err(AppError::NotFound(anyhow::anyhow!(
            "Found recipes, but none were deemed suitable for the user's profile"
        )));
    }

    let matched: Vec<serde_json::Value> = indices
        .into_iter()
        .map(|i| candidates[i].recipe.clone())
        .collect();

    state
        .db
        .record_recipe_request(
            &serde_json::to_value(&request.profile).map_err(anyhow::Error::new)?,
            &serde_json::to_value(&request.ingredients).map_err(anyhow::Error::new)?,
            &serde_json::Value::Array(matched.clone()),
        )
        .await?;

    Ok(Json(GenerateRecipesResponse { recipes: matched }))
}

#[derive(Debug, Deserialize)]
pub struct RecentRequestsQuery {
    #[serde(default = "default_recent_limit")]
    pub limit: i64,
}

fn default_recent_limit() -> i64 {
    20
}

/// Recent recommendation requests, newest first.
#[tracing::instrument(skip(state))]
pub async fn recent_requests(
    State(state): State<AppState>,
    Query(query): Query<RecentRequestsQuery>,
) -> Result<Json<Vec<RecipeRequestRecord>>, AppError> {
    let limit = query.limit.clamp(1, 100);
    let records = state.db.recent_recipe_requests(limit).await?;
    Ok(Json(records))
}
