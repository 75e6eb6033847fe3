//! Nutrition API client.
//!
//! Fetches candidate recipes for a set of ingredients. The Edamam response
//! is kept as opaque JSON for the API consumer; only the label and a short
//! nutrient summary are lifted out for the suitability prompt.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NutritionError {
    #[error("recipe search failed: {0}")]
    Request(String),

    #[error("recipe API returned {status}: {body}")]
    Status { status: u16, body: String },
}

/// A candidate recipe: the full upstream object plus the fields the
/// suitability prompt needs.
#[derive(Debug, Clone)]
pub struct RecipeCandidate {
    pub label: String,
    pub nutrient_summary: String,
    pub recipe: serde_json::Value,
}

/// Source of candidate recipes for an ingredient list.
#[async_trait]
pub trait RecipeSource: Send + Sync {
    async fn search(&self, ingredients: &[String]) -> Result<Vec<RecipeCandidate>, NutritionError>;
}

/// Edamam recipe search configuration.
#[derive(Debug, Clone)]
pub struct EdamamConfig {
    pub app_id: String,
    pub app_key: String,
    pub endpoint: String,
}

pub struct EdamamClient {
    config: EdamamConfig,
    client: Client,
}

impl EdamamClient {
    pub fn new(config: EdamamConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }
}

#[async_trait]
impl RecipeSource for EdamamClient {
    async fn search(&self, ingredients: &[String]) -> Result<Vec<RecipeCandidate>, NutritionError> {
        let query = ingredients.join(" ");

        tracing::debug!(query = %query, "Searching recipes");

        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&[
                ("q", query.as_str()),
                ("type", "public"),
                ("app_id", self.config.app_id.as_str()),
                ("app_key", self.config.app_key.as_str()),
                ("random", "true"),
            ])
            .send()
            .await
            .map_err(|e| NutritionError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(NutritionError::Status { status, body });
        }

        let search: SearchResponse = response
            .json()
            .await
            .map_err(|e| NutritionError::Request(format!("unreadable response body: {}", e)))?;

        Ok(search
            .hits
            .into_iter()
            .filter_map(|hit| candidate_from_recipe(hit.recipe))
            .collect())
    }
}

/// Build a candidate from one upstream recipe object, summarizing its
/// first ten major nutrients for the prompt.
fn candidate_from_recipe(recipe: serde_json::Value) -> Option<RecipeCandidate> {
    let label = recipe.get("label")?.as_str()?.to_string();

    let nutrient_summary = recipe
        .get("digest")
        .and_then(|d| d.as_array())
        .map(|digest| {
            digest
                .iter()
                .take(10)
                .filter_map(|n| {
                    let total = n.get("total")?.as_f64()?;
                    let unit = n.get("unit")?.as_str()?;
                    let name = n.get("label")?.as_str()?;
                    Some(format!("{} {} {}", total as i64, unit, name))
                })
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default();

    Some(RecipeCandidate {
        label,
        nutrient_summary,
        recipe,
    })
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    recipe: serde_json::Value,
}

/// Canned recipe source for tests.
pub struct MockRecipeSource {
    candidates: Vec<RecipeCandidate>,
    failure: Option<String>,
}

impl MockRecipeSource {
    pub fn with_labels(labels: &[&str]) -> Self {
        let candidates = labels
            .iter()
            .map(|label| RecipeCandidate {
                label: label.to_string(),
                nutrient_summary: "100 kcal Energy, 10 g Protein".to_string(),
                recipe: serde_json::json!({ "label": label, "url": "https://recipes.example" }),
            })
            .collect();

        Self {
            candidates,
            failure: None,
        }
    }

    pub fn empty() -> Self {
        Self {
            candidates: Vec::new(),
            failure: None,
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            candidates: Vec::new(),
            failure: Some(message.to_string()),
        }
    }
}

#[async_trait]
impl RecipeSource for MockRecipeSource {
    async fn search(&self, _ingredients: &[String]) -> Result<Vec<RecipeCandidate>, NutritionError> {
        match &self.failure {
            Some(message) => Err(NutritionError::Request(message.clone())),
            None => Ok(self.candidates.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_summarizes_major_nutrients() {
        let recipe = serde_json::json!({
            "label": "Garlic Chicken",
            "digest": [
                { "label": "Fat", "unit": "g", "total": 12.7 },
                { "label": "Protein", "unit": "g", "total": 30.2 },
            ]
        });

        let candidate = candidate_from_recipe(recipe).unwrap();
        assert_eq!(candidate.label, "Garlic Chicken");
        assert_eq!(candidate.nutrient_summary, "12 g Fat, 30 g Protein");
    }

    #[test]
    fn recipe_without_label_is_skipped() {
        assert!(candidate_from_recipe(serde_json::json!({ "digest": [] })).is_none());
    }

    #[test]
    fn missing_digest_yields_empty_summary() {
        let candidate =
            candidate_from_recipe(serde_json::json!({ "label": "Plain Rice" })).unwrap();
        assert!(candidate.nutrient_summary.is_empty());
    }
}
