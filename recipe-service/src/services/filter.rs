//! Recipe suitability orchestrator.
//!
//! Presents the candidate list to the model once and reads back the
//! indices of the suitable entries.

use service_core::genai::invoker::TextGenerator;
use service_core::genai::response::{Extracted, ResponseShape};
use service_core::genai::GenAiError;

use crate::models::HealthProfile;
use crate::services::edamam::RecipeCandidate;

/// Ask the model which candidates suit the profile. Returns indices into
/// `candidates`, already range-checked and deduplicated.
pub async fn select_suitable(
    generator: &TextGenerator,
    profile: &HealthProfile,
    candidates: &[RecipeCandidate],
) -> Result<Vec<usize>, GenAiError> {
    let prompt = build_selection_prompt(profile, candidates);

    let raw = generator.generate(&prompt).await?;
    let Extracted::Indices(indices) = ResponseShape::IndexList {
        candidates: candidates.len(),
    }
    .parse(&raw)?
    else {
        return Err(GenAiError::EmptyText);
    };

    Ok(indices)
}

fn build_selection_prompt(profile: &HealthProfile, candidates: &[RecipeCandidate]) -> String {
    let user_details = format!(
        "User Profile: Age: {}, Gender: {}, Weight: {}kg, Height: {}cm, Health Concerns: {}",
        profile.age, profile.gender, profile.weight, profile.height, profile.disease
    );

    let candidate_list = candidates
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{}. {} (Nutrients: {})", i, c.label, c.nutrient_summary))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are an expert nutritionist. Based on the following user health profile and the \
         nutrition facts of each numbered recipe, decide which recipes are healthy and suitable \
         choices for this user.\n\n\
         {user_details}\n\n\
         Candidate Recipes:\n{candidate_list}\n\n\
         Answer ONLY with the numbers of the suitable recipes as a comma-separated list \
         (for example: 0, 2). If none are suitable, answer with the word none."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use service_core::genai::keys::KeyRotator;
    use service_core::genai::mock::MockTextBackend;
    use std::sync::Arc;

    fn profile() -> HealthProfile {
        HealthProfile {
            age: 30,
            gender: "female".to_string(),
            weight: 65.0,
            height: 170.0,
            disease: "high cholesterol".to_string(),
        }
    }

    fn candidates(n: usize) -> Vec<RecipeCandidate> {
        (0..n)
            .map(|i| RecipeCandidate {
                label: format!("Recipe {}", i),
                nutrient_summary: "100 kcal Energy".to_string(),
                recipe: serde_json::json!({ "label": format!("Recipe {}", i) }),
            })
            .collect()
    }

    fn generator(backend: Arc<MockTextBackend>) -> TextGenerator {
        let rotator = Arc::new(KeyRotator::new(vec!["test-key".to_string()]).unwrap());
        TextGenerator::new(backend, rotator)
    }

    #[tokio::test]
    async fn keeps_in_range_indices_only() {
        let backend = Arc::new(MockTextBackend::with_response("0, 2, 9, 2"));
        let indices = select_suitable(&generator(backend), &profile(), &candidates(5))
            .await
            .unwrap();
        assert_eq!(indices, vec![0, 2]);
    }

    #[tokio::test]
    async fn none_answer_selects_nothing() {
        let backend = Arc::new(MockTextBackend::with_response("none"));
        let indices = select_suitable(&generator(backend), &profile(), &candidates(3))
            .await
            .unwrap();
        assert!(indices.is_empty());
    }

    #[test]
    fn prompt_numbers_every_candidate() {
        let prompt = build_selection_prompt(&profile(), &candidates(3));
        assert!(prompt.contains("0. Recipe 0"));
        assert!(prompt.contains("2. Recipe 2"));
        assert!(prompt.contains("high cholesterol"));
    }
}
