pub mod database;
pub mod edamam;
pub mod filter;
pub mod metrics;

pub use database::Database;
pub use edamam::{EdamamClient, MockRecipeSource, RecipeCandidate, RecipeSource};
pub use metrics::{get_metrics, init_metrics, record_genai_request, record_recipe_search};
