use serde::{Deserialize, Serialize};
use validator::Validate;

/// Health profile the suitability filter judges recipes against.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct HealthProfile {
    #[validate(range(min = 1, max = 120, message = "age must be 1-120"))]
    pub age: i32,
    #[validate(length(min = 1, message = "gender is required"))]
    pub gender: String,
    #[validate(range(min = 1.0, message = "weight must be positive"))]
    pub weight: f64,
    #[validate(range(min = 1.0, message = "height must be positive"))]
    pub height: f64,
    #[validate(length(min = 1, message = "disease is required"))]
    pub disease: String,
}
