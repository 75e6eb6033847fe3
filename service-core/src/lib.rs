//! service-core: Shared infrastructure for the AI backend services.
pub mod config;
pub mod error;
pub mod genai;
pub mod middleware;
pub mod observability;

pub use async_trait;
pub use axum;
pub use serde;
pub use serde_json;
pub use tokio;
pub use tower;
pub use tower_http;
pub use tracing;
pub use validator;
