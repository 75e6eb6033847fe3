pub mod chat;
pub mod database;
pub mod metrics;

pub use database::Database;
pub use metrics::{get_metrics, init_metrics, record_genai_request, record_sentiment};
