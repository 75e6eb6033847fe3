pub mod database;
pub mod generation;
pub mod metrics;
pub mod segmenter;

pub use database::Database;
pub use metrics::{get_metrics, init_metrics, record_genai_request};
