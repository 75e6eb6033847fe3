//! Database service for recipe-service.

use crate::models::{RecipeRequestRecord, VideoArtifact};
use crate::services::metrics::DB_QUERY_DURATION;
use service_core::error::AppError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{info, instrument};
use uuid::Uuid;

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool.
    #[instrument(skip(database_url), fields(service = "recipe-service"))]
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, AppError> {
        info!(
            max_connections = max_connections,
            min_connections = min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check database health.
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Health check failed: {}", e)))?;
        Ok(())
    }

    /// Run database migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }

    /// Persist a completed recommendation request.
    #[instrument(skip(self, profile, ingredients, matched))]
    pub async fn record_recipe_request(
        &self,
        profile: &serde_json::Value,
        ingredients: &serde_json::Value,
        matched: &serde_json::Value,
    ) -> Result<RecipeRequestRecord, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["record_recipe_request"])
            .start_timer();

        let record = sqlx::query_as::<_, RecipeRequestRecord>(
            r#"
            INSERT INTO recipe_requests (request_id, profile, ingredients, matched)
            VALUES ($1, $2, $3, $4)
            RETURNING request_id, profile, ingredients, matched, created_utc
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(profile)
        .bind(ingredients)
        .bind(matched)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to record recipe request: {}", e))
        })?;

        timer.observe_duration();
        Ok(record)
    }

    /// Most recent recommendation requests, newest first.
    #[instrument(skip(self))]
    pub async fn recent_recipe_requests(
        &self,
        limit: i64,
    ) -> Result<Vec<RecipeRequestRecord>, AppError> {
        let records = sqlx::query_as::<_, RecipeRequestRecord>(
            r#"
            SELECT request_id, profile, ingredients, matched, created_utc
            FROM recipe_requests
            ORDER BY created_utc DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to list recipe requests: {}", e))
        })?;

        Ok(records)
    }

    /// Record a stored video artifact.
    #[instrument(skip(self, prompt, file_path))]
    pub async fn record_video_artifact(
        &self,
        artifact_id: &str,
        prompt: &str,
        file_path: &str,
    ) -> Result<VideoArtifact, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["record_video_artifact"])
            .start_timer();

        let artifact = sqlx::query_as::<_, VideoArtifact>(
            r#"
            INSERT INTO video_artifacts (artifact_id, prompt, file_path)
            VALUES ($1, $2, $3)
            RETURNING artifact_id, prompt, file_path, created_utc
            "#,
        )
        .bind(artifact_id)
        .bind(prompt)
        .bind(file_path)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to record video artifact: {}", e))
        })?;

        timer.observe_duration();
        Ok(artifact)
    }

    /// All stored artifacts, newest first.
    #[instrument(skip(self))]
    pub async fn list_video_artifacts(&self) -> Result<Vec<VideoArtifact>, AppError> {
        let artifacts = sqlx::query_as::<_, VideoArtifact>(
            r#"
            SELECT artifact_id, prompt, file_path, created_utc
            FROM video_artifacts
            ORDER BY created_utc DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to list video artifacts: {}", e))
        })?;

        Ok(artifacts)
    }
}
