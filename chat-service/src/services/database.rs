//! Database service for chat-service.

use crate::models::{ChatMessage, DailySentimentCount};
use crate::services::metrics::DB_QUERY_DURATION;
use chrono::{DateTime, Utc};
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
    #[instrument(skip(database_url), fields(service = "chat-service"))]
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

    /// Record a completed exchange. Only called after the model produced a
    /// usable reply; failed calls leave no trace here.
    #[instrument(skip(self, user_message, bot_reply))]
    pub async fn record_chat(
        &self,
        user_id: &str,
        user_message: &str,
        bot_reply: &str,
        sentiment: &str,
    ) -> Result<ChatMessage, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["record_chat"])
            .start_timer();

        let message = sqlx::query_as::<_, ChatMessage>(
            r#"
            INSERT INTO chat_messages (message_id, user_id, user_message, bot_reply, sentiment)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING message_id, user_id, user_message, bot_reply, sentiment, created_utc
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(user_message)
        .bind(bot_reply)
        .bind(sentiment)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to record chat: {}", e)))?;

        timer.observe_duration();
        Ok(message)
    }

    /// Most recent `limit` messages for a user, returned oldest-first.
    #[instrument(skip(self))]
    pub async fn chat_history(
        &self,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<ChatMessage>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["chat_history"])
            .start_timer();

        let mut messages = sqlx::query_as::<_, ChatMessage>(
            r#"
            SELECT message_id, user_id, user_message, bot_reply, sentiment, created_utc
            FROM chat_messages
            WHERE user_id = $1
            ORDER BY seq DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to load history: {}", e)))?;

        messages.reverse();

        timer.observe_duration();
        Ok(messages)
    }

    /// Per-day sentiment counts in the (inclusive) range.
    #[instrument(skip(self))]
    pub async fn sentiment_counts(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<DailySentimentCount>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["sentiment_counts"])
            .start_timer();

        let counts = sqlx::query_as::<_, DailySentimentCount>(
            r#"
            SELECT (created_utc AT TIME ZONE 'UTC')::date AS day, sentiment, COUNT(*) AS count
            FROM chat_messages
            WHERE created_utc >= $1 AND created_utc < $2
            GROUP BY day, sentiment
            ORDER BY day
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to aggregate sentiment: {}", e))
        })?;

        timer.observe_duration();
        Ok(counts)
    }
}
