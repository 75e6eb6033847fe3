//! Database service for exam-service.

use crate::models::{Question, QuestionPaper, User};
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
    #[instrument(skip(database_url), fields(service = "exam-service"))]
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

    // =========================================================================
    // User Operations
    // =========================================================================

    #[instrument(skip(self))]
    pub async fn create_user(&self, username: &str) -> Result<User, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_user"])
            .start_timer();

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (user_id, username)
            VALUES ($1, $2)
            RETURNING user_id, username, created_utc
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create user: {}", e)))?;

        timer.observe_duration();
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn find_user(&self, user_id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT user_id, username, created_utc FROM users WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to find user: {}", e)))?;

        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT user_id, username, created_utc FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to find user: {}", e)))?;

        Ok(user)
    }

    // =========================================================================
    // Paper Operations
    // =========================================================================

    /// Create a paper and its seed questions in one transaction.
    #[instrument(skip(self, questions), fields(question_count = questions.len()))]
    pub async fn create_paper(
        &self,
        user_id: Uuid,
        title: &str,
        questions: &[String],
    ) -> Result<(QuestionPaper, Vec<Question>), AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_paper"])
            .start_timer();

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        let paper = sqlx::query_as::<_, QuestionPaper>(
            r#"
            INSERT INTO question_papers (paper_id, user_id, title)
            VALUES ($1, $2, $3)
            RETURNING paper_id, user_id, title, created_utc
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(title)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create paper: {}", e)))?;

        let mut inserted = Vec::with_capacity(questions.len());
        for text in questions {
            let question = sqlx::query_as::<_, Question>(
                r#"
                INSERT INTO questions (question_id, paper_id, text)
                VALUES ($1, $2, $3)
                RETURNING question_id, paper_id, text
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(paper.paper_id)
            .bind(text)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to insert question: {}", e))
            })?;
            inserted.push(question);
        }

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to commit transaction: {}", e))
        })?;

        timer.observe_duration();
        Ok((paper, inserted))
    }

    #[instrument(skip(self))]
    pub async fn list_papers(&self, user_id: Uuid) -> Result<Vec<QuestionPaper>, AppError> {
        let papers = sqlx::query_as::<_, QuestionPaper>(
            r#"
            SELECT paper_id, user_id, title, created_utc
            FROM question_papers
            WHERE user_id = $1
            ORDER BY created_utc
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list papers: {}", e)))?;

        Ok(papers)
    }

    #[instrument(skip(self))]
    pub async fn find_paper(&self, paper_id: Uuid) -> Result<Option<QuestionPaper>, AppError> {
        let paper = sqlx::query_as::<_, QuestionPaper>(
            "SELECT paper_id, user_id, title, created_utc FROM question_papers WHERE paper_id = $1",
        )
        .bind(paper_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to find paper: {}", e)))?;

        Ok(paper)
    }

    // =========================================================================
    // Question Operations
    // =========================================================================

    #[instrument(skip(self))]
    pub async fn list_questions(&self, paper_id: Uuid) -> Result<Vec<Question>, AppError> {
        let questions = sqlx::query_as::<_, Question>(
            r#"
            SELECT question_id, paper_id, text
            FROM questions
            WHERE paper_id = $1
            ORDER BY seq
            "#,
        )
        .bind(paper_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list questions: {}", e)))?;

        Ok(questions)
    }

    /// Find a question, scoped to its paper so a valid question id on the
    /// wrong paper is still a miss.
    #[instrument(skip(self))]
    pub async fn find_question(
        &self,
        paper_id: Uuid,
        question_id: Uuid,
    ) -> Result<Option<Question>, AppError> {
        let question = sqlx::query_as::<_, Question>(
            r#"
            SELECT question_id, paper_id, text
            FROM questions
            WHERE paper_id = $1 AND question_id = $2
            "#,
        )
        .bind(paper_id)
        .bind(question_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to find question: {}", e)))?;

        Ok(question)
    }

    #[instrument(skip(self, text))]
    pub async fn update_question_text(
        &self,
        question_id: Uuid,
        text: &str,
    ) -> Result<Question, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_question_text"])
            .start_timer();

        let question = sqlx::query_as::<_, Question>(
            r#"
            UPDATE questions
            SET text = $2
            WHERE question_id = $1
            RETURNING question_id, paper_id, text
            "#,
        )
        .bind(question_id)
        .bind(text)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to update question: {}", e))
        })?;

        timer.observe_duration();
        Ok(question)
    }

    #[instrument(skip(self, text))]
    pub async fn insert_question(
        &self,
        paper_id: Uuid,
        text: &str,
    ) -> Result<Question, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["insert_question"])
            .start_timer();

        let question = sqlx::query_as::<_, Question>(
            r#"
            INSERT INTO questions (question_id, paper_id, text)
            VALUES ($1, $2, $3)
            RETURNING question_id, paper_id, text
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(paper_id)
        .bind(text)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to insert question: {}", e))
        })?;

        timer.observe_duration();
        Ok(question)
    }
}
