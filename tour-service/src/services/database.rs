//! Database service for tour-service.
//!
//! Every stored KML document gets one row in `kml_files`. The table is
//! append-only: rows are never updated or deleted.

use crate::models::StoredArtifact;
use async_trait::async_trait;
use service_core::error::AppError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{info, instrument};
use uuid::Uuid;

/// Record of stored documents.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Record a stored document and return the new row.
    async fn insert(&self, url: &str) -> Result<StoredArtifact, AppError>;

    async fn health_check(&self) -> Result<(), AppError>;
}

/// Postgres-backed artifact store.
#[derive(Clone)]
pub struct PgArtifactStore {
    pool: PgPool,
}

impl PgArtifactStore {
    #[instrument(skip(database_url), fields(service = "tour-service"))]
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, AppError> {
        info!(max_connections = max_connections, "Connecting to PostgreSQL");

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
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
}

#[async_trait]
impl ArtifactStore for PgArtifactStore {
    #[instrument(skip(self))]
    async fn insert(&self, url: &str) -> Result<StoredArtifact, AppError> {
        let artifact = sqlx::query_as::<_, StoredArtifact>(
            r#"
            INSERT INTO kml_files (id, url)
            VALUES ($1, $2)
            RETURNING id, url, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(url)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to record KML file: {}", e)))?;

        info!(id = %artifact.id, url = %artifact.url, "KML file recorded");

        Ok(artifact)
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Health check failed: {}", e)))?;
        Ok(())
    }
}
