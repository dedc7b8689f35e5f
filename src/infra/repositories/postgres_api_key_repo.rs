use crate::domain::{models::api_key::ApiKey, ports::ApiKeyRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

pub struct PostgresApiKeyRepo {
    pool: PgPool,
}

impl PostgresApiKeyRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApiKeyRepository for PostgresApiKeyRepo {
    async fn create(&self, key: &ApiKey) -> Result<ApiKey, AppError> {
        sqlx::query_as::<_, ApiKey>(
            "INSERT INTO api_keys (id, customer_id, api_key, status, expires_at, last_used_at, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING *"
        )
            .bind(&key.id).bind(&key.customer_id).bind(&key.api_key).bind(&key.status)
            .bind(key.expires_at).bind(key.last_used_at).bind(key.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_key(&self, api_key: &str) -> Result<Option<ApiKey>, AppError> {
        sqlx::query_as::<_, ApiKey>("SELECT * FROM api_keys WHERE api_key = $1")
            .bind(api_key).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn touch_last_used(&self, id: &str, at: DateTime<Utc>) -> Result<(), AppError> {
        sqlx::query("UPDATE api_keys SET last_used_at = $1 WHERE id = $2")
            .bind(at).bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(())
    }
}
