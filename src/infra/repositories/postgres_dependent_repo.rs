use crate::domain::{models::dependent::Dependent, ports::DependentRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresDependentRepo {
    pool: PgPool,
}

impl PostgresDependentRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DependentRepository for PostgresDependentRepo {
    async fn create(&self, dependent: &Dependent) -> Result<Dependent, AppError> {
        sqlx::query_as::<_, Dependent>(
            "INSERT INTO dependents (id, customer_id, name, birth_date, status, created_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *"
        )
            .bind(&dependent.id).bind(&dependent.customer_id).bind(&dependent.name)
            .bind(dependent.birth_date).bind(&dependent.status).bind(dependent.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Dependent>, AppError> {
        sqlx::query_as::<_, Dependent>("SELECT * FROM dependents WHERE id = $1")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<Dependent>, AppError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        sqlx::query_as::<_, Dependent>("SELECT * FROM dependents WHERE id = ANY($1)")
            .bind(ids).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_customer(&self, customer_id: &str) -> Result<Vec<Dependent>, AppError> {
        sqlx::query_as::<_, Dependent>("SELECT * FROM dependents WHERE customer_id = $1 ORDER BY created_at ASC")
            .bind(customer_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
