use crate::domain::{models::dependent::Dependent, ports::DependentRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteDependentRepo {
    pool: SqlitePool,
}

impl SqliteDependentRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DependentRepository for SqliteDependentRepo {
    async fn create(&self, dependent: &Dependent) -> Result<Dependent, AppError> {
        sqlx::query_as::<_, Dependent>(
            "INSERT INTO dependents (id, customer_id, name, birth_date, status, created_at)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&dependent.id).bind(&dependent.customer_id).bind(&dependent.name)
            .bind(dependent.birth_date).bind(&dependent.status).bind(dependent.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Dependent>, AppError> {
        sqlx::query_as::<_, Dependent>("SELECT * FROM dependents WHERE id = ?")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<Dependent>, AppError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!("SELECT * FROM dependents WHERE id IN ({})", placeholders);
        let mut query = sqlx::query_as::<_, Dependent>(&sql);
        for id in ids {
            query = query.bind(id);
        }
        query.fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_customer(&self, customer_id: &str) -> Result<Vec<Dependent>, AppError> {
        sqlx::query_as::<_, Dependent>("SELECT * FROM dependents WHERE customer_id = ? ORDER BY created_at ASC")
            .bind(customer_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
