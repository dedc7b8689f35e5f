use crate::domain::{models::customer::Customer, ports::CustomerRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresCustomerRepo {
    pool: PgPool,
}

impl PostgresCustomerRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CustomerRepository for PostgresCustomerRepo {
    async fn create(&self, customer: &Customer) -> Result<Customer, AppError> {
        sqlx::query_as::<_, Customer>(
            "INSERT INTO customers (id, name, email, phone, kind, status, balance_cents, locale, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING *"
        )
            .bind(&customer.id).bind(&customer.name).bind(&customer.email).bind(&customer.phone)
            .bind(&customer.kind).bind(&customer.status).bind(customer.balance_cents)
            .bind(&customer.locale).bind(customer.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Customer>, AppError> {
        sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE id = $1")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<Customer>, AppError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE id = ANY($1)")
            .bind(ids).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
