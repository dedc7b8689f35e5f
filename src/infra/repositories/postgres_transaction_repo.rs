use crate::domain::{models::transaction::CustomerTransaction, ports::TransactionRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresTransactionRepo {
    pool: PgPool,
}

impl PostgresTransactionRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionRepository for PostgresTransactionRepo {
    async fn create(&self, transaction: &CustomerTransaction) -> Result<CustomerTransaction, AppError> {
        sqlx::query_as::<_, CustomerTransaction>(
            "INSERT INTO transactions (id, customer_id, description, amount_cents, status, payment_id, due_date, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING *"
        )
            .bind(&transaction.id).bind(&transaction.customer_id).bind(&transaction.description)
            .bind(transaction.amount_cents).bind(&transaction.status).bind(&transaction.payment_id)
            .bind(transaction.due_date).bind(transaction.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<CustomerTransaction>, AppError> {
        sqlx::query_as::<_, CustomerTransaction>("SELECT * FROM transactions WHERE id = $1")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_open_by_customer(&self, customer_id: &str) -> Result<Vec<CustomerTransaction>, AppError> {
        sqlx::query_as::<_, CustomerTransaction>("SELECT * FROM transactions WHERE customer_id = $1 AND status = 'OPEN' ORDER BY created_at ASC")
            .bind(customer_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn set_payment_id(&self, id: &str, payment_id: &str) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE transactions SET payment_id = $1 WHERE id = $2")
            .bind(payment_id).bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Transaction not found".into()));
        }
        Ok(())
    }
}
