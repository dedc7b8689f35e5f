use crate::domain::{models::transaction::CustomerTransaction, ports::TransactionRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteTransactionRepo {
    pool: SqlitePool,
}

impl SqliteTransactionRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionRepository for SqliteTransactionRepo {
    async fn create(&self, transaction: &CustomerTransaction) -> Result<CustomerTransaction, AppError> {
        sqlx::query_as::<_, CustomerTransaction>(
            "INSERT INTO transactions (id, customer_id, description, amount_cents, status, payment_id, due_date, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&transaction.id).bind(&transaction.customer_id).bind(&transaction.description)
            .bind(transaction.amount_cents).bind(&transaction.status).bind(&transaction.payment_id)
            .bind(transaction.due_date).bind(transaction.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<CustomerTransaction>, AppError> {
        sqlx::query_as::<_, CustomerTransaction>("SELECT * FROM transactions WHERE id = ?")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_open_by_customer(&self, customer_id: &str) -> Result<Vec<CustomerTransaction>, AppError> {
        sqlx::query_as::<_, CustomerTransaction>("SELECT * FROM transactions WHERE customer_id = ? AND status = 'OPEN' ORDER BY created_at ASC")
            .bind(customer_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn set_payment_id(&self, id: &str, payment_id: &str) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE transactions SET payment_id = ? WHERE id = ?")
            .bind(payment_id).bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Transaction not found".into()));
        }
        Ok(())
    }
}
