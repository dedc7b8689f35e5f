use crate::domain::{models::card::CreditCard, ports::CardRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{Row, SqlitePool};

pub struct SqliteCardRepo {
    pool: SqlitePool,
}

impl SqliteCardRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CardRepository for SqliteCardRepo {
    async fn create(&self, card: &CreditCard) -> Result<CreditCard, AppError> {
        sqlx::query_as::<_, CreditCard>(
            "INSERT INTO credit_cards (id, customer_id, total_credits, used_credits, remaining_credits, valid_from, valid_until, status, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&card.id).bind(&card.customer_id).bind(card.total_credits).bind(card.used_credits)
            .bind(card.remaining_credits).bind(card.valid_from).bind(card.valid_until)
            .bind(&card.status).bind(card.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<CreditCard>, AppError> {
        sqlx::query_as::<_, CreditCard>("SELECT * FROM credit_cards WHERE id = ?")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_customer(&self, customer_id: &str) -> Result<Vec<CreditCard>, AppError> {
        sqlx::query_as::<_, CreditCard>("SELECT * FROM credit_cards WHERE customer_id = ? ORDER BY valid_until ASC, id ASC")
            .bind(customer_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_active_by_customer(&self, customer_id: &str, as_of: NaiveDate) -> Result<Vec<CreditCard>, AppError> {
        sqlx::query_as::<_, CreditCard>("SELECT * FROM credit_cards WHERE customer_id = ? AND status = 'ACTIVE' AND valid_until >= ? ORDER BY valid_until ASC, id ASC")
            .bind(customer_id).bind(as_of).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_deduction_card(&self, customer_id: &str, on_date: NaiveDate) -> Result<Option<CreditCard>, AppError> {
        sqlx::query_as::<_, CreditCard>(
            "SELECT * FROM credit_cards
             WHERE customer_id = ? AND status = 'ACTIVE' AND valid_until >= ?
             ORDER BY valid_until ASC, id ASC
             LIMIT 1"
        )
            .bind(customer_id).bind(on_date)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn deduct(&self, card_id: &str, count: i32) -> Result<CreditCard, AppError> {
        // Single conditional update: the WHERE guard and the balance change
        // are one statement, so two concurrent deductions can never both
        // consume the same prior value.
        let updated = sqlx::query_as::<_, CreditCard>(
            "UPDATE credit_cards
             SET used_credits = used_credits + ?,
                 remaining_credits = remaining_credits - ?,
                 status = CASE WHEN remaining_credits - ? = 0 THEN 'EXHAUSTED' ELSE status END
             WHERE id = ? AND remaining_credits >= ?
             RETURNING *"
        )
            .bind(count).bind(count).bind(count).bind(card_id).bind(count)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?;

        match updated {
            Some(card) => Ok(card),
            None => match self.find_by_id(card_id).await? {
                Some(card) => Err(AppError::InsufficientCredits(format!(
                    "card {} has {} credits, {} requested",
                    card.id, card.remaining_credits, count
                ))),
                None => Err(AppError::NotFound("Credit card not found".into())),
            },
        }
    }

    async fn restore(&self, card_id: &str, count: i32) -> Result<CreditCard, AppError> {
        let updated = sqlx::query_as::<_, CreditCard>(
            "UPDATE credit_cards
             SET used_credits = used_credits - ?,
                 remaining_credits = remaining_credits + ?,
                 status = CASE WHEN status = 'EXHAUSTED' AND remaining_credits + ? > 0 THEN 'ACTIVE' ELSE status END
             WHERE id = ? AND used_credits >= ?
             RETURNING *"
        )
            .bind(count).bind(count).bind(count).bind(card_id).bind(count)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?;

        match updated {
            Some(card) => Ok(card),
            None => match self.find_by_id(card_id).await? {
                Some(_) => Err(AppError::OverRestore(card_id.to_string())),
                None => Err(AppError::NotFound("Credit card not found".into())),
            },
        }
    }

    async fn remaining_for_customer(&self, customer_id: &str, as_of: NaiveDate) -> Result<i64, AppError> {
        let row = sqlx::query(
            "SELECT COALESCE(SUM(remaining_credits), 0) as total
             FROM credit_cards
             WHERE customer_id = ? AND status != 'EXPIRED' AND valid_until >= ?"
        )
            .bind(customer_id).bind(as_of)
            .fetch_one(&self.pool).await.map_err(AppError::Database)?;
        Ok(row.get::<i64, _>("total"))
    }
}
