use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

pub const TRANSACTION_OPEN: &str = "OPEN";

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct CustomerTransaction {
    pub id: String,
    pub customer_id: String,
    pub description: String,
    pub amount_cents: i64,
    /// OPEN or PAID
    pub status: String,
    /// Provider id, set once a payment link has been created.
    pub payment_id: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl CustomerTransaction {
    pub fn new(customer_id: String, description: String, amount_cents: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            customer_id,
            description,
            amount_cents,
            status: TRANSACTION_OPEN.to_string(),
            payment_id: None,
            due_date: None,
            created_at: Utc::now(),
        }
    }
}
