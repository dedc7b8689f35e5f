use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Dependent {
    pub id: String,
    /// The owning customer is the payer of record and is immutable after
    /// creation. There is no update path for this field.
    pub customer_id: String,
    pub name: String,
    pub birth_date: Option<NaiveDate>,
    /// ACTIVE or INACTIVE
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl Dependent {
    pub fn new(customer_id: String, name: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            customer_id,
            name,
            birth_date: None,
            status: "ACTIVE".to_string(),
            created_at: Utc::now(),
        }
    }
}
