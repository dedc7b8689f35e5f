use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

pub const CUSTOMER_ACTIVE: &str = "ACTIVE";

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    /// RIDING_SCHOOL or BOARDING
    pub kind: String,
    /// ACTIVE, WAITLISTED or INACTIVE. Customers are never hard-deleted.
    pub status: String,
    pub balance_cents: i64,
    /// BCP-47-ish language tag used when rendering day names in the portal.
    pub locale: String,
    pub created_at: DateTime<Utc>,
}

impl Customer {
    pub fn new(name: String, email: String, kind: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            email,
            phone: None,
            kind,
            status: CUSTOMER_ACTIVE.to_string(),
            balance_cents: 0,
            locale: "nl".to_string(),
            created_at: Utc::now(),
        }
    }
}
