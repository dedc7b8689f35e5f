use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

pub const CARD_ACTIVE: &str = "ACTIVE";
pub const CARD_EXHAUSTED: &str = "EXHAUSTED";
pub const CARD_EXPIRED: &str = "EXPIRED";

/// Prepaid bundle of lesson credits ("leskaart") with a validity window.
///
/// Stored invariant: `remaining_credits = total_credits - used_credits`,
/// both non-negative. Mutation happens exclusively through the repository's
/// conditional deduct/restore statements.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct CreditCard {
    pub id: String,
    pub customer_id: String,
    pub total_credits: i32,
    pub used_credits: i32,
    pub remaining_credits: i32,
    pub valid_from: NaiveDate,
    pub valid_until: NaiveDate,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl CreditCard {
    pub fn new(customer_id: String, total_credits: i32, valid_from: NaiveDate, valid_until: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            customer_id,
            total_credits,
            used_credits: 0,
            remaining_credits: total_credits,
            valid_from,
            valid_until,
            status: CARD_ACTIVE.to_string(),
            created_at: Utc::now(),
        }
    }

    /// Expiry is a read-time derived fact: a card past `valid_until` is
    /// EXPIRED no matter what the row says. There is no background sweep
    /// rewriting stored statuses.
    pub fn effective_status(&self, as_of: NaiveDate) -> &str {
        if self.valid_until < as_of {
            CARD_EXPIRED
        } else {
            &self.status
        }
    }
}
