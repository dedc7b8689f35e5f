use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use rand::{distributions::Alphanumeric, Rng};

pub const API_KEY_ACTIVE: &str = "ACTIVE";

/// Key giving the external client app read access to one customer's data.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct ApiKey {
    pub id: String,
    pub customer_id: String,
    pub api_key: String,
    /// ACTIVE or REVOKED
    pub status: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl ApiKey {
    pub fn new(customer_id: String, expires_at: Option<DateTime<Utc>>) -> Self {
        let key: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(48)
            .map(char::from)
            .collect();

        Self {
            id: Uuid::new_v4().to_string(),
            customer_id,
            api_key: key,
            status: API_KEY_ACTIVE.to_string(),
            expires_at,
            last_used_at: None,
            created_at: Utc::now(),
        }
    }

    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        if self.status != API_KEY_ACTIVE {
            return false;
        }
        match self.expires_at {
            Some(expiry) => expiry > now,
            None => true,
        }
    }
}
