use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct IssueCardRequest {
    pub total_credits: i32,
    /// "YYYY-MM-DD"
    pub valid_from: String,
    pub valid_until: String,
}

#[derive(Deserialize)]
pub struct AddRosterEntryRequest {
    pub customer_id: String,
    pub dependent_id: Option<String>,
}

#[derive(Deserialize)]
pub struct GenerateOccurrenceRequest {
    /// "YYYY-MM-DD", must fall on the lesson's weekday
    pub date: String,
}

#[derive(Deserialize)]
pub struct IssueApiKeyRequest {
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
pub struct RemainingCreditsQuery {
    /// "YYYY-MM-DD", defaults to today
    pub as_of: Option<String>,
}
