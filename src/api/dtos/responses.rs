use serde::Serialize;

#[derive(Serialize)]
pub struct RemainingCreditsResponse {
    pub customer_id: String,
    pub as_of: String,
    pub remaining_credits: i64,
}

#[derive(Serialize)]
pub struct ApiKeyIssuedResponse {
    pub id: String,
    pub api_key: String,
    pub expires_at: Option<String>,
}

#[derive(Serialize)]
pub struct PaymentLinkResponse {
    pub transaction_id: String,
    pub payment_id: String,
    pub payment_url: String,
}
