use crate::domain::ports::{PaymentLink, PaymentService};
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::error;

/// Client for the hosted payment-link provider. The provider owns everything
/// past link creation (checkout, webhooks, settlement).
pub struct HttpPaymentService {
    client: Client,
    api_url: String,
    api_key: String,
}

impl HttpPaymentService {
    pub fn new(api_url: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_url,
            api_key,
        }
    }
}

#[derive(Serialize)]
struct PaymentLinkRequest {
    amount_cents: i64,
    description: String,
    customer_email: String,
    customer_name: String,
}

#[derive(Deserialize)]
struct PaymentLinkResponse {
    payment_id: String,
    payment_url: String,
}

#[async_trait]
impl PaymentService for HttpPaymentService {
    async fn create_payment_link(
        &self,
        amount_cents: i64,
        description: &str,
        customer_email: &str,
        customer_name: &str,
    ) -> Result<PaymentLink, AppError> {
        let payload = PaymentLinkRequest {
            amount_cents,
            description: description.to_string(),
            customer_email: customer_email.to_string(),
            customer_name: customer_name.to_string(),
        };

        let res = self.client.post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                let msg = format!("Payment service connection error: {}", e);
                error!("{}", msg);
                AppError::InternalWithMsg(msg)
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            let msg = format!("Payment service failed. Status: {}, Body: {}", status, text);
            error!("{}", msg);
            return Err(AppError::InternalWithMsg(msg));
        }

        let body: PaymentLinkResponse = res.json().await.map_err(|e| {
            let msg = format!("Payment service returned invalid body: {}", e);
            error!("{}", msg);
            AppError::InternalWithMsg(msg)
        })?;

        Ok(PaymentLink {
            payment_id: body.payment_id,
            payment_url: body.payment_url,
        })
    }
}
