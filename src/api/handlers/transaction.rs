use axum::{extract::{Path, State}, response::IntoResponse, Json};
use std::sync::Arc;
use tera::Context;
use tracing::info;

use crate::api::dtos::responses::PaymentLinkResponse;
use crate::domain::models::transaction::TRANSACTION_OPEN;
use crate::error::AppError;
use crate::state::AppState;

/// Outbound trigger invoked from the dashboard: create a payment link for an
/// open transaction and mail it to the customer. Link creation and delivery
/// are both external collaborators.
pub async fn create_payment_link(
    State(state): State<Arc<AppState>>,
    Path(transaction_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let transaction = state.transaction_repo.find_by_id(&transaction_id).await?
        .ok_or(AppError::NotFound("Transaction not found".into()))?;

    if transaction.status != TRANSACTION_OPEN {
        return Err(AppError::Conflict("transaction is not open".into()));
    }

    let customer = state.customer_repo.find_by_id(&transaction.customer_id).await?
        .ok_or(AppError::NotFound("Customer not found".into()))?;

    let link = state.payment_service
        .create_payment_link(
            transaction.amount_cents,
            &transaction.description,
            &customer.email,
            &customer.name,
        )
        .await?;

    state.transaction_repo.set_payment_id(&transaction.id, &link.payment_id).await?;

    let mut context = Context::new();
    context.insert("customer_name", &customer.name);
    context.insert("description", &transaction.description);
    context.insert("amount_eur", &format!("{:.2}", transaction.amount_cents as f64 / 100.0));
    context.insert("payment_url", &link.payment_url);

    let html_body = state.templates
        .render("payment_link.html", &context)
        .map_err(|e| AppError::InternalWithMsg(format!("template render failed: {}", e)))?;
    let text_body = format!(
        "Beste {},\n\nEr staat een betaling open: {} (EUR {:.2}).\nBetalen kan via: {}\n",
        customer.name,
        transaction.description,
        transaction.amount_cents as f64 / 100.0,
        link.payment_url
    );

    state.email_service
        .send(&customer.email, "Betaalverzoek", &html_body, &text_body)
        .await?;

    info!("payment link {} sent for transaction {}", link.payment_id, transaction.id);

    Ok(Json(PaymentLinkResponse {
        transaction_id: transaction.id,
        payment_id: link.payment_id,
        payment_url: link.payment_url,
    }))
}
