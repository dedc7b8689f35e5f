use axum::{extract::{Path, Query, State}, response::IntoResponse, Json};
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::{IssueCardRequest, RemainingCreditsQuery};
use crate::api::dtos::responses::RemainingCreditsResponse;
use crate::domain::models::card::CreditCard;
use crate::error::AppError;
use crate::state::AppState;

fn parse_date(value: &str, field: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("{} must be YYYY-MM-DD", field)))
}

pub async fn issue_card(
    State(state): State<Arc<AppState>>,
    Path(customer_id): Path<String>,
    Json(payload): Json<IssueCardRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.total_credits < 0 {
        return Err(AppError::Validation("total_credits must be >= 0".into()));
    }
    let valid_from = parse_date(&payload.valid_from, "valid_from")?;
    let valid_until = parse_date(&payload.valid_until, "valid_until")?;
    if valid_until <= valid_from {
        return Err(AppError::Validation("valid_until must be after valid_from".into()));
    }

    let customer = state.customer_repo.find_by_id(&customer_id).await?
        .ok_or(AppError::NotFound("Customer not found".into()))?;

    // At most one ACTIVE, unexpired card per customer. The store has no
    // constraint for this, so issuance is where the invariant is enforced.
    // Expiry is derived at read time, so a stored ACTIVE row past its
    // valid_until must not block reissue.
    let active = state.card_repo.find_active_by_customer(&customer.id, Utc::now().date_naive()).await?;
    if let Some(current) = active.first() {
        return Err(AppError::Conflict(format!(
            "customer already holds active card {}",
            current.id
        )));
    }

    let card = CreditCard::new(customer.id.clone(), payload.total_credits, valid_from, valid_until);
    let created = state.card_repo.create(&card).await?;

    info!("issued card {} ({} credits) for customer {}", created.id, created.total_credits, customer.id);

    Ok(Json(created))
}

pub async fn list_cards(
    State(state): State<Arc<AppState>>,
    Path(customer_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let cards = state.card_repo.list_by_customer(&customer_id).await?;
    Ok(Json(cards))
}

pub async fn remaining_credits(
    State(state): State<Arc<AppState>>,
    Path(customer_id): Path<String>,
    Query(query): Query<RemainingCreditsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let as_of = match &query.as_of {
        Some(raw) => parse_date(raw, "as_of")?,
        None => Utc::now().date_naive(),
    };

    let customer = state.customer_repo.find_by_id(&customer_id).await?
        .ok_or(AppError::NotFound("Customer not found".into()))?;

    let remaining = state.card_repo.remaining_for_customer(&customer.id, as_of).await?;

    Ok(Json(RemainingCreditsResponse {
        customer_id: customer.id,
        as_of: as_of.to_string(),
        remaining_credits: remaining,
    }))
}
