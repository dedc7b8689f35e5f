use axum::{extract::{Path, State}, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::IssueApiKeyRequest;
use crate::api::dtos::responses::ApiKeyIssuedResponse;
use crate::domain::models::api_key::ApiKey;
use crate::domain::services::snapshot::customer_snapshot;
use crate::error::AppError;
use crate::state::AppState;

pub async fn get_snapshot(
    State(state): State<Arc<AppState>>,
    Path(customer_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = customer_snapshot(&state, &customer_id).await?;
    Ok(Json(snapshot))
}

pub async fn issue_api_key(
    State(state): State<Arc<AppState>>,
    Path(customer_id): Path<String>,
    Json(payload): Json<IssueApiKeyRequest>,
) -> Result<impl IntoResponse, AppError> {
    let customer = state.customer_repo.find_by_id(&customer_id).await?
        .ok_or(AppError::NotFound("Customer not found".into()))?;

    let key = ApiKey::new(customer.id.clone(), payload.expires_at);
    let created = state.api_key_repo.create(&key).await?;

    info!("issued api key {} for customer {}", created.id, customer.id);

    // The plain key is returned exactly once, at issuance.
    Ok(Json(ApiKeyIssuedResponse {
        id: created.id,
        api_key: created.api_key,
        expires_at: created.expires_at.map(|t| t.to_rfc3339()),
    }))
}
