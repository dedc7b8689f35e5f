use axum::{extract::State, response::IntoResponse, Json};
use chrono::Utc;
use std::sync::Arc;
use tracing::warn;

use crate::api::extractors::api_key::PortalKey;
use crate::domain::services::snapshot::customer_snapshot;
use crate::state::AppState;
use crate::error::AppError;

/// The one endpoint the external client app consumes: everything about the
/// key's bound customer in a single read. Sections degrade independently
/// (see `customer_snapshot`); only a missing customer row is a hard 404.
pub async fn me(
    State(state): State<Arc<AppState>>,
    PortalKey(key): PortalKey,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = customer_snapshot(&state, &key.customer_id).await?;

    // Touch last_used_at only after the call has actually produced a
    // response; rejected or failed calls leave it untouched.
    if let Err(e) = state.api_key_repo.touch_last_used(&key.id, Utc::now()).await {
        warn!("failed to update last_used_at for key {}: {}", key.id, e);
    }

    Ok(Json(snapshot))
}
