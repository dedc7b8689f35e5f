use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use crate::domain::models::api_key::ApiKey;
use crate::error::AppError;
use crate::state::AppState;
use chrono::Utc;
use std::sync::Arc;
use tracing::warn;

/// Validated `X-API-Key` caller for the external read API. The key must be
/// ACTIVE and unexpired on every single call. `last_used_at` is deliberately
/// NOT touched here: it is only updated by the handler after the request
/// actually succeeded.
pub struct PortalKey(pub ApiKey);

impl<S> FromRequestParts<S> for PortalKey
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("X-API-Key")
            .ok_or(AppError::MissingApiKey)?
            .to_str()
            .map_err(|_| AppError::InvalidApiKey)?
            .to_string();

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);

        let key = app_state
            .api_key_repo
            .find_by_key(&header)
            .await?
            .ok_or(AppError::InvalidApiKey)?;

        if !key.is_usable(Utc::now()) {
            warn!("rejected portal call with inactive or expired key {}", key.id);
            return Err(AppError::InvalidApiKey);
        }

        Ok(PortalKey(key))
    }
}
