use axum::{extract::{Path, State}, response::IntoResponse, Json};
use chrono::NaiveDate;
use std::sync::Arc;

use crate::api::dtos::requests::GenerateOccurrenceRequest;
use crate::domain::services::ledger;
use crate::error::AppError;
use crate::state::AppState;

pub async fn generate_occurrence(
    State(state): State<Arc<AppState>>,
    Path(lesson_id): Path<String>,
    Json(payload): Json<GenerateOccurrenceRequest>,
) -> Result<impl IntoResponse, AppError> {
    let date = NaiveDate::parse_from_str(&payload.date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("date must be YYYY-MM-DD".into()))?;

    let outcome = ledger::generate_occurrence(&state, &lesson_id, date).await?;
    Ok(Json(outcome))
}

pub async fn list_occurrence_records(
    State(state): State<Arc<AppState>>,
    Path(occurrence_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let records = state.attendance_repo.list_by_occurrence(&occurrence_id).await?;
    Ok(Json(records))
}

pub async fn mark_attended(
    State(state): State<Arc<AppState>>,
    Path(record_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = ledger::mark_attended(&state, &record_id).await?;
    Ok(Json(outcome))
}

pub async fn cancel(
    State(state): State<Arc<AppState>>,
    Path(record_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let record = ledger::cancel_record(&state, &record_id).await?;
    Ok(Json(record))
}

pub async fn correct_to_not_counted(
    State(state): State<Arc<AppState>>,
    Path(record_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let record = ledger::correct_to_not_counted(&state, &record_id).await?;
    Ok(Json(record))
}
