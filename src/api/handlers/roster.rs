use axum::{extract::{Path, State}, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::AddRosterEntryRequest;
use crate::domain::models::lesson::RosterEntry;
use crate::domain::services::ledger::resolve_lesson_roster;
use crate::error::AppError;
use crate::state::AppState;

pub async fn get_resolved_roster(
    State(state): State<Arc<AppState>>,
    Path(lesson_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let (lesson, resolution) = resolve_lesson_roster(&state, &lesson_id).await?;

    Ok(Json(json!({
        "lesson_id": lesson.id,
        "max_participants": lesson.max_participants,
        "attendees": resolution.attendees,
        "over_capacity": resolution.over_capacity,
    })))
}

pub async fn add_roster_entry(
    State(state): State<Arc<AppState>>,
    Path(lesson_id): Path<String>,
    Json(payload): Json<AddRosterEntryRequest>,
) -> Result<impl IntoResponse, AppError> {
    let lesson = state.lesson_repo.find_by_id(&lesson_id).await?
        .ok_or(AppError::NotFound("Lesson not found".into()))?;

    let customer = state.customer_repo.find_by_id(&payload.customer_id).await?
        .ok_or(AppError::NotFound("Customer not found".into()))?;

    if let Some(dependent_id) = &payload.dependent_id {
        let dependent = state.dependent_repo.find_by_id(dependent_id).await?
            .ok_or(AppError::NotFound("Dependent not found".into()))?;
        if dependent.customer_id != customer.id {
            return Err(AppError::Validation(format!(
                "dependent {} is not owned by customer {}",
                dependent.id, customer.id
            )));
        }
    }

    // Duplicate (customer, dependent) pairs bounce off the unique index as 409.
    let entry = RosterEntry::new(lesson.id.clone(), customer.id, payload.dependent_id);
    let created = state.lesson_repo.add_roster_entry(&entry).await?;

    info!("roster entry {} added to lesson {}", created.id, lesson.id);

    Ok(Json(created))
}

pub async fn delete_roster_entry(
    State(state): State<Arc<AppState>>,
    Path((lesson_id, entry_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    state.lesson_repo.delete_roster_entry(&lesson_id, &entry_id).await?;
    Ok(Json(json!({ "deleted": entry_id })))
}
