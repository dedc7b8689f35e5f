use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::domain::models::attendance::{
    AttendanceRecord, NewAttendanceParams, ATTENDANCE_ATTENDED, ATTENDANCE_CANCELLED,
    ATTENDANCE_NOT_COUNTED, ATTENDANCE_SCHEDULED,
};
use crate::domain::models::lesson::RecurringLesson;
use crate::domain::services::calendar::weekday_index;
use crate::domain::services::roster::{resolve_roster, RosterResolution};
use crate::error::AppError;
use crate::state::AppState;

/// Fetches a lesson plus the current state of everyone on its roster and
/// resolves the attendee list. Shared by the roster read endpoint and
/// occurrence generation so both always see the same resolution rules.
pub async fn resolve_lesson_roster(
    state: &AppState,
    lesson_id: &str,
) -> Result<(RecurringLesson, RosterResolution), AppError> {
    let lesson = state
        .lesson_repo
        .find_by_id(lesson_id)
        .await?
        .ok_or(AppError::NotFound("Lesson not found".into()))?;

    let entries = state.lesson_repo.list_roster_entries(&lesson.id).await?;

    let customer_ids: Vec<String> = entries.iter().map(|e| e.customer_id.clone()).collect();
    let dependent_ids: Vec<String> = entries
        .iter()
        .filter_map(|e| e.dependent_id.clone())
        .collect();

    let customers = state.customer_repo.find_by_ids(&customer_ids).await?;
    let dependents = state.dependent_repo.find_by_ids(&dependent_ids).await?;

    let resolution = resolve_roster(&lesson, &entries, &customers, &dependents)?;
    Ok((lesson, resolution))
}

#[derive(Debug, Serialize)]
pub struct OccurrenceGap {
    pub customer_id: String,
    pub dependent_id: Option<String>,
    pub display_name: String,
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct OccurrenceOutcome {
    pub occurrence_id: String,
    pub records: Vec<AttendanceRecord>,
    pub gaps: Vec<OccurrenceGap>,
    pub over_capacity: bool,
}

/// Materializes one calendar-dated occurrence of a recurring lesson: one
/// SCHEDULED record per resolved attendee, bound to the payer's current
/// deduction card. An attendee without a usable card becomes a reported gap,
/// never a failure of the whole generation. Re-running for the same date only
/// fills in attendees that were added to the roster since.
pub async fn generate_occurrence(
    state: &AppState,
    lesson_id: &str,
    date: NaiveDate,
) -> Result<OccurrenceOutcome, AppError> {
    let (lesson, resolution) = resolve_lesson_roster(state, lesson_id).await?;

    if weekday_index(date) != lesson.day_of_week {
        return Err(AppError::Validation(format!(
            "{} does not fall on the lesson's weekday",
            date
        )));
    }

    let occurrence_id = AttendanceRecord::occurrence_key(&lesson.id, date);
    let existing = state.attendance_repo.list_by_occurrence(&occurrence_id).await?;

    let mut records = Vec::new();
    let mut gaps = Vec::new();

    for attendee in &resolution.attendees {
        let already_present = existing.iter().any(|r| {
            r.customer_id == attendee.customer_id && r.dependent_id == attendee.dependent_id
        });
        if already_present {
            continue;
        }

        let card = state
            .card_repo
            .find_deduction_card(&attendee.payer_customer_id, date)
            .await?;

        let Some(card) = card else {
            warn!(
                "occurrence {}: no active card for {} (payer {}), skipping",
                occurrence_id, attendee.display_name, attendee.payer_customer_id
            );
            gaps.push(OccurrenceGap {
                customer_id: attendee.customer_id.clone(),
                dependent_id: attendee.dependent_id.clone(),
                display_name: attendee.display_name.clone(),
                reason: "no active credit card".to_string(),
            });
            continue;
        };

        let record = AttendanceRecord::new(NewAttendanceParams {
            lesson_id: lesson.id.clone(),
            customer_id: attendee.customer_id.clone(),
            dependent_id: attendee.dependent_id.clone(),
            card_id: card.id,
            lesson_date: date,
            start_time: lesson.start_time.clone(),
            duration_min: lesson.duration_min,
        });
        records.push(state.attendance_repo.create(&record).await?);
    }

    info!(
        "occurrence {}: {} records created, {} gaps",
        occurrence_id,
        records.len(),
        gaps.len()
    );

    Ok(OccurrenceOutcome {
        occurrence_id,
        records,
        gaps,
        over_capacity: resolution.over_capacity,
    })
}

#[derive(Debug, Serialize)]
pub struct AttendOutcome {
    pub record: AttendanceRecord,
    pub credit_deducted: bool,
}

async fn load_record(state: &AppState, record_id: &str) -> Result<AttendanceRecord, AppError> {
    state
        .attendance_repo
        .find_by_id(record_id)
        .await?
        .ok_or(AppError::NotFound("Attendance record not found".into()))
}

/// SCHEDULED -> ATTENDED with a credit deduction. If the bound card cannot
/// cover it the record lands in NOT_COUNTED instead; a record is never marked
/// attended without its deduction.
pub async fn mark_attended(state: &AppState, record_id: &str) -> Result<AttendOutcome, AppError> {
    let mut record = load_record(state, record_id).await?;

    if record.status != ATTENDANCE_SCHEDULED {
        return Err(AppError::Conflict(format!(
            "record is {}, expected SCHEDULED",
            record.status
        )));
    }

    match state.card_repo.deduct(&record.card_id, 1).await {
        Ok(card) => {
            record.status = ATTENDANCE_ATTENDED.to_string();
            record.auto_deducted = true;
            record.modified_at = Some(Utc::now());
            let record = state.attendance_repo.update(&record).await?;
            info!(
                "record {} attended, card {} now at {} credits",
                record.id, card.id, card.remaining_credits
            );
            Ok(AttendOutcome { record, credit_deducted: true })
        }
        Err(AppError::InsufficientCredits(_)) => {
            warn!(
                "record {}: card {} has no credits left, marking NOT_COUNTED",
                record.id, record.card_id
            );
            record.status = ATTENDANCE_NOT_COUNTED.to_string();
            record.modified_at = Some(Utc::now());
            let record = state.attendance_repo.update(&record).await?;
            Ok(AttendOutcome { record, credit_deducted: false })
        }
        Err(e) => Err(e),
    }
}

/// SCHEDULED -> CANCELLED, restoring the credit if one was already deducted.
/// Cancelling an already-cancelled record is a no-op.
pub async fn cancel_record(state: &AppState, record_id: &str) -> Result<AttendanceRecord, AppError> {
    let mut record = load_record(state, record_id).await?;

    if record.status == ATTENDANCE_CANCELLED {
        return Ok(record);
    }
    if record.status != ATTENDANCE_SCHEDULED {
        return Err(AppError::Conflict(format!(
            "record is {}, a finalized record needs a correction instead",
            record.status
        )));
    }

    if record.auto_deducted {
        state.card_repo.restore(&record.card_id, 1).await?;
        record.auto_deducted = false;
    }

    record.status = ATTENDANCE_CANCELLED.to_string();
    record.cancelled_at = Some(Utc::now());
    state.attendance_repo.update(&record).await
}

/// Clerical correction: pulls a SCHEDULED or ATTENDED record out of the
/// count, restoring the credit if one was deducted. Idempotent on records
/// already NOT_COUNTED.
pub async fn correct_to_not_counted(
    state: &AppState,
    record_id: &str,
) -> Result<AttendanceRecord, AppError> {
    let mut record = load_record(state, record_id).await?;

    if record.status == ATTENDANCE_NOT_COUNTED {
        return Ok(record);
    }
    if record.status == ATTENDANCE_CANCELLED {
        return Err(AppError::Conflict(
            "cancelled records cannot be corrected to NOT_COUNTED".into(),
        ));
    }

    if record.auto_deducted {
        state.card_repo.restore(&record.card_id, 1).await?;
        record.auto_deducted = false;
    }

    record.status = ATTENDANCE_NOT_COUNTED.to_string();
    record.modified_at = Some(Utc::now());
    state.attendance_repo.update(&record).await
}
