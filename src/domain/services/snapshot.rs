use chrono::Utc;
use serde::Serialize;
use tracing::error;

use crate::domain::models::{
    customer::{Customer, CUSTOMER_ACTIVE},
    dependent::Dependent,
    transaction::CustomerTransaction,
};
use crate::domain::services::calendar::{day_name, truncate_to_minutes};
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CardView {
    pub id: String,
    pub total_credits: i32,
    pub used_credits: i32,
    pub remaining_credits: i32,
    pub valid_from: String,
    pub valid_until: String,
    /// Effective status: EXPIRED past valid_until regardless of the row.
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct ResolvedLessonView {
    pub lesson_id: String,
    /// Localized to the customer's locale.
    pub day_name: String,
    pub start_time: String,
    pub duration_min: i32,
    pub lesson_type: String,
    pub instructor: String,
    pub attendee_name: String,
    pub via_dependent: bool,
}

#[derive(Debug, Serialize)]
pub struct SectionFailure {
    pub section: String,
    pub error: String,
}

/// Best-effort aggregate of everything the dashboard and the external portal
/// show for one customer. The customer row itself is required; every other
/// section degrades independently, leaving its field null and an entry in
/// `failed_sections`, so one broken sub-query never blanks the whole screen.
#[derive(Debug, Serialize)]
pub struct CustomerSnapshot {
    pub customer: Customer,
    #[serde(rename = "totaalResterendeLessen")]
    pub total_remaining_credits: Option<i64>,
    pub cards: Option<Vec<CardView>>,
    pub lessons: Option<Vec<ResolvedLessonView>>,
    pub dependents: Option<Vec<Dependent>>,
    pub open_transactions: Option<Vec<CustomerTransaction>>,
    pub failed_sections: Vec<SectionFailure>,
}

fn take<T>(
    section: &str,
    result: Result<T, AppError>,
    failures: &mut Vec<SectionFailure>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            error!("snapshot section '{}' failed: {}", section, e);
            failures.push(SectionFailure {
                section: section.to_string(),
                error: e.to_string(),
            });
            None
        }
    }
}

pub async fn customer_snapshot(
    state: &AppState,
    customer_id: &str,
) -> Result<CustomerSnapshot, AppError> {
    let customer = state
        .customer_repo
        .find_by_id(customer_id)
        .await?
        .ok_or(AppError::CustomerNotFound)?;

    let today = Utc::now().date_naive();
    let mut failures = Vec::new();

    let total_remaining_credits = take(
        "remaining_credits",
        state.card_repo.remaining_for_customer(&customer.id, today).await,
        &mut failures,
    );

    let cards = take(
        "cards",
        state.card_repo.list_by_customer(&customer.id).await,
        &mut failures,
    )
    .map(|cards| {
        cards
            .into_iter()
            .map(|card| CardView {
                status: card.effective_status(today).to_string(),
                id: card.id,
                total_credits: card.total_credits,
                used_credits: card.used_credits,
                remaining_credits: card.remaining_credits,
                valid_from: card.valid_from.to_string(),
                valid_until: card.valid_until.to_string(),
            })
            .collect()
    });

    let lessons = take(
        "lessons",
        resolved_lessons_for(state, &customer).await,
        &mut failures,
    );

    let dependents = take(
        "dependents",
        state.dependent_repo.list_by_customer(&customer.id).await,
        &mut failures,
    );

    let open_transactions = take(
        "open_transactions",
        state.transaction_repo.list_open_by_customer(&customer.id).await,
        &mut failures,
    );

    Ok(CustomerSnapshot {
        customer,
        total_remaining_credits,
        cards,
        lessons,
        dependents,
        open_transactions,
        failed_sections: failures,
    })
}

async fn resolved_lessons_for(
    state: &AppState,
    customer: &Customer,
) -> Result<Vec<ResolvedLessonView>, AppError> {
    let rostered = state.lesson_repo.list_rostered_for_customer(&customer.id).await?;

    // Same rules as roster resolution: inactive attendees drop out, and a
    // dependent whose stored owner disagrees with the entry's payer is a data
    // integrity violation, never rendered as if it were fine.
    let mut views = Vec::with_capacity(rostered.len());
    for (lesson, entry) in rostered {
        let attendee_name = match &entry.dependent_id {
            Some(dependent_id) => {
                let dependent = state
                    .dependent_repo
                    .find_by_id(dependent_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::DataIntegrity(format!(
                            "roster entry {} references missing dependent",
                            entry.id
                        ))
                    })?;
                if dependent.customer_id != entry.customer_id {
                    return Err(AppError::DataIntegrity(format!(
                        "roster entry {} payer mismatch for dependent {}",
                        entry.id, dependent.id
                    )));
                }
                if dependent.status != CUSTOMER_ACTIVE {
                    continue;
                }
                dependent.name
            }
            None => {
                if customer.status != CUSTOMER_ACTIVE {
                    continue;
                }
                customer.name.clone()
            }
        };

        views.push(ResolvedLessonView {
            lesson_id: lesson.id,
            day_name: day_name(lesson.day_of_week, &customer.locale).to_string(),
            start_time: truncate_to_minutes(&lesson.start_time).to_string(),
            duration_min: lesson.duration_min,
            lesson_type: lesson.lesson_type,
            instructor: lesson.instructor,
            attendee_name,
            via_dependent: entry.dependent_id.is_some(),
        });
    }

    Ok(views)
}
