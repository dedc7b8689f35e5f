use std::collections::HashMap;

use serde::Serialize;
use tracing::{error, warn};

use crate::domain::models::{
    customer::{Customer, CUSTOMER_ACTIVE},
    dependent::Dependent,
    lesson::{RecurringLesson, RosterEntry},
};
use crate::error::AppError;

#[derive(Debug, Serialize, Clone)]
pub struct ResolvedAttendee {
    pub customer_id: String,
    pub dependent_id: Option<String>,
    pub display_name: String,
    /// Always the billed party: for a dependent entry this is the owning
    /// customer, for a direct entry the attendee themself.
    pub payer_customer_id: String,
}

#[derive(Debug, Serialize)]
pub struct RosterResolution {
    pub attendees: Vec<ResolvedAttendee>,
    pub over_capacity: bool,
}

/// Resolves the standing roster of a weekly lesson into concrete attendees.
///
/// Status filtering happens here, at resolution time: an entry whose person
/// has gone inactive stays stored but drops out of the result. A dependent
/// entry whose stored owner disagrees with the entry's payer is a data
/// integrity violation and is never silently patched up.
pub fn resolve_roster(
    lesson: &RecurringLesson,
    entries: &[RosterEntry],
    customers: &[Customer],
    dependents: &[Dependent],
) -> Result<RosterResolution, AppError> {
    let customers_by_id: HashMap<&str, &Customer> =
        customers.iter().map(|c| (c.id.as_str(), c)).collect();
    let dependents_by_id: HashMap<&str, &Dependent> =
        dependents.iter().map(|d| (d.id.as_str(), d)).collect();

    let mut attendees = Vec::new();

    for entry in entries {
        match &entry.dependent_id {
            Some(dependent_id) => {
                let dependent = dependents_by_id.get(dependent_id.as_str()).ok_or_else(|| {
                    error!(
                        "roster entry {} references missing dependent {}",
                        entry.id, dependent_id
                    );
                    AppError::DataIntegrity(format!(
                        "roster entry {} references missing dependent",
                        entry.id
                    ))
                })?;

                if dependent.customer_id != entry.customer_id {
                    error!(
                        "roster entry {}: payer {} does not own dependent {} (owner {})",
                        entry.id, entry.customer_id, dependent.id, dependent.customer_id
                    );
                    return Err(AppError::DataIntegrity(format!(
                        "roster entry {} payer mismatch for dependent {}",
                        entry.id, dependent.id
                    )));
                }

                if dependent.status != CUSTOMER_ACTIVE {
                    continue;
                }

                attendees.push(ResolvedAttendee {
                    customer_id: entry.customer_id.clone(),
                    dependent_id: Some(dependent.id.clone()),
                    display_name: dependent.name.clone(),
                    payer_customer_id: dependent.customer_id.clone(),
                });
            }
            None => {
                let customer = customers_by_id.get(entry.customer_id.as_str()).ok_or_else(|| {
                    error!(
                        "roster entry {} references missing customer {}",
                        entry.id, entry.customer_id
                    );
                    AppError::DataIntegrity(format!(
                        "roster entry {} references missing customer",
                        entry.id
                    ))
                })?;

                if customer.status != CUSTOMER_ACTIVE {
                    continue;
                }

                attendees.push(ResolvedAttendee {
                    customer_id: customer.id.clone(),
                    dependent_id: None,
                    display_name: customer.name.clone(),
                    payer_customer_id: customer.id.clone(),
                });
            }
        }
    }

    // Capacity is informational. The schedule tooling may deliberately
    // overbook; we report, the caller decides.
    let over_capacity = attendees.len() as i32 > lesson.max_participants;
    if over_capacity {
        warn!(
            "lesson {} roster has {} attendees, capacity {}",
            lesson.id,
            attendees.len(),
            lesson.max_participants
        );
    }

    Ok(RosterResolution { attendees, over_capacity })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::lesson::NewLessonParams;

    fn lesson(max: i32) -> RecurringLesson {
        RecurringLesson::new(NewLessonParams {
            day_of_week: 0,
            start_time: "10:00".to_string(),
            duration_min: 60,
            lesson_type: "group".to_string(),
            instructor: "Eva".to_string(),
            max_participants: max,
        })
    }

    fn customer(name: &str) -> Customer {
        Customer::new(name.to_string(), format!("{}@example.com", name), "RIDING_SCHOOL".to_string())
    }

    #[test]
    fn dependent_entry_resolves_to_owning_payer() {
        let lesson = lesson(8);
        let payer = customer("carla");
        let dependent = Dependent::new(payer.id.clone(), "Kim".to_string());
        let entries = vec![RosterEntry::new(
            lesson.id.clone(),
            payer.id.clone(),
            Some(dependent.id.clone()),
        )];

        let resolution =
            resolve_roster(&lesson, &entries, &[payer.clone()], &[dependent.clone()]).unwrap();

        assert_eq!(resolution.attendees.len(), 1);
        let attendee = &resolution.attendees[0];
        assert_eq!(attendee.dependent_id.as_deref(), Some(dependent.id.as_str()));
        assert_eq!(attendee.payer_customer_id, payer.id);
        assert_eq!(attendee.display_name, "Kim");
        assert!(!resolution.over_capacity);
    }

    #[test]
    fn payer_mismatch_is_an_integrity_error() {
        let lesson = lesson(8);
        let payer = customer("carla");
        let other = customer("bart");
        let dependent = Dependent::new(other.id.clone(), "Kim".to_string());
        let entries = vec![RosterEntry::new(
            lesson.id.clone(),
            payer.id.clone(),
            Some(dependent.id.clone()),
        )];

        let err = resolve_roster(
            &lesson,
            &entries,
            &[payer, other],
            std::slice::from_ref(&dependent),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::DataIntegrity(_)));
    }

    #[test]
    fn inactive_people_are_skipped_at_resolution_time() {
        let lesson = lesson(8);
        let mut direct = customer("anna");
        direct.status = "INACTIVE".to_string();
        let payer = customer("carla");
        let mut dependent = Dependent::new(payer.id.clone(), "Kim".to_string());
        dependent.status = "INACTIVE".to_string();

        let entries = vec![
            RosterEntry::new(lesson.id.clone(), direct.id.clone(), None),
            RosterEntry::new(lesson.id.clone(), payer.id.clone(), Some(dependent.id.clone())),
        ];

        let resolution =
            resolve_roster(&lesson, &entries, &[direct, payer], &[dependent]).unwrap();
        assert!(resolution.attendees.is_empty());
    }

    #[test]
    fn exceeding_capacity_warns_but_still_returns_everyone() {
        let lesson = lesson(1);
        let a = customer("anna");
        let b = customer("bart");
        let entries = vec![
            RosterEntry::new(lesson.id.clone(), a.id.clone(), None),
            RosterEntry::new(lesson.id.clone(), b.id.clone(), None),
        ];

        let resolution = resolve_roster(&lesson, &entries, &[a, b], &[]).unwrap();
        assert_eq!(resolution.attendees.len(), 2);
        assert!(resolution.over_capacity);
    }
}
