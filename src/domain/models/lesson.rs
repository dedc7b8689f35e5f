use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct RecurringLesson {
    pub id: String,
    /// 0 = Monday .. 6 = Sunday
    pub day_of_week: i32,
    /// Local wall-clock start, "HH:MM"
    pub start_time: String,
    pub duration_min: i32,
    /// Free-form: group, private, boarding, trail, ...
    pub lesson_type: String,
    pub instructor: String,
    pub max_participants: i32,
    pub color: String,
    pub created_at: DateTime<Utc>,
}

pub struct NewLessonParams {
    pub day_of_week: i32,
    pub start_time: String,
    pub duration_min: i32,
    pub lesson_type: String,
    pub instructor: String,
    pub max_participants: i32,
}

impl RecurringLesson {
    pub fn new(params: NewLessonParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            day_of_week: params.day_of_week,
            start_time: params.start_time,
            duration_min: params.duration_min,
            lesson_type: params.lesson_type,
            instructor: params.instructor,
            max_participants: params.max_participants,
            color: "#cccccc".to_string(),
            created_at: Utc::now(),
        }
    }
}

/// Standing assignment of one attendee to a weekly lesson slot. The attendee
/// is `(customer_id, dependent_id?)`: a null dependent means the customer
/// attends in person, otherwise a dependent of that customer attends and the
/// customer is the payer.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct RosterEntry {
    pub id: String,
    pub lesson_id: String,
    pub customer_id: String,
    pub dependent_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl RosterEntry {
    pub fn new(lesson_id: String, customer_id: String, dependent_id: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            lesson_id,
            customer_id,
            dependent_id,
            created_at: Utc::now(),
        }
    }
}
