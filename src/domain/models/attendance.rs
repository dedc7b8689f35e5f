use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

pub const ATTENDANCE_SCHEDULED: &str = "SCHEDULED";
pub const ATTENDANCE_ATTENDED: &str = "ATTENDED";
pub const ATTENDANCE_CANCELLED: &str = "CANCELLED";
pub const ATTENDANCE_NOT_COUNTED: &str = "NOT_COUNTED";

/// Ledger row for one attendee of one lesson occurrence. Records are never
/// deleted; terminal-state mistakes are fixed through compensating actions.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct AttendanceRecord {
    pub id: String,
    /// `{lesson_id}:{date}`, shared by every record of one occurrence.
    pub occurrence_id: String,
    pub lesson_id: String,
    pub customer_id: String,
    pub dependent_id: Option<String>,
    /// Card bound at generation time; deduction target for mark_attended.
    pub card_id: String,
    pub lesson_date: NaiveDate,
    pub start_time: String,
    pub duration_min: i32,
    /// SCHEDULED -> ATTENDED | CANCELLED | NOT_COUNTED; corrections may still
    /// pull ATTENDED down to NOT_COUNTED, CANCELLED is terminal.
    pub status: String,
    pub auto_deducted: bool,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub modified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

pub struct NewAttendanceParams {
    pub lesson_id: String,
    pub customer_id: String,
    pub dependent_id: Option<String>,
    pub card_id: String,
    pub lesson_date: NaiveDate,
    pub start_time: String,
    pub duration_min: i32,
}

impl AttendanceRecord {
    pub fn occurrence_key(lesson_id: &str, date: NaiveDate) -> String {
        format!("{}:{}", lesson_id, date)
    }

    pub fn new(params: NewAttendanceParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            occurrence_id: Self::occurrence_key(&params.lesson_id, params.lesson_date),
            lesson_id: params.lesson_id,
            customer_id: params.customer_id,
            dependent_id: params.dependent_id,
            card_id: params.card_id,
            lesson_date: params.lesson_date,
            start_time: params.start_time,
            duration_min: params.duration_min,
            status: ATTENDANCE_SCHEDULED.to_string(),
            auto_deducted: false,
            cancelled_at: None,
            modified_at: None,
            created_at: Utc::now(),
        }
    }
}
