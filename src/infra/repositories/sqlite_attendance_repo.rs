use crate::domain::{models::attendance::AttendanceRecord, ports::AttendanceRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteAttendanceRepo {
    pool: SqlitePool,
}

impl SqliteAttendanceRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttendanceRepository for SqliteAttendanceRepo {
    async fn create(&self, record: &AttendanceRecord) -> Result<AttendanceRecord, AppError> {
        sqlx::query_as::<_, AttendanceRecord>(
            "INSERT INTO attendance_records (id, occurrence_id, lesson_id, customer_id, dependent_id, card_id, lesson_date, start_time, duration_min, status, auto_deducted, cancelled_at, modified_at, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&record.id).bind(&record.occurrence_id).bind(&record.lesson_id)
            .bind(&record.customer_id).bind(&record.dependent_id).bind(&record.card_id)
            .bind(record.lesson_date).bind(&record.start_time).bind(record.duration_min)
            .bind(&record.status).bind(record.auto_deducted).bind(record.cancelled_at)
            .bind(record.modified_at).bind(record.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<AttendanceRecord>, AppError> {
        sqlx::query_as::<_, AttendanceRecord>("SELECT * FROM attendance_records WHERE id = ?")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_occurrence(&self, occurrence_id: &str) -> Result<Vec<AttendanceRecord>, AppError> {
        sqlx::query_as::<_, AttendanceRecord>("SELECT * FROM attendance_records WHERE occurrence_id = ? ORDER BY created_at ASC, id ASC")
            .bind(occurrence_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn update(&self, record: &AttendanceRecord) -> Result<AttendanceRecord, AppError> {
        // Only mutable ledger fields; identity and occurrence binding are
        // write-once, and rows are never deleted.
        sqlx::query_as::<_, AttendanceRecord>(
            "UPDATE attendance_records
             SET status = ?, auto_deducted = ?, cancelled_at = ?, modified_at = ?
             WHERE id = ?
             RETURNING *"
        )
            .bind(&record.status).bind(record.auto_deducted).bind(record.cancelled_at)
            .bind(record.modified_at).bind(&record.id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
}
