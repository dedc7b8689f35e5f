use std::collections::HashMap;

use crate::domain::{models::lesson::{RecurringLesson, RosterEntry}, ports::LessonRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresLessonRepo {
    pool: PgPool,
}

impl PostgresLessonRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LessonRepository for PostgresLessonRepo {
    async fn create(&self, lesson: &RecurringLesson) -> Result<RecurringLesson, AppError> {
        sqlx::query_as::<_, RecurringLesson>(
            "INSERT INTO recurring_lessons (id, day_of_week, start_time, duration_min, lesson_type, instructor, max_participants, color, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING *"
        )
            .bind(&lesson.id).bind(lesson.day_of_week).bind(&lesson.start_time).bind(lesson.duration_min)
            .bind(&lesson.lesson_type).bind(&lesson.instructor).bind(lesson.max_participants)
            .bind(&lesson.color).bind(lesson.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<RecurringLesson>, AppError> {
        sqlx::query_as::<_, RecurringLesson>("SELECT * FROM recurring_lessons WHERE id = $1")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn add_roster_entry(&self, entry: &RosterEntry) -> Result<RosterEntry, AppError> {
        sqlx::query_as::<_, RosterEntry>(
            "INSERT INTO roster_entries (id, lesson_id, customer_id, dependent_id, created_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *"
        )
            .bind(&entry.id).bind(&entry.lesson_id).bind(&entry.customer_id)
            .bind(&entry.dependent_id).bind(entry.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_roster_entries(&self, lesson_id: &str) -> Result<Vec<RosterEntry>, AppError> {
        sqlx::query_as::<_, RosterEntry>("SELECT * FROM roster_entries WHERE lesson_id = $1 ORDER BY created_at ASC, id ASC")
            .bind(lesson_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn delete_roster_entry(&self, lesson_id: &str, entry_id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM roster_entries WHERE id = $1 AND lesson_id = $2")
            .bind(entry_id).bind(lesson_id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Roster entry not found".into()));
        }
        Ok(())
    }

    async fn list_rostered_for_customer(&self, customer_id: &str) -> Result<Vec<(RecurringLesson, RosterEntry)>, AppError> {
        let entries = sqlx::query_as::<_, RosterEntry>(
            "SELECT * FROM roster_entries WHERE customer_id = $1 ORDER BY created_at ASC, id ASC"
        )
            .bind(customer_id).fetch_all(&self.pool).await.map_err(AppError::Database)?;

        if entries.is_empty() {
            return Ok(vec![]);
        }

        let lesson_ids: Vec<String> = entries.iter().map(|e| e.lesson_id.clone()).collect();
        let lessons = sqlx::query_as::<_, RecurringLesson>(
            "SELECT * FROM recurring_lessons WHERE id = ANY($1)"
        )
            .bind(&lesson_ids).fetch_all(&self.pool).await.map_err(AppError::Database)?;

        let lessons_by_id: HashMap<String, RecurringLesson> =
            lessons.into_iter().map(|l| (l.id.clone(), l)).collect();

        // Entries pointing at a deleted lesson are orphans and simply drop out.
        Ok(entries
            .into_iter()
            .filter_map(|entry| lessons_by_id.get(&entry.lesson_id).cloned().map(|l| (l, entry)))
            .collect())
    }
}
