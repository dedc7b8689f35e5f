use std::collections::HashMap;

use crate::domain::{models::lesson::{RecurringLesson, RosterEntry}, ports::LessonRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteLessonRepo {
    pool: SqlitePool,
}

impl SqliteLessonRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LessonRepository for SqliteLessonRepo {
    async fn create(&self, lesson: &RecurringLesson) -> Result<RecurringLesson, AppError> {
        sqlx::query_as::<_, RecurringLesson>(
            "INSERT INTO recurring_lessons (id, day_of_week, start_time, duration_min, lesson_type, instructor, max_participants, color, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&lesson.id).bind(lesson.day_of_week).bind(&lesson.start_time).bind(lesson.duration_min)
            .bind(&lesson.lesson_type).bind(&lesson.instructor).bind(lesson.max_participants)
            .bind(&lesson.color).bind(lesson.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<RecurringLesson>, AppError> {
        sqlx::query_as::<_, RecurringLesson>("SELECT * FROM recurring_lessons WHERE id = ?")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn add_roster_entry(&self, entry: &RosterEntry) -> Result<RosterEntry, AppError> {
        sqlx::query_as::<_, RosterEntry>(
            "INSERT INTO roster_entries (id, lesson_id, customer_id, dependent_id, created_at)
             VALUES (?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&entry.id).bind(&entry.lesson_id).bind(&entry.customer_id)
            .bind(&entry.dependent_id).bind(entry.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_roster_entries(&self, lesson_id: &str) -> Result<Vec<RosterEntry>, AppError> {
        sqlx::query_as::<_, RosterEntry>("SELECT * FROM roster_entries WHERE lesson_id = ? ORDER BY created_at ASC, id ASC")
            .bind(lesson_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn delete_roster_entry(&self, lesson_id: &str, entry_id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM roster_entries WHERE id = ? AND lesson_id = ?")
            .bind(entry_id).bind(lesson_id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Roster entry not found".into()));
        }
        Ok(())
    }

    async fn list_rostered_for_customer(&self, customer_id: &str) -> Result<Vec<(RecurringLesson, RosterEntry)>, AppError> {
        let entries = sqlx::query_as::<_, RosterEntry>(
            "SELECT * FROM roster_entries WHERE customer_id = ? ORDER BY created_at ASC, id ASC"
        )
            .bind(customer_id).fetch_all(&self.pool).await.map_err(AppError::Database)?;

        if entries.is_empty() {
            return Ok(vec![]);
        }

        let lesson_ids: Vec<&str> = entries.iter().map(|e| e.lesson_id.as_str()).collect();
        let placeholders = vec!["?"; lesson_ids.len()].join(", ");
        let sql = format!("SELECT * FROM recurring_lessons WHERE id IN ({})", placeholders);
        let mut query = sqlx::query_as::<_, RecurringLesson>(&sql);
        for id in &lesson_ids {
            query = query.bind(id);
        }
        let lessons = query.fetch_all(&self.pool).await.map_err(AppError::Database)?;

        let lessons_by_id: HashMap<String, RecurringLesson> =
            lessons.into_iter().map(|l| (l.id.clone(), l)).collect();

        // Entries pointing at a deleted lesson are orphans and simply drop out.
        Ok(entries
            .into_iter()
            .filter_map(|entry| lessons_by_id.get(&entry.lesson_id).cloned().map(|l| (l, entry)))
            .collect())
    }
}
