//! Repository for event deadlines.

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::info;

use crate::entities::{
    CreateDeadlineRequest, Deadline, DeadlineStatus, UpdateDeadlineRequest,
};
use crate::rules::deadline;
use crate::types::{timestamp, DatabaseError, DatabaseResult};

const DEADLINE_COLUMNS: &str = "id, event_id, title, description, due_date, priority, status, \
                                completed_at, assignee, created_at, updated_at";

pub struct DeadlineRepository {
    pool: SqlitePool,
}

fn with_effective_status(mut row: Deadline, today: NaiveDate) -> Deadline {
    row.status = deadline::effective_status(&row, today);
    row
}

impl DeadlineRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Deadlines by due date with status derived for `today`.
    pub async fn list_for_event(
        &self,
        event_id: &str,
        today: NaiveDate,
    ) -> DatabaseResult<Vec<Deadline>> {
        let deadlines = sqlx::query_as::<_, Deadline>(&format!(
            "SELECT {DEADLINE_COLUMNS} FROM deadlines
             WHERE event_id = ? ORDER BY due_date, title COLLATE NOCASE"
        ))
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(deadlines
            .into_iter()
            .map(|d| with_effective_status(d, today))
            .collect())
    }

    /// Open deadlines of an event, soonest first, overdue ones included.
    pub async fn upcoming(
        &self,
        event_id: &str,
        today: NaiveDate,
        limit: i64,
    ) -> DatabaseResult<Vec<Deadline>> {
        let deadlines = sqlx::query_as::<_, Deadline>(&format!(
            "SELECT {DEADLINE_COLUMNS} FROM deadlines
             WHERE event_id = ? AND completed_at IS NULL AND status != 'completed'
             ORDER BY due_date, title COLLATE NOCASE
             LIMIT ?"
        ))
        .bind(event_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(deadlines
            .into_iter()
            .map(|d| with_effective_status(d, today))
            .collect())
    }

    pub async fn get(&self, id: &str, today: NaiveDate) -> DatabaseResult<Deadline> {
        let row = self.find_row(id).await?;
        Ok(with_effective_status(row, today))
    }

    pub async fn create(
        &self,
        event_id: &str,
        request: CreateDeadlineRequest,
    ) -> DatabaseResult<Deadline> {
        let deadline = Deadline::from_request(cuid2::cuid(), event_id, request, &timestamp());
        deadline.validate()?;

        sqlx::query(
            "INSERT INTO deadlines (id, event_id, title, description, due_date, priority, status,
                                    completed_at, assignee, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&deadline.id)
        .bind(&deadline.event_id)
        .bind(&deadline.title)
        .bind(&deadline.description)
        .bind(&deadline.due_date)
        .bind(deadline.priority.as_str())
        .bind(deadline.status.as_str())
        .bind(&deadline.completed_at)
        .bind(&deadline.assignee)
        .bind(&deadline.created_at)
        .bind(&deadline.updated_at)
        .execute(&self.pool)
        .await?;

        info!(
            deadline_id = %deadline.id,
            event_id = %deadline.event_id,
            due_date = %deadline.due_date,
            "created deadline"
        );
        Ok(deadline)
    }

    pub async fn update(&self, id: &str, request: UpdateDeadlineRequest) -> DatabaseResult<Deadline> {
        let mut deadline = self.find_row(id).await?;
        deadline.apply(request);
        deadline.validate()?;
        deadline.updated_at = timestamp();
        self.store(&deadline).await?;

        info!(deadline_id = %deadline.id, "updated deadline");
        Ok(deadline)
    }

    /// Mark a deadline done. Completing it again keeps the first timestamp.
    pub async fn complete(&self, id: &str) -> DatabaseResult<Deadline> {
        let mut deadline = self.find_row(id).await?;
        if deadline.completed_at.is_some() {
            return Ok(deadline);
        }

        let now = timestamp();
        deadline.status = DeadlineStatus::Completed;
        deadline.completed_at = Some(now.clone());
        deadline.updated_at = now;
        self.store(&deadline).await?;

        info!(deadline_id = %deadline.id, "completed deadline");
        Ok(deadline)
    }

    pub async fn delete(&self, id: &str) -> DatabaseResult<()> {
        let result = sqlx::query("DELETE FROM deadlines WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Deadline"));
        }
        info!(deadline_id = %id, "deleted deadline");
        Ok(())
    }

    async fn find_row(&self, id: &str) -> DatabaseResult<Deadline> {
        sqlx::query_as::<_, Deadline>(&format!(
            "SELECT {DEADLINE_COLUMNS} FROM deadlines WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DatabaseError::NotFound("Deadline"))
    }

    async fn store(&self, deadline: &Deadline) -> DatabaseResult<()> {
        sqlx::query(
            "UPDATE deadlines
             SET title = ?, description = ?, due_date = ?, priority = ?, status = ?,
                 completed_at = ?, assignee = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&deadline.title)
        .bind(&deadline.description)
        .bind(&deadline.due_date)
        .bind(deadline.priority.as_str())
        .bind(deadline.status.as_str())
        .bind(&deadline.completed_at)
        .bind(&deadline.assignee)
        .bind(&deadline.updated_at)
        .bind(&deadline.id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
