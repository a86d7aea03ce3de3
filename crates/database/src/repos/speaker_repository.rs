//! Repository for event speakers.

use sqlx::SqlitePool;
use tracing::info;

use crate::entities::{CreateSpeakerRequest, Speaker, UpdateSpeakerRequest};
use crate::types::{timestamp, DatabaseError, DatabaseResult};

const SPEAKER_COLUMNS: &str = "id, event_id, name, email, bio, company, job_title, photo_url, \
                               fee_cents, status, created_at, updated_at";

pub struct SpeakerRepository {
    pool: SqlitePool,
}

impl SpeakerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_for_event(&self, event_id: &str) -> DatabaseResult<Vec<Speaker>> {
        let speakers = sqlx::query_as::<_, Speaker>(&format!(
            "SELECT {SPEAKER_COLUMNS} FROM speakers WHERE event_id = ? ORDER BY name COLLATE NOCASE"
        ))
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(speakers)
    }

    pub async fn find(&self, id: &str) -> DatabaseResult<Option<Speaker>> {
        let speaker = sqlx::query_as::<_, Speaker>(&format!(
            "SELECT {SPEAKER_COLUMNS} FROM speakers WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(speaker)
    }

    pub async fn get(&self, id: &str) -> DatabaseResult<Speaker> {
        self.find(id).await?.ok_or(DatabaseError::NotFound("Speaker"))
    }

    pub async fn create(
        &self,
        event_id: &str,
        request: CreateSpeakerRequest,
    ) -> DatabaseResult<Speaker> {
        let speaker = Speaker::from_request(cuid2::cuid(), event_id, request, &timestamp());
        speaker.validate()?;

        sqlx::query(
            "INSERT INTO speakers (id, event_id, name, email, bio, company, job_title, photo_url,
                                   fee_cents, status, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&speaker.id)
        .bind(&speaker.event_id)
        .bind(&speaker.name)
        .bind(&speaker.email)
        .bind(&speaker.bio)
        .bind(&speaker.company)
        .bind(&speaker.job_title)
        .bind(&speaker.photo_url)
        .bind(speaker.fee_cents)
        .bind(speaker.status.as_str())
        .bind(&speaker.created_at)
        .bind(&speaker.updated_at)
        .execute(&self.pool)
        .await?;

        info!(speaker_id = %speaker.id, event_id = %speaker.event_id, "created speaker");
        Ok(speaker)
    }

    pub async fn update(&self, id: &str, request: UpdateSpeakerRequest) -> DatabaseResult<Speaker> {
        let mut speaker = self.get(id).await?;
        speaker.apply(request);
        speaker.validate()?;
        speaker.updated_at = timestamp();

        sqlx::query(
            "UPDATE speakers
             SET name = ?, email = ?, bio = ?, company = ?, job_title = ?, photo_url = ?,
                 fee_cents = ?, status = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&speaker.name)
        .bind(&speaker.email)
        .bind(&speaker.bio)
        .bind(&speaker.company)
        .bind(&speaker.job_title)
        .bind(&speaker.photo_url)
        .bind(speaker.fee_cents)
        .bind(speaker.status.as_str())
        .bind(&speaker.updated_at)
        .bind(&speaker.id)
        .execute(&self.pool)
        .await?;

        info!(speaker_id = %speaker.id, status = %speaker.status, "updated speaker");
        Ok(speaker)
    }

    /// Delete a speaker; their agenda sessions keep running without one.
    pub async fn delete(&self, id: &str) -> DatabaseResult<()> {
        let result = sqlx::query("DELETE FROM speakers WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Speaker"));
        }
        info!(speaker_id = %id, "deleted speaker");
        Ok(())
    }
}
