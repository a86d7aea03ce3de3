//! Repository for agenda sessions.
//!
//! Writes are checked against the event's dates, the speaker's event and
//! the other sessions booked into the same room.

use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::entities::{AgendaSession, CreateSessionRequest, Event, UpdateSessionRequest};
use crate::rules::schedule;
use crate::types::{timestamp, DatabaseError, DatabaseResult};
use crate::validation::ValidationErrors;

const SESSION_COLUMNS: &str = "id, event_id, title, description, session_type, starts_at, \
                               ends_at, location, speaker_id, created_at, updated_at";

pub struct AgendaRepository {
    pool: SqlitePool,
}

impl AgendaRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_for_event(&self, event_id: &str) -> DatabaseResult<Vec<AgendaSession>> {
        let sessions = sqlx::query_as::<_, AgendaSession>(&format!(
            "SELECT {SESSION_COLUMNS} FROM agenda_sessions
             WHERE event_id = ? ORDER BY starts_at, location"
        ))
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(sessions)
    }

    pub async fn find(&self, id: &str) -> DatabaseResult<Option<AgendaSession>> {
        let session = sqlx::query_as::<_, AgendaSession>(&format!(
            "SELECT {SESSION_COLUMNS} FROM agenda_sessions WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(session)
    }

    pub async fn get(&self, id: &str) -> DatabaseResult<AgendaSession> {
        self.find(id)
            .await?
            .ok_or(DatabaseError::NotFound("Agenda session"))
    }

    pub async fn create(
        &self,
        event: &Event,
        request: CreateSessionRequest,
    ) -> DatabaseResult<AgendaSession> {
        let session = AgendaSession::from_request(cuid2::cuid(), &event.id, request, &timestamp());
        self.check(&session, event).await?;

        sqlx::query(
            "INSERT INTO agenda_sessions (id, event_id, title, description, session_type,
                                          starts_at, ends_at, location, speaker_id,
                                          created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&session.id)
        .bind(&session.event_id)
        .bind(&session.title)
        .bind(&session.description)
        .bind(session.session_type.as_str())
        .bind(&session.starts_at)
        .bind(&session.ends_at)
        .bind(&session.location)
        .bind(&session.speaker_id)
        .bind(&session.created_at)
        .bind(&session.updated_at)
        .execute(&self.pool)
        .await?;

        info!(session_id = %session.id, event_id = %session.event_id, "created agenda session");
        Ok(session)
    }

    pub async fn update(
        &self,
        event: &Event,
        id: &str,
        request: UpdateSessionRequest,
    ) -> DatabaseResult<AgendaSession> {
        let mut session = self.get(id).await?;
        if session.event_id != event.id {
            return Err(DatabaseError::NotFound("Agenda session"));
        }
        session.apply(request);
        self.check(&session, event).await?;
        session.updated_at = timestamp();

        sqlx::query(
            "UPDATE agenda_sessions
             SET title = ?, description = ?, session_type = ?, starts_at = ?, ends_at = ?,
                 location = ?, speaker_id = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&session.title)
        .bind(&session.description)
        .bind(session.session_type.as_str())
        .bind(&session.starts_at)
        .bind(&session.ends_at)
        .bind(&session.location)
        .bind(&session.speaker_id)
        .bind(&session.updated_at)
        .bind(&session.id)
        .execute(&self.pool)
        .await?;

        info!(session_id = %session.id, "updated agenda session");
        Ok(session)
    }

    pub async fn delete(&self, id: &str) -> DatabaseResult<()> {
        let result = sqlx::query("DELETE FROM agenda_sessions WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Agenda session"));
        }
        info!(session_id = %id, "deleted agenda session");
        Ok(())
    }

    pub async fn count_for_event(&self, event_id: &str) -> DatabaseResult<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM agenda_sessions WHERE event_id = ?")
                .bind(event_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    async fn check(&self, session: &AgendaSession, event: &Event) -> DatabaseResult<()> {
        session.validate()?;

        let mut errors = ValidationErrors::new();
        schedule::check_within_event(session, event, &mut errors);

        if let Some(speaker_id) = session.speaker_id.as_deref() {
            let speaker_event: Option<(String,)> =
                sqlx::query_as("SELECT event_id FROM speakers WHERE id = ?")
                    .bind(speaker_id)
                    .fetch_optional(&self.pool)
                    .await?;
            match speaker_event {
                Some((event_id,)) if event_id == event.id => {}
                Some(_) => errors.add("speaker_id", "speaker belongs to another event"),
                None => errors.add("speaker_id", "unknown speaker"),
            }
        }

        let others = self.list_for_event(&event.id).await?;
        if let Some(clash) = schedule::find_overlap(session, &others) {
            warn!(
                session_id = %session.id,
                clashes_with = %clash.id,
                "agenda session overlaps another in the same room"
            );
            errors.add(
                "starts_at",
                format!(
                    "overlaps \"{}\" in {}",
                    clash.title,
                    clash.location.as_deref().unwrap_or_default()
                ),
            );
        }

        errors.into_result()
    }
}
