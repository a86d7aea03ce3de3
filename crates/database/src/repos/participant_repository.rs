//! Repository for participant registrations.

use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::entities::{
    CreateParticipantRequest, Event, Participant, ParticipantCounts, ParticipantStatus,
    UpdateParticipantRequest,
};
use crate::repos::duplicate_as;
use crate::types::{timestamp, DatabaseError, DatabaseResult};

const PARTICIPANT_COLUMNS: &str = "id, event_id, name, email, phone, company, ticket_type, \
                                   status, checked_in_at, notes, created_at, updated_at";

const DUPLICATE_EMAIL: &str = "a participant with this email is already registered for the event";

pub struct ParticipantRepository {
    pool: SqlitePool,
}

impl ParticipantRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_for_event(
        &self,
        event_id: &str,
        status: Option<ParticipantStatus>,
    ) -> DatabaseResult<Vec<Participant>> {
        let participants = match status {
            Some(status) => {
                sqlx::query_as::<_, Participant>(&format!(
                    "SELECT {PARTICIPANT_COLUMNS} FROM participants
                     WHERE event_id = ? AND status = ? ORDER BY name COLLATE NOCASE"
                ))
                .bind(event_id)
                .bind(status.as_str())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Participant>(&format!(
                    "SELECT {PARTICIPANT_COLUMNS} FROM participants
                     WHERE event_id = ? ORDER BY name COLLATE NOCASE"
                ))
                .bind(event_id)
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(participants)
    }

    pub async fn find(&self, id: &str) -> DatabaseResult<Option<Participant>> {
        let participant = sqlx::query_as::<_, Participant>(&format!(
            "SELECT {PARTICIPANT_COLUMNS} FROM participants WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(participant)
    }

    pub async fn get(&self, id: &str) -> DatabaseResult<Participant> {
        self.find(id)
            .await?
            .ok_or(DatabaseError::NotFound("Participant"))
    }

    /// Register a participant. Once the seated head count reaches the event's
    /// capacity, new registrations land on the waitlist.
    pub async fn register(
        &self,
        event: &Event,
        request: CreateParticipantRequest,
    ) -> DatabaseResult<Participant> {
        let mut participant =
            Participant::from_request(cuid2::cuid(), &event.id, request, &timestamp());
        participant.validate()?;

        let mut tx = self.pool.begin().await?;

        if let Some(capacity) = event.capacity {
            let (seated,): (i64,) = sqlx::query_as(
                "SELECT COUNT(*) FROM participants
                 WHERE event_id = ? AND status NOT IN ('waitlisted', 'cancelled')",
            )
            .bind(&event.id)
            .fetch_one(&mut *tx)
            .await?;

            if seated >= capacity && participant.status.holds_seat() {
                warn!(
                    event_id = %event.id,
                    capacity,
                    "event is full, registration placed on the waitlist"
                );
                participant.status = ParticipantStatus::Waitlisted;
            }
        }

        sqlx::query(
            "INSERT INTO participants (id, event_id, name, email, phone, company, ticket_type,
                                       status, checked_in_at, notes, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&participant.id)
        .bind(&participant.event_id)
        .bind(&participant.name)
        .bind(&participant.email)
        .bind(&participant.phone)
        .bind(&participant.company)
        .bind(participant.ticket_type.as_str())
        .bind(participant.status.as_str())
        .bind(&participant.checked_in_at)
        .bind(&participant.notes)
        .bind(&participant.created_at)
        .bind(&participant.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| duplicate_as(e, DUPLICATE_EMAIL))?;

        tx.commit().await?;

        info!(
            participant_id = %participant.id,
            event_id = %participant.event_id,
            status = %participant.status,
            "registered participant"
        );
        Ok(participant)
    }

    pub async fn update(
        &self,
        id: &str,
        request: UpdateParticipantRequest,
    ) -> DatabaseResult<Participant> {
        let mut participant = self.get(id).await?;
        participant.apply(request);
        participant.validate()?;
        participant.updated_at = timestamp();
        self.store(&participant).await?;

        info!(participant_id = %participant.id, status = %participant.status, "updated participant");
        Ok(participant)
    }

    /// Mark a participant as attended. Repeated check-ins keep the first
    /// timestamp.
    pub async fn check_in(&self, id: &str) -> DatabaseResult<Participant> {
        let mut participant = self.get(id).await?;
        match participant.status {
            ParticipantStatus::Cancelled | ParticipantStatus::Waitlisted => {
                return Err(DatabaseError::invalid(
                    "status",
                    format!("{} participants cannot be checked in", participant.status),
                ));
            }
            _ if participant.checked_in_at.is_some() => return Ok(participant),
            _ => {}
        }

        let now = timestamp();
        participant.status = ParticipantStatus::Attended;
        participant.checked_in_at = Some(now.clone());
        participant.updated_at = now;
        self.store(&participant).await?;

        info!(participant_id = %participant.id, event_id = %participant.event_id, "checked in participant");
        Ok(participant)
    }

    pub async fn delete(&self, id: &str) -> DatabaseResult<()> {
        let result = sqlx::query("DELETE FROM participants WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Participant"));
        }
        info!(participant_id = %id, "deleted participant");
        Ok(())
    }

    pub async fn count_by_status(&self, event_id: &str) -> DatabaseResult<ParticipantCounts> {
        let rows = sqlx::query_as::<_, (ParticipantStatus, i64)>(
            "SELECT status, COUNT(*) FROM participants WHERE event_id = ? GROUP BY status",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        let mut counts = ParticipantCounts::default();
        for (status, count) in rows {
            counts.record(status, count);
        }
        Ok(counts)
    }

    async fn store(&self, participant: &Participant) -> DatabaseResult<()> {
        sqlx::query(
            "UPDATE participants
             SET name = ?, email = ?, phone = ?, company = ?, ticket_type = ?, status = ?,
                 checked_in_at = ?, notes = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&participant.name)
        .bind(&participant.email)
        .bind(&participant.phone)
        .bind(&participant.company)
        .bind(participant.ticket_type.as_str())
        .bind(participant.status.as_str())
        .bind(&participant.checked_in_at)
        .bind(&participant.notes)
        .bind(&participant.updated_at)
        .bind(&participant.id)
        .execute(&self.pool)
        .await
        .map_err(|e| duplicate_as(e, DUPLICATE_EMAIL))?;
        Ok(())
    }
}
