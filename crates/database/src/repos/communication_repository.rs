//! Repository for event communications.
//!
//! Messages are never delivered from here. Sending resolves the audience to
//! a de-duplicated recipient list, records how many addresses were reached
//! and freezes the communication.

use std::collections::{BTreeSet, HashMap};

use sqlx::SqlitePool;
use tracing::info;

use crate::entities::{
    Audience, Communication, CommunicationStatus, CreateCommunicationRequest, Event,
    UpdateCommunicationRequest,
};
use crate::repos::email_template_repository::render_template;
use crate::repos::EmailTemplateRepository;
use crate::types::{timestamp, DatabaseError, DatabaseResult};

const COMMUNICATION_COLUMNS: &str = "id, event_id, subject, body, channel, audience, status, \
                                     scheduled_at, sent_at, recipient_count, template_id, \
                                     created_at, updated_at";

pub struct CommunicationRepository {
    pool: SqlitePool,
}

impl CommunicationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_for_event(&self, event_id: &str) -> DatabaseResult<Vec<Communication>> {
        let communications = sqlx::query_as::<_, Communication>(&format!(
            "SELECT {COMMUNICATION_COLUMNS} FROM communications
             WHERE event_id = ? ORDER BY created_at DESC, id"
        ))
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(communications)
    }

    pub async fn find(&self, id: &str) -> DatabaseResult<Option<Communication>> {
        let communication = sqlx::query_as::<_, Communication>(&format!(
            "SELECT {COMMUNICATION_COLUMNS} FROM communications WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(communication)
    }

    pub async fn get(&self, id: &str) -> DatabaseResult<Communication> {
        self.find(id)
            .await?
            .ok_or(DatabaseError::NotFound("Communication"))
    }

    /// Create a draft or scheduled communication. A referenced template
    /// supplies whichever of subject and body the request leaves out.
    pub async fn create(
        &self,
        event: &Event,
        request: CreateCommunicationRequest,
    ) -> DatabaseResult<Communication> {
        if request.status == Some(CommunicationStatus::Sent) {
            return Err(DatabaseError::invalid(
                "status",
                "use the send operation to send a communication",
            ));
        }

        let mut communication =
            Communication::from_request(cuid2::cuid(), &event.id, request, &timestamp());

        if let Some(template_id) = communication.template_id.as_deref() {
            let template = EmailTemplateRepository::new(self.pool.clone())
                .find(template_id)
                .await?
                .ok_or_else(|| DatabaseError::invalid("template_id", "unknown email template"))?;
            let rendered = render_template(&template, Some(event), HashMap::new());
            if communication.subject.is_empty() {
                communication.subject = rendered.subject;
            }
            if communication.body.is_empty() {
                communication.body = rendered.body;
            }
        }
        communication.validate()?;

        sqlx::query(
            "INSERT INTO communications (id, event_id, subject, body, channel, audience, status,
                                         scheduled_at, sent_at, recipient_count, template_id,
                                         created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&communication.id)
        .bind(&communication.event_id)
        .bind(&communication.subject)
        .bind(&communication.body)
        .bind(communication.channel.as_str())
        .bind(communication.audience.as_str())
        .bind(communication.status.as_str())
        .bind(&communication.scheduled_at)
        .bind(&communication.sent_at)
        .bind(communication.recipient_count)
        .bind(&communication.template_id)
        .bind(&communication.created_at)
        .bind(&communication.updated_at)
        .execute(&self.pool)
        .await?;

        info!(
            communication_id = %communication.id,
            event_id = %communication.event_id,
            audience = %communication.audience,
            "created communication"
        );
        Ok(communication)
    }

    pub async fn update(
        &self,
        id: &str,
        request: UpdateCommunicationRequest,
    ) -> DatabaseResult<Communication> {
        let mut communication = self.get(id).await?;
        if communication.status == CommunicationStatus::Sent {
            return Err(DatabaseError::Conflict(
                "sent communications cannot be edited".to_string(),
            ));
        }
        if request.status == Some(CommunicationStatus::Sent) {
            return Err(DatabaseError::invalid(
                "status",
                "use the send operation to send a communication",
            ));
        }
        communication.apply(request);
        communication.validate()?;
        communication.updated_at = timestamp();
        self.store(&communication).await?;

        info!(communication_id = %communication.id, status = %communication.status, "updated communication");
        Ok(communication)
    }

    /// Resolve the audience and mark the communication as sent.
    pub async fn send(&self, id: &str) -> DatabaseResult<Communication> {
        let mut communication = self.get(id).await?;
        match communication.status {
            CommunicationStatus::Sent => {
                return Err(DatabaseError::Conflict(
                    "communication has already been sent".to_string(),
                ))
            }
            CommunicationStatus::Cancelled => {
                return Err(DatabaseError::Conflict(
                    "cancelled communications cannot be sent".to_string(),
                ))
            }
            CommunicationStatus::Draft | CommunicationStatus::Scheduled => {}
        }

        let recipients = self
            .resolve_recipients(&communication.event_id, communication.audience)
            .await?;

        let now = timestamp();
        communication.status = CommunicationStatus::Sent;
        communication.sent_at = Some(now.clone());
        communication.recipient_count = recipients.len() as i64;
        communication.updated_at = now;
        self.store(&communication).await?;

        info!(
            communication_id = %communication.id,
            channel = %communication.channel,
            recipients = communication.recipient_count,
            "sent communication"
        );
        Ok(communication)
    }

    pub async fn delete(&self, id: &str) -> DatabaseResult<()> {
        let result = sqlx::query("DELETE FROM communications WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Communication"));
        }
        info!(communication_id = %id, "deleted communication");
        Ok(())
    }

    /// Lower-cased, de-duplicated addresses of everyone the audience reaches.
    pub async fn resolve_recipients(
        &self,
        event_id: &str,
        audience: Audience,
    ) -> DatabaseResult<BTreeSet<String>> {
        let mut queries = Vec::new();
        if audience.includes(Audience::Participants) {
            queries.push(
                "SELECT email FROM participants
                 WHERE event_id = ? AND status != 'cancelled'",
            );
        }
        if audience.includes(Audience::Speakers) {
            queries.push(
                "SELECT email FROM speakers
                 WHERE event_id = ? AND email IS NOT NULL
                   AND status NOT IN ('declined', 'cancelled')",
            );
        }
        if audience.includes(Audience::Sponsors) {
            queries.push(
                "SELECT contact_email FROM sponsors
                 WHERE event_id = ? AND contact_email IS NOT NULL AND status != 'cancelled'",
            );
        }
        if audience.includes(Audience::Staff) {
            queries.push(
                "SELECT s.email FROM staff s
                 JOIN staff_assignments a ON a.staff_id = s.id
                 WHERE a.event_id = ? AND a.payment_status != 'cancelled'",
            );
        }

        let mut recipients = BTreeSet::new();
        for query in queries {
            let rows: Vec<(String,)> = sqlx::query_as(query)
                .bind(event_id)
                .fetch_all(&self.pool)
                .await?;
            recipients.extend(
                rows.into_iter()
                    .map(|(email,)| email.trim().to_lowercase())
                    .filter(|email| !email.is_empty()),
            );
        }
        Ok(recipients)
    }

    async fn store(&self, communication: &Communication) -> DatabaseResult<()> {
        sqlx::query(
            "UPDATE communications
             SET subject = ?, body = ?, channel = ?, audience = ?, status = ?, scheduled_at = ?,
                 sent_at = ?, recipient_count = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&communication.subject)
        .bind(&communication.body)
        .bind(communication.channel.as_str())
        .bind(communication.audience.as_str())
        .bind(communication.status.as_str())
        .bind(&communication.scheduled_at)
        .bind(&communication.sent_at)
        .bind(communication.recipient_count)
        .bind(&communication.updated_at)
        .bind(&communication.id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        CreateEmailTemplateRequest, CreateParticipantRequest, CreateSpeakerRequest,
        CreateSponsorRequest, ParticipantStatus, SpeakerStatus,
    };
    use crate::repos::test_support::{seed_event, test_pool};
    use crate::repos::{ParticipantRepository, SpeakerRepository, SponsorRepository};

    fn draft(audience: Audience) -> CreateCommunicationRequest {
        CreateCommunicationRequest {
            subject: Some("Schedule update".into()),
            body: Some("The keynote moved to Hall B.".into()),
            channel: None,
            audience: Some(audience),
            status: None,
            scheduled_at: None,
            template_id: None,
        }
    }

    async fn seed_people(pool: &SqlitePool, event: &Event) {
        let participants = ParticipantRepository::new(pool.clone());
        for (name, email, status) in [
            ("Ada", "ada@example.com", ParticipantStatus::Registered),
            ("Bob", "bob@example.com", ParticipantStatus::Cancelled),
        ] {
            participants
                .register(
                    event,
                    CreateParticipantRequest {
                        name: name.into(),
                        email: email.into(),
                        phone: None,
                        company: None,
                        ticket_type: None,
                        status: Some(status),
                        notes: None,
                    },
                )
                .await
                .unwrap();
        }

        SpeakerRepository::new(pool.clone())
            .create(
                &event.id,
                CreateSpeakerRequest {
                    name: "Ada again".into(),
                    email: Some("ADA@example.com".into()),
                    bio: None,
                    company: None,
                    job_title: None,
                    photo_url: None,
                    fee_cents: 0,
                    status: Some(SpeakerStatus::Confirmed),
                },
            )
            .await
            .unwrap();

        SponsorRepository::new(pool.clone())
            .create(
                &event.id,
                CreateSponsorRequest {
                    name: "Ferris Corp".into(),
                    tier: None,
                    contribution_cents: 0,
                    contact_name: None,
                    contact_email: Some("hello@ferris.dev".into()),
                    website: None,
                    status: None,
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_send_counts_unique_recipients() {
        let (pool, _dir) = test_pool().await;
        let event = seed_event(&pool, None).await;
        seed_people(&pool, &event).await;
        let repo = CommunicationRepository::new(pool);

        let everyone = repo.resolve_recipients(&event.id, Audience::All).await.unwrap();
        assert_eq!(
            everyone.into_iter().collect::<Vec<_>>(),
            vec!["ada@example.com", "hello@ferris.dev"]
        );

        let communication = repo.create(&event, draft(Audience::Participants)).await.unwrap();
        let sent = repo.send(&communication.id).await.unwrap();
        assert_eq!(sent.status, CommunicationStatus::Sent);
        assert_eq!(sent.recipient_count, 1);
        assert!(sent.sent_at.is_some());

        assert!(matches!(repo.send(&communication.id).await, Err(DatabaseError::Conflict(_))));
        assert!(matches!(
            repo.update(&communication.id, UpdateCommunicationRequest::default()).await,
            Err(DatabaseError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_cancelled_communication_cannot_be_sent() {
        let (pool, _dir) = test_pool().await;
        let event = seed_event(&pool, None).await;
        let repo = CommunicationRepository::new(pool);

        let communication = repo.create(&event, draft(Audience::All)).await.unwrap();
        repo.update(
            &communication.id,
            UpdateCommunicationRequest {
                status: Some(CommunicationStatus::Cancelled),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(matches!(repo.send(&communication.id).await, Err(DatabaseError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_template_fills_missing_subject_and_body() {
        let (pool, _dir) = test_pool().await;
        let event = seed_event(&pool, None).await;
        let template = EmailTemplateRepository::new(pool.clone())
            .create(CreateEmailTemplateRequest {
                name: "Reminder".into(),
                subject: "{{event_name}} starts soon".into(),
                body: "See you at {{event_venue}}.".into(),
                category: None,
            })
            .await
            .unwrap();
        let repo = CommunicationRepository::new(pool);

        let communication = repo
            .create(
                &event,
                CreateCommunicationRequest {
                    subject: None,
                    body: Some("Custom body".into()),
                    channel: None,
                    audience: None,
                    status: None,
                    scheduled_at: None,
                    template_id: Some(template.id.clone()),
                },
            )
            .await
            .unwrap();
        assert_eq!(communication.subject, "RustFest starts soon");
        assert_eq!(communication.body, "Custom body");
        assert_eq!(communication.template_id, Some(template.id));
    }

    #[tokio::test]
    async fn test_create_rejects_sent_status() {
        let (pool, _dir) = test_pool().await;
        let event = seed_event(&pool, None).await;
        let repo = CommunicationRepository::new(pool);

        let mut request = draft(Audience::All);
        request.status = Some(CommunicationStatus::Sent);
        match repo.create(&event, request).await {
            Err(DatabaseError::Validation(errors)) => assert!(errors.contains("status")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
