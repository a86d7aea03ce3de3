//! Communication definitions

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::types::DatabaseResult;
use crate::validation::{self, ValidationErrors};

text_enum! {
    pub enum Channel {
        Email => "email",
        Sms => "sms",
        Announcement => "announcement",
    }
    default = Email;
}

text_enum! {
    pub enum Audience {
        All => "all",
        Participants => "participants",
        Speakers => "speakers",
        Sponsors => "sponsors",
        Staff => "staff",
    }
    default = All;
}

impl Audience {
    pub fn includes(&self, group: Audience) -> bool {
        *self == Audience::All || *self == group
    }
}

text_enum! {
    pub enum CommunicationStatus {
        Draft => "draft",
        Scheduled => "scheduled",
        Sent => "sent",
        Cancelled => "cancelled",
    }
    default = Draft;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Communication {
    pub id: String,
    pub event_id: String,
    pub subject: String,
    pub body: String,
    pub channel: Channel,
    pub audience: Audience,
    pub status: CommunicationStatus,
    pub scheduled_at: Option<String>,
    pub sent_at: Option<String>,
    pub recipient_count: i64,
    pub template_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Subject and body may be omitted when a template is referenced.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateCommunicationRequest {
    pub subject: Option<String>,
    pub body: Option<String>,
    pub channel: Option<Channel>,
    pub audience: Option<Audience>,
    pub status: Option<CommunicationStatus>,
    pub scheduled_at: Option<String>,
    pub template_id: Option<String>,
}

/// Sending goes through the send operation; `sent` is not accepted here.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateCommunicationRequest {
    pub subject: Option<String>,
    pub body: Option<String>,
    pub channel: Option<Channel>,
    pub audience: Option<Audience>,
    pub status: Option<CommunicationStatus>,
    #[serde(default, deserialize_with = "crate::types::nullable")]
    #[schema(value_type = Option<String>)]
    pub scheduled_at: Option<Option<String>>,
}

impl Communication {
    pub fn from_request(
        id: String,
        event_id: &str,
        request: CreateCommunicationRequest,
        now: &str,
    ) -> Self {
        Self {
            id,
            event_id: event_id.to_string(),
            subject: request.subject.unwrap_or_default().trim().to_string(),
            body: request.body.unwrap_or_default(),
            channel: request.channel.unwrap_or_default(),
            audience: request.audience.unwrap_or_default(),
            status: request.status.unwrap_or_default(),
            scheduled_at: request.scheduled_at,
            sent_at: None,
            recipient_count: 0,
            template_id: request.template_id,
            created_at: now.to_string(),
            updated_at: now.to_string(),
        }
    }

    pub fn apply(&mut self, request: UpdateCommunicationRequest) {
        if let Some(subject) = request.subject {
            self.subject = subject.trim().to_string();
        }
        if let Some(body) = request.body {
            self.body = body;
        }
        if let Some(channel) = request.channel {
            self.channel = channel;
        }
        if let Some(audience) = request.audience {
            self.audience = audience;
        }
        if let Some(status) = request.status {
            self.status = status;
        }
        if let Some(scheduled_at) = request.scheduled_at {
            self.scheduled_at = scheduled_at;
        }
    }

    pub fn validate(&self) -> DatabaseResult<()> {
        let mut errors = ValidationErrors::new();
        validation::require_text(&mut errors, "subject", &self.subject, 300);
        validation::require_text(&mut errors, "body", &self.body, 50_000);
        match self.scheduled_at.as_deref() {
            Some(scheduled_at) => {
                validation::parse_instant(&mut errors, "scheduled_at", scheduled_at);
            }
            None if self.status == CommunicationStatus::Scheduled => {
                errors.add("scheduled_at", "is required for scheduled communications");
            }
            None => {}
        }
        errors.into_result()
    }
}
