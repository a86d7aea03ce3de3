//! Agenda session definitions

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::types::DatabaseResult;
use crate::validation::{self, ValidationErrors};

text_enum! {
    pub enum SessionType {
        Keynote => "keynote",
        Talk => "talk",
        Workshop => "workshop",
        Panel => "panel",
        Break => "break",
        Networking => "networking",
        Other => "other",
    }
    default = Talk;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AgendaSession {
    pub id: String,
    pub event_id: String,
    pub title: String,
    pub description: Option<String>,
    pub session_type: SessionType,
    pub starts_at: String,
    pub ends_at: String,
    pub location: Option<String>,
    pub speaker_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateSessionRequest {
    pub title: String,
    pub description: Option<String>,
    pub session_type: Option<SessionType>,
    pub starts_at: String,
    pub ends_at: String,
    pub location: Option<String>,
    pub speaker_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateSessionRequest {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "crate::types::nullable")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    pub session_type: Option<SessionType>,
    pub starts_at: Option<String>,
    pub ends_at: Option<String>,
    #[serde(default, deserialize_with = "crate::types::nullable")]
    #[schema(value_type = Option<String>)]
    pub location: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::types::nullable")]
    #[schema(value_type = Option<String>)]
    pub speaker_id: Option<Option<String>>,
}

impl AgendaSession {
    pub fn from_request(id: String, event_id: &str, request: CreateSessionRequest, now: &str) -> Self {
        Self {
            id,
            event_id: event_id.to_string(),
            title: request.title.trim().to_string(),
            description: request.description,
            session_type: request.session_type.unwrap_or_default(),
            starts_at: request.starts_at,
            ends_at: request.ends_at,
            location: request.location.map(|l| l.trim().to_string()),
            speaker_id: request.speaker_id,
            created_at: now.to_string(),
            updated_at: now.to_string(),
        }
    }

    pub fn apply(&mut self, request: UpdateSessionRequest) {
        if let Some(title) = request.title {
            self.title = title.trim().to_string();
        }
        if let Some(description) = request.description {
            self.description = description;
        }
        if let Some(session_type) = request.session_type {
            self.session_type = session_type;
        }
        if let Some(starts_at) = request.starts_at {
            self.starts_at = starts_at;
        }
        if let Some(ends_at) = request.ends_at {
            self.ends_at = ends_at;
        }
        if let Some(location) = request.location {
            self.location = location.map(|l| l.trim().to_string());
        }
        if let Some(speaker_id) = request.speaker_id {
            self.speaker_id = speaker_id;
        }
    }

    pub fn validate(&self) -> DatabaseResult<()> {
        let mut errors = ValidationErrors::new();
        validation::require_text(&mut errors, "title", &self.title, 200);
        validation::check_optional_text(&mut errors, "description", self.description.as_deref(), 5000);
        validation::check_optional_text(&mut errors, "location", self.location.as_deref(), 200);
        let starts = validation::parse_instant(&mut errors, "starts_at", &self.starts_at);
        let ends = validation::parse_instant(&mut errors, "ends_at", &self.ends_at);
        validation::check_order(&mut errors, "ends_at", starts, ends, false);
        errors.into_result()
    }

    pub fn window(&self) -> Option<(DateTime<FixedOffset>, DateTime<FixedOffset>)> {
        let starts = DateTime::parse_from_rfc3339(&self.starts_at).ok()?;
        let ends = DateTime::parse_from_rfc3339(&self.ends_at).ok()?;
        Some((starts, ends))
    }

    /// Room key used for overlap checks; blank locations never clash.
    pub fn room(&self) -> Option<String> {
        self.location
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_lowercase)
    }
}
