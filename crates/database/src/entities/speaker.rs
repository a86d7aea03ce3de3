//! Speaker entity definitions

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::types::DatabaseResult;
use crate::validation::{self, ValidationErrors};

text_enum! {
    pub enum SpeakerStatus {
        Invited => "invited",
        Confirmed => "confirmed",
        Declined => "declined",
        Cancelled => "cancelled",
    }
    default = Invited;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Speaker {
    pub id: String,
    pub event_id: String,
    pub name: String,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub company: Option<String>,
    pub job_title: Option<String>,
    pub photo_url: Option<String>,
    pub fee_cents: i64,
    pub status: SpeakerStatus,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateSpeakerRequest {
    pub name: String,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub company: Option<String>,
    pub job_title: Option<String>,
    pub photo_url: Option<String>,
    #[serde(default)]
    pub fee_cents: i64,
    pub status: Option<SpeakerStatus>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateSpeakerRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "crate::types::nullable")]
    #[schema(value_type = Option<String>)]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::types::nullable")]
    #[schema(value_type = Option<String>)]
    pub bio: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::types::nullable")]
    #[schema(value_type = Option<String>)]
    pub company: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::types::nullable")]
    #[schema(value_type = Option<String>)]
    pub job_title: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::types::nullable")]
    #[schema(value_type = Option<String>)]
    pub photo_url: Option<Option<String>>,
    pub fee_cents: Option<i64>,
    pub status: Option<SpeakerStatus>,
}

impl Speaker {
    pub fn from_request(id: String, event_id: &str, request: CreateSpeakerRequest, now: &str) -> Self {
        Self {
            id,
            event_id: event_id.to_string(),
            name: request.name.trim().to_string(),
            email: request.email,
            bio: request.bio,
            company: request.company,
            job_title: request.job_title,
            photo_url: request.photo_url,
            fee_cents: request.fee_cents,
            status: request.status.unwrap_or_default(),
            created_at: now.to_string(),
            updated_at: now.to_string(),
        }
    }

    pub fn apply(&mut self, request: UpdateSpeakerRequest) {
        if let Some(name) = request.name {
            self.name = name.trim().to_string();
        }
        if let Some(email) = request.email {
            self.email = email;
        }
        if let Some(bio) = request.bio {
            self.bio = bio;
        }
        if let Some(company) = request.company {
            self.company = company;
        }
        if let Some(job_title) = request.job_title {
            self.job_title = job_title;
        }
        if let Some(photo_url) = request.photo_url {
            self.photo_url = photo_url;
        }
        if let Some(fee_cents) = request.fee_cents {
            self.fee_cents = fee_cents;
        }
        if let Some(status) = request.status {
            self.status = status;
        }
    }

    pub fn validate(&self) -> DatabaseResult<()> {
        let mut errors = ValidationErrors::new();
        validation::require_text(&mut errors, "name", &self.name, 200);
        validation::check_optional_email(&mut errors, "email", self.email.as_deref());
        validation::check_optional_text(&mut errors, "bio", self.bio.as_deref(), 5000);
        validation::check_optional_text(&mut errors, "company", self.company.as_deref(), 200);
        validation::check_optional_text(&mut errors, "job_title", self.job_title.as_deref(), 200);
        validation::check_optional_url(&mut errors, "photo_url", self.photo_url.as_deref());
        validation::check_amount(&mut errors, "fee_cents", self.fee_cents);
        errors.into_result()
    }

    /// Speakers that still receive event communications.
    pub fn is_reachable(&self) -> bool {
        !matches!(self.status, SpeakerStatus::Declined | SpeakerStatus::Cancelled)
    }
}
