//! Participant entity definitions

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::types::DatabaseResult;
use crate::validation::{self, ValidationErrors};

text_enum! {
    pub enum TicketType {
        General => "general",
        Vip => "vip",
        Student => "student",
        Speaker => "speaker",
        Staff => "staff",
        Press => "press",
    }
    default = General;
}

text_enum! {
    pub enum ParticipantStatus {
        Registered => "registered",
        Confirmed => "confirmed",
        Waitlisted => "waitlisted",
        Attended => "attended",
        Cancelled => "cancelled",
    }
    default = Registered;
}

impl ParticipantStatus {
    /// Whether the participant occupies a seat counted against capacity.
    pub fn holds_seat(&self) -> bool {
        !matches!(self, ParticipantStatus::Waitlisted | ParticipantStatus::Cancelled)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Participant {
    pub id: String,
    pub event_id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub ticket_type: TicketType,
    pub status: ParticipantStatus,
    pub checked_in_at: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Head count per registration status for one event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ParticipantCounts {
    pub total: i64,
    pub registered: i64,
    pub confirmed: i64,
    pub waitlisted: i64,
    pub attended: i64,
    pub cancelled: i64,
}

impl ParticipantCounts {
    pub fn record(&mut self, status: ParticipantStatus, count: i64) {
        self.total += count;
        match status {
            ParticipantStatus::Registered => self.registered += count,
            ParticipantStatus::Confirmed => self.confirmed += count,
            ParticipantStatus::Waitlisted => self.waitlisted += count,
            ParticipantStatus::Attended => self.attended += count,
            ParticipantStatus::Cancelled => self.cancelled += count,
        }
    }

    /// Participants occupying a seat.
    pub fn seated(&self) -> i64 {
        self.registered + self.confirmed + self.attended
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateParticipantRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub ticket_type: Option<TicketType>,
    pub status: Option<ParticipantStatus>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateParticipantRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(default, deserialize_with = "crate::types::nullable")]
    #[schema(value_type = Option<String>)]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::types::nullable")]
    #[schema(value_type = Option<String>)]
    pub company: Option<Option<String>>,
    pub ticket_type: Option<TicketType>,
    pub status: Option<ParticipantStatus>,
    #[serde(default, deserialize_with = "crate::types::nullable")]
    #[schema(value_type = Option<String>)]
    pub notes: Option<Option<String>>,
}

impl Participant {
    pub fn from_request(
        id: String,
        event_id: &str,
        request: CreateParticipantRequest,
        now: &str,
    ) -> Self {
        Self {
            id,
            event_id: event_id.to_string(),
            name: request.name.trim().to_string(),
            email: request.email.trim().to_string(),
            phone: request.phone,
            company: request.company,
            ticket_type: request.ticket_type.unwrap_or_default(),
            status: request.status.unwrap_or_default(),
            checked_in_at: None,
            notes: request.notes,
            created_at: now.to_string(),
            updated_at: now.to_string(),
        }
    }

    pub fn apply(&mut self, request: UpdateParticipantRequest) {
        if let Some(name) = request.name {
            self.name = name.trim().to_string();
        }
        if let Some(email) = request.email {
            self.email = email.trim().to_string();
        }
        if let Some(phone) = request.phone {
            self.phone = phone;
        }
        if let Some(company) = request.company {
            self.company = company;
        }
        if let Some(ticket_type) = request.ticket_type {
            self.ticket_type = ticket_type;
        }
        if let Some(status) = request.status {
            self.status = status;
        }
        if let Some(notes) = request.notes {
            self.notes = notes;
        }
    }

    pub fn validate(&self) -> DatabaseResult<()> {
        let mut errors = ValidationErrors::new();
        validation::require_text(&mut errors, "name", &self.name, 200);
        validation::check_email(&mut errors, "email", &self.email);
        validation::check_optional_text(&mut errors, "phone", self.phone.as_deref(), 40);
        validation::check_optional_text(&mut errors, "company", self.company.as_deref(), 200);
        validation::check_optional_text(&mut errors, "notes", self.notes.as_deref(), 5000);
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seats_exclude_waitlist_and_cancellations() {
        assert!(ParticipantStatus::Registered.holds_seat());
        assert!(ParticipantStatus::Attended.holds_seat());
        assert!(!ParticipantStatus::Waitlisted.holds_seat());
        assert!(!ParticipantStatus::Cancelled.holds_seat());
    }

    #[test]
    fn rejects_invalid_email() {
        let participant = Participant::from_request(
            "p1".into(),
            "evt",
            CreateParticipantRequest {
                name: "Grace".into(),
                email: "grace-at-example".into(),
                phone: None,
                company: None,
                ticket_type: None,
                status: None,
                notes: None,
            },
            "now",
        );
        assert!(participant.validate().is_err());
        assert_eq!(participant.ticket_type, TicketType::General);
    }
}
