//! Event entity definitions

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::types::{DatabaseResult, Page};
use crate::validation::{self, ValidationErrors};

text_enum! {
    /// Lifecycle of an event as stored; see `rules::event` for the date-derived view.
    pub enum EventStatus {
        Draft => "draft",
        Upcoming => "upcoming",
        Active => "active",
        Completed => "completed",
        Cancelled => "cancelled",
    }
    default = Draft;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Event {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub venue: Option<String>,
    /// First day, `YYYY-MM-DD`
    pub start_date: String,
    /// Last day, `YYYY-MM-DD`
    pub end_date: String,
    pub capacity: Option<i64>,
    pub budget_cents: i64,
    pub status: EventStatus,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateEventRequest {
    pub name: String,
    pub description: Option<String>,
    pub venue: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub capacity: Option<i64>,
    #[serde(default)]
    pub budget_cents: i64,
    pub status: Option<EventStatus>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateEventRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "crate::types::nullable")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::types::nullable")]
    #[schema(value_type = Option<String>)]
    pub venue: Option<Option<String>>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "crate::types::nullable")]
    #[schema(value_type = Option<i64>)]
    pub capacity: Option<Option<i64>>,
    pub budget_cents: Option<i64>,
    pub status: Option<EventStatus>,
}

/// Filters accepted by the event listing.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Matched against the status derived for `today` when set, otherwise
    /// against the stored status.
    pub status: Option<EventStatus>,
    pub today: Option<NaiveDate>,
    pub search: Option<String>,
    pub page: Page,
}

impl Event {
    pub fn from_request(id: String, request: CreateEventRequest, now: &str) -> Self {
        Self {
            id,
            name: request.name.trim().to_string(),
            description: request.description,
            venue: request.venue,
            start_date: request.start_date,
            end_date: request.end_date,
            capacity: request.capacity,
            budget_cents: request.budget_cents,
            status: request.status.unwrap_or_default(),
            created_at: now.to_string(),
            updated_at: now.to_string(),
        }
    }

    pub fn apply(&mut self, request: UpdateEventRequest) {
        if let Some(name) = request.name {
            self.name = name.trim().to_string();
        }
        if let Some(description) = request.description {
            self.description = description;
        }
        if let Some(venue) = request.venue {
            self.venue = venue;
        }
        if let Some(start_date) = request.start_date {
            self.start_date = start_date;
        }
        if let Some(end_date) = request.end_date {
            self.end_date = end_date;
        }
        if let Some(capacity) = request.capacity {
            self.capacity = capacity;
        }
        if let Some(budget_cents) = request.budget_cents {
            self.budget_cents = budget_cents;
        }
        if let Some(status) = request.status {
            self.status = status;
        }
    }

    pub fn validate(&self) -> DatabaseResult<()> {
        let mut errors = ValidationErrors::new();
        validation::require_text(&mut errors, "name", &self.name, 200);
        validation::check_optional_text(&mut errors, "description", self.description.as_deref(), 5000);
        validation::check_optional_text(&mut errors, "venue", self.venue.as_deref(), 300);
        let start = validation::parse_date(&mut errors, "start_date", &self.start_date);
        let end = validation::parse_date(&mut errors, "end_date", &self.end_date);
        validation::check_order(&mut errors, "end_date", start, end, true);
        if matches!(self.capacity, Some(capacity) if capacity <= 0) {
            errors.add("capacity", "must be greater than zero");
        }
        validation::check_amount(&mut errors, "budget_cents", self.budget_cents);
        errors.into_result()
    }

    /// Parsed first and last day; `None` only for rows that bypassed validation.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let start = NaiveDate::parse_from_str(&self.start_date, "%Y-%m-%d").ok()?;
        let end = NaiveDate::parse_from_str(&self.end_date, "%Y-%m-%d").ok()?;
        Some((start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DatabaseError;

    fn request() -> CreateEventRequest {
        CreateEventRequest {
            name: "  RustConf  ".to_string(),
            description: None,
            venue: Some("Hall A".to_string()),
            start_date: "2025-09-02".to_string(),
            end_date: "2025-09-04".to_string(),
            capacity: Some(300),
            budget_cents: 5_000_000,
            status: None,
        }
    }

    #[test]
    fn from_request_trims_name_and_defaults_status() {
        let event = Event::from_request("evt".into(), request(), "now");
        assert_eq!(event.name, "RustConf");
        assert_eq!(event.status, EventStatus::Draft);
        assert!(event.validate().is_ok());
        assert_eq!(
            event.date_range(),
            Some((
                NaiveDate::from_ymd_opt(2025, 9, 2).unwrap(),
                NaiveDate::from_ymd_opt(2025, 9, 4).unwrap()
            ))
        );
    }

    #[test]
    fn validate_reports_every_bad_field() {
        let mut event = Event::from_request("evt".into(), request(), "now");
        event.apply(UpdateEventRequest {
            name: Some(" ".into()),
            end_date: Some("2025-09-01".into()),
            capacity: Some(Some(0)),
            budget_cents: Some(-1),
            ..Default::default()
        });

        let Err(DatabaseError::Validation(errors)) = event.validate() else {
            panic!("expected validation errors");
        };
        let fields: Vec<_> = errors.fields().collect();
        assert_eq!(fields, vec!["budget_cents", "capacity", "end_date", "name"]);
    }

    #[test]
    fn apply_keeps_unspecified_fields() {
        let mut event = Event::from_request("evt".into(), request(), "now");
        event.apply(UpdateEventRequest {
            status: Some(EventStatus::Upcoming),
            ..Default::default()
        });
        assert_eq!(event.status, EventStatus::Upcoming);
        assert_eq!(event.venue.as_deref(), Some("Hall A"));
        assert_eq!(event.capacity, Some(300));
    }

    #[test]
    fn apply_clears_fields_sent_as_null() {
        let mut event = Event::from_request("evt".into(), request(), "now");
        let update: UpdateEventRequest =
            serde_json::from_str(r#"{"capacity": null, "venue": null}"#).unwrap();
        event.apply(update);

        assert_eq!(event.capacity, None);
        assert_eq!(event.venue, None);
        assert_eq!(event.name, "RustConf");
        assert!(event.validate().is_ok());
    }
}
