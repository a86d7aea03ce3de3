//! Deadline definitions

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::types::DatabaseResult;
use crate::validation::{self, ValidationErrors};

text_enum! {
    pub enum DeadlinePriority {
        Low => "low",
        Medium => "medium",
        High => "high",
        Critical => "critical",
    }
    default = Medium;
}

text_enum! {
    pub enum DeadlineStatus {
        Pending => "pending",
        Completed => "completed",
        Overdue => "overdue",
    }
    default = Pending;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Deadline {
    pub id: String,
    pub event_id: String,
    pub title: String,
    pub description: Option<String>,
    pub due_date: String,
    pub priority: DeadlinePriority,
    pub status: DeadlineStatus,
    pub completed_at: Option<String>,
    pub assignee: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateDeadlineRequest {
    pub title: String,
    pub description: Option<String>,
    pub due_date: String,
    pub priority: Option<DeadlinePriority>,
    pub assignee: Option<String>,
}

/// Completion goes through the complete operation; status is not editable.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateDeadlineRequest {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "crate::types::nullable")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    pub due_date: Option<String>,
    pub priority: Option<DeadlinePriority>,
    #[serde(default, deserialize_with = "crate::types::nullable")]
    #[schema(value_type = Option<String>)]
    pub assignee: Option<Option<String>>,
}

impl Deadline {
    pub fn from_request(id: String, event_id: &str, request: CreateDeadlineRequest, now: &str) -> Self {
        Self {
            id,
            event_id: event_id.to_string(),
            title: request.title.trim().to_string(),
            description: request.description,
            due_date: request.due_date,
            priority: request.priority.unwrap_or_default(),
            status: DeadlineStatus::Pending,
            completed_at: None,
            assignee: request.assignee,
            created_at: now.to_string(),
            updated_at: now.to_string(),
        }
    }

    pub fn apply(&mut self, request: UpdateDeadlineRequest) {
        if let Some(title) = request.title {
            self.title = title.trim().to_string();
        }
        if let Some(description) = request.description {
            self.description = description;
        }
        if let Some(due_date) = request.due_date {
            self.due_date = due_date;
        }
        if let Some(priority) = request.priority {
            self.priority = priority;
        }
        if let Some(assignee) = request.assignee {
            self.assignee = assignee;
        }
    }

    pub fn validate(&self) -> DatabaseResult<()> {
        let mut errors = ValidationErrors::new();
        validation::require_text(&mut errors, "title", &self.title, 200);
        validation::check_optional_text(&mut errors, "description", self.description.as_deref(), 5000);
        validation::parse_date(&mut errors, "due_date", &self.due_date);
        validation::check_optional_text(&mut errors, "assignee", self.assignee.as_deref(), 200);
        errors.into_result()
    }
}
