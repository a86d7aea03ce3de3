//! Budget category and line item definitions

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::types::DatabaseResult;
use crate::validation::{self, ValidationErrors};

text_enum! {
    pub enum BudgetItemStatus {
        Planned => "planned",
        Committed => "committed",
        Paid => "paid",
        Cancelled => "cancelled",
    }
    default = Planned;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BudgetCategory {
    pub id: String,
    pub event_id: String,
    pub name: String,
    pub allocated_cents: i64,
    pub color: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateBudgetCategoryRequest {
    pub name: String,
    #[serde(default)]
    pub allocated_cents: i64,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateBudgetCategoryRequest {
    pub name: Option<String>,
    pub allocated_cents: Option<i64>,
    #[serde(default, deserialize_with = "crate::types::nullable")]
    #[schema(value_type = Option<String>)]
    pub color: Option<Option<String>>,
}

impl BudgetCategory {
    pub fn from_request(
        id: String,
        event_id: &str,
        request: CreateBudgetCategoryRequest,
        now: &str,
    ) -> Self {
        Self {
            id,
            event_id: event_id.to_string(),
            name: request.name.trim().to_string(),
            allocated_cents: request.allocated_cents,
            color: request.color,
            created_at: now.to_string(),
            updated_at: now.to_string(),
        }
    }

    pub fn apply(&mut self, request: UpdateBudgetCategoryRequest) {
        if let Some(name) = request.name {
            self.name = name.trim().to_string();
        }
        if let Some(allocated) = request.allocated_cents {
            self.allocated_cents = allocated;
        }
        if let Some(color) = request.color {
            self.color = color;
        }
    }

    pub fn validate(&self) -> DatabaseResult<()> {
        let mut errors = ValidationErrors::new();
        validation::require_text(&mut errors, "name", &self.name, 100);
        validation::check_amount(&mut errors, "allocated_cents", self.allocated_cents);
        validation::check_optional_text(&mut errors, "color", self.color.as_deref(), 32);
        errors.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BudgetItem {
    pub id: String,
    pub event_id: String,
    pub category_id: Option<String>,
    pub description: String,
    pub vendor: Option<String>,
    pub planned_cents: i64,
    pub actual_cents: i64,
    pub status: BudgetItemStatus,
    pub due_date: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateBudgetItemRequest {
    pub category_id: Option<String>,
    pub description: String,
    pub vendor: Option<String>,
    #[serde(default)]
    pub planned_cents: i64,
    #[serde(default)]
    pub actual_cents: i64,
    pub status: Option<BudgetItemStatus>,
    pub due_date: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateBudgetItemRequest {
    #[serde(default, deserialize_with = "crate::types::nullable")]
    #[schema(value_type = Option<String>)]
    pub category_id: Option<Option<String>>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "crate::types::nullable")]
    #[schema(value_type = Option<String>)]
    pub vendor: Option<Option<String>>,
    pub planned_cents: Option<i64>,
    pub actual_cents: Option<i64>,
    pub status: Option<BudgetItemStatus>,
    #[serde(default, deserialize_with = "crate::types::nullable")]
    #[schema(value_type = Option<String>)]
    pub due_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::types::nullable")]
    #[schema(value_type = Option<String>)]
    pub notes: Option<Option<String>>,
}

impl BudgetItem {
    pub fn from_request(
        id: String,
        event_id: &str,
        request: CreateBudgetItemRequest,
        now: &str,
    ) -> Self {
        Self {
            id,
            event_id: event_id.to_string(),
            category_id: request.category_id,
            description: request.description.trim().to_string(),
            vendor: request.vendor,
            planned_cents: request.planned_cents,
            actual_cents: request.actual_cents,
            status: request.status.unwrap_or_default(),
            due_date: request.due_date,
            notes: request.notes,
            created_at: now.to_string(),
            updated_at: now.to_string(),
        }
    }

    pub fn apply(&mut self, request: UpdateBudgetItemRequest) {
        if let Some(category_id) = request.category_id {
            self.category_id = category_id;
        }
        if let Some(description) = request.description {
            self.description = description.trim().to_string();
        }
        if let Some(vendor) = request.vendor {
            self.vendor = vendor;
        }
        if let Some(planned) = request.planned_cents {
            self.planned_cents = planned;
        }
        if let Some(actual) = request.actual_cents {
            self.actual_cents = actual;
        }
        if let Some(status) = request.status {
            self.status = status;
        }
        if let Some(due_date) = request.due_date {
            self.due_date = due_date;
        }
        if let Some(notes) = request.notes {
            self.notes = notes;
        }
    }

    pub fn validate(&self) -> DatabaseResult<()> {
        let mut errors = ValidationErrors::new();
        validation::require_text(&mut errors, "description", &self.description, 300);
        validation::check_optional_text(&mut errors, "vendor", self.vendor.as_deref(), 200);
        validation::check_amount(&mut errors, "planned_cents", self.planned_cents);
        validation::check_amount(&mut errors, "actual_cents", self.actual_cents);
        if let Some(due_date) = self.due_date.as_deref() {
            validation::parse_date(&mut errors, "due_date", due_date);
        }
        validation::check_optional_text(&mut errors, "notes", self.notes.as_deref(), 5000);
        errors.into_result()
    }
}
