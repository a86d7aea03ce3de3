//! Staff directory entity definitions

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::types::DatabaseResult;
use crate::validation::{self, ValidationErrors};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Staff {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: String,
    pub hourly_rate_cents: i64,
    pub active: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateStaffRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: String,
    #[serde(default)]
    pub hourly_rate_cents: i64,
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateStaffRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(default, deserialize_with = "crate::types::nullable")]
    #[schema(value_type = Option<String>)]
    pub phone: Option<Option<String>>,
    pub role: Option<String>,
    pub hourly_rate_cents: Option<i64>,
    pub active: Option<bool>,
}

impl Staff {
    pub fn from_request(id: String, request: CreateStaffRequest, now: &str) -> Self {
        Self {
            id,
            name: request.name.trim().to_string(),
            email: request.email.trim().to_string(),
            phone: request.phone,
            role: request.role.trim().to_string(),
            hourly_rate_cents: request.hourly_rate_cents,
            active: request.active.unwrap_or(true),
            created_at: now.to_string(),
            updated_at: now.to_string(),
        }
    }

    pub fn apply(&mut self, request: UpdateStaffRequest) {
        if let Some(name) = request.name {
            self.name = name.trim().to_string();
        }
        if let Some(email) = request.email {
            self.email = email.trim().to_string();
        }
        if let Some(phone) = request.phone {
            self.phone = phone;
        }
        if let Some(role) = request.role {
            self.role = role.trim().to_string();
        }
        if let Some(rate) = request.hourly_rate_cents {
            self.hourly_rate_cents = rate;
        }
        if let Some(active) = request.active {
            self.active = active;
        }
    }

    pub fn validate(&self) -> DatabaseResult<()> {
        let mut errors = ValidationErrors::new();
        validation::require_text(&mut errors, "name", &self.name, 200);
        validation::check_email(&mut errors, "email", &self.email);
        validation::check_optional_text(&mut errors, "phone", self.phone.as_deref(), 40);
        validation::require_text(&mut errors, "role", &self.role, 100);
        validation::check_amount(&mut errors, "hourly_rate_cents", self.hourly_rate_cents);
        errors.into_result()
    }
}
