//! Email template definitions

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::types::DatabaseResult;
use crate::validation::{self, ValidationErrors};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct EmailTemplate {
    pub id: String,
    pub name: String,
    pub subject: String,
    pub body: String,
    pub category: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateEmailTemplateRequest {
    pub name: String,
    pub subject: String,
    pub body: String,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateEmailTemplateRequest {
    pub name: Option<String>,
    pub subject: Option<String>,
    pub body: Option<String>,
    #[serde(default, deserialize_with = "crate::types::nullable")]
    #[schema(value_type = Option<String>)]
    pub category: Option<Option<String>>,
}

/// Template output with the placeholders no variable was supplied for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RenderedTemplate {
    pub subject: String,
    pub body: String,
    pub missing_variables: Vec<String>,
}

impl EmailTemplate {
    pub fn from_request(id: String, request: CreateEmailTemplateRequest, now: &str) -> Self {
        Self {
            id,
            name: request.name.trim().to_string(),
            subject: request.subject,
            body: request.body,
            category: request.category,
            created_at: now.to_string(),
            updated_at: now.to_string(),
        }
    }

    pub fn apply(&mut self, request: UpdateEmailTemplateRequest) {
        if let Some(name) = request.name {
            self.name = name.trim().to_string();
        }
        if let Some(subject) = request.subject {
            self.subject = subject;
        }
        if let Some(body) = request.body {
            self.body = body;
        }
        if let Some(category) = request.category {
            self.category = category;
        }
    }

    pub fn validate(&self) -> DatabaseResult<()> {
        let mut errors = ValidationErrors::new();
        validation::require_text(&mut errors, "name", &self.name, 100);
        validation::require_text(&mut errors, "subject", &self.subject, 300);
        validation::require_text(&mut errors, "body", &self.body, 50_000);
        validation::check_optional_text(&mut errors, "category", self.category.as_deref(), 100);
        errors.into_result()
    }
}
