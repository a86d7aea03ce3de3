//! File record definitions. Only metadata and an external URL are stored.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::types::DatabaseResult;
use crate::validation::{self, ValidationErrors};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct FileRecord {
    pub id: String,
    pub event_id: String,
    pub name: String,
    pub url: String,
    pub content_type: Option<String>,
    pub size_bytes: i64,
    pub uploaded_by: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateFileRequest {
    pub name: String,
    pub url: String,
    pub content_type: Option<String>,
    #[serde(default)]
    pub size_bytes: i64,
    pub uploaded_by: Option<String>,
}

impl FileRecord {
    pub fn from_request(id: String, event_id: &str, request: CreateFileRequest, now: &str) -> Self {
        Self {
            id,
            event_id: event_id.to_string(),
            name: request.name.trim().to_string(),
            url: request.url.trim().to_string(),
            content_type: request.content_type,
            size_bytes: request.size_bytes,
            uploaded_by: request.uploaded_by,
            created_at: now.to_string(),
        }
    }

    pub fn validate(&self) -> DatabaseResult<()> {
        let mut errors = ValidationErrors::new();
        validation::require_text(&mut errors, "name", &self.name, 255);
        validation::check_url(&mut errors, "url", &self.url);
        validation::check_optional_text(&mut errors, "content_type", self.content_type.as_deref(), 255);
        validation::check_non_negative(&mut errors, "size_bytes", self.size_bytes);
        errors.into_result()
    }
}
