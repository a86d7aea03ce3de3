//! Repository for reusable email templates.

use std::collections::{BTreeSet, HashMap};

use sqlx::SqlitePool;
use tracing::info;

use crate::entities::{
    CreateEmailTemplateRequest, EmailTemplate, Event, RenderedTemplate,
    UpdateEmailTemplateRequest,
};
use crate::repos::duplicate_as;
use crate::rules::template;
use crate::types::{timestamp, DatabaseError, DatabaseResult};

const TEMPLATE_COLUMNS: &str = "id, name, subject, body, category, created_at, updated_at";

const DUPLICATE_NAME: &str = "an email template with this name already exists";

pub struct EmailTemplateRepository {
    pool: SqlitePool,
}

impl EmailTemplateRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, category: Option<&str>) -> DatabaseResult<Vec<EmailTemplate>> {
        let templates = match category {
            Some(category) => {
                sqlx::query_as::<_, EmailTemplate>(&format!(
                    "SELECT {TEMPLATE_COLUMNS} FROM email_templates
                     WHERE category = ? COLLATE NOCASE ORDER BY name COLLATE NOCASE"
                ))
                .bind(category)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, EmailTemplate>(&format!(
                    "SELECT {TEMPLATE_COLUMNS} FROM email_templates ORDER BY name COLLATE NOCASE"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(templates)
    }

    pub async fn find(&self, id: &str) -> DatabaseResult<Option<EmailTemplate>> {
        let template = sqlx::query_as::<_, EmailTemplate>(&format!(
            "SELECT {TEMPLATE_COLUMNS} FROM email_templates WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(template)
    }

    pub async fn get(&self, id: &str) -> DatabaseResult<EmailTemplate> {
        self.find(id)
            .await?
            .ok_or(DatabaseError::NotFound("Email template"))
    }

    pub async fn create(&self, request: CreateEmailTemplateRequest) -> DatabaseResult<EmailTemplate> {
        let template = EmailTemplate::from_request(cuid2::cuid(), request, &timestamp());
        template.validate()?;

        sqlx::query(
            "INSERT INTO email_templates (id, name, subject, body, category, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&template.id)
        .bind(&template.name)
        .bind(&template.subject)
        .bind(&template.body)
        .bind(&template.category)
        .bind(&template.created_at)
        .bind(&template.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| duplicate_as(e, DUPLICATE_NAME))?;

        info!(template_id = %template.id, name = %template.name, "created email template");
        Ok(template)
    }

    pub async fn update(
        &self,
        id: &str,
        request: UpdateEmailTemplateRequest,
    ) -> DatabaseResult<EmailTemplate> {
        let mut template = self.get(id).await?;
        template.apply(request);
        template.validate()?;
        template.updated_at = timestamp();

        sqlx::query(
            "UPDATE email_templates
             SET name = ?, subject = ?, body = ?, category = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&template.name)
        .bind(&template.subject)
        .bind(&template.body)
        .bind(&template.category)
        .bind(&template.updated_at)
        .bind(&template.id)
        .execute(&self.pool)
        .await
        .map_err(|e| duplicate_as(e, DUPLICATE_NAME))?;

        info!(template_id = %template.id, "updated email template");
        Ok(template)
    }

    pub async fn delete(&self, id: &str) -> DatabaseResult<()> {
        let result = sqlx::query("DELETE FROM email_templates WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Email template"));
        }
        info!(template_id = %id, "deleted email template");
        Ok(())
    }

    /// Render a template. Event variables are added when an event is given;
    /// explicitly supplied variables win over them.
    pub async fn preview(
        &self,
        id: &str,
        event: Option<&Event>,
        variables: HashMap<String, String>,
    ) -> DatabaseResult<RenderedTemplate> {
        let template = self.get(id).await?;
        Ok(render_template(&template, event, variables))
    }
}

pub(crate) fn render_template(
    template: &EmailTemplate,
    event: Option<&Event>,
    variables: HashMap<String, String>,
) -> RenderedTemplate {
    let mut values = event.map(template::event_variables).unwrap_or_default();
    values.extend(variables);

    let missing_variables = template::placeholders(&template.subject)
        .into_iter()
        .chain(template::placeholders(&template.body))
        .filter(|name| !values.contains_key(name))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    RenderedTemplate {
        subject: template::render(&template.subject, &values),
        body: template::render(&template.body, &values),
        missing_variables,
    }
}
