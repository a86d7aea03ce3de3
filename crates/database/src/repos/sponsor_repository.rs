//! Repository for event sponsors.

use sqlx::SqlitePool;
use tracing::info;

use crate::entities::{CreateSponsorRequest, Sponsor, UpdateSponsorRequest};
use crate::types::{timestamp, DatabaseError, DatabaseResult};

const SPONSOR_COLUMNS: &str = "id, event_id, name, tier, contribution_cents, contact_name, \
                               contact_email, website, status, created_at, updated_at";

pub struct SponsorRepository {
    pool: SqlitePool,
}

impl SponsorRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Sponsors ordered by tier rank, then name.
    pub async fn list_for_event(&self, event_id: &str) -> DatabaseResult<Vec<Sponsor>> {
        let sponsors = sqlx::query_as::<_, Sponsor>(&format!(
            "SELECT {SPONSOR_COLUMNS} FROM sponsors WHERE event_id = ?
             ORDER BY CASE tier
                 WHEN 'platinum' THEN 0 WHEN 'gold' THEN 1 WHEN 'silver' THEN 2
                 WHEN 'bronze' THEN 3 ELSE 4 END,
             name COLLATE NOCASE"
        ))
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(sponsors)
    }

    pub async fn find(&self, id: &str) -> DatabaseResult<Option<Sponsor>> {
        let sponsor = sqlx::query_as::<_, Sponsor>(&format!(
            "SELECT {SPONSOR_COLUMNS} FROM sponsors WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(sponsor)
    }

    pub async fn get(&self, id: &str) -> DatabaseResult<Sponsor> {
        self.find(id).await?.ok_or(DatabaseError::NotFound("Sponsor"))
    }

    pub async fn create(
        &self,
        event_id: &str,
        request: CreateSponsorRequest,
    ) -> DatabaseResult<Sponsor> {
        let sponsor = Sponsor::from_request(cuid2::cuid(), event_id, request, &timestamp());
        sponsor.validate()?;

        sqlx::query(
            "INSERT INTO sponsors (id, event_id, name, tier, contribution_cents, contact_name,
                                   contact_email, website, status, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&sponsor.id)
        .bind(&sponsor.event_id)
        .bind(&sponsor.name)
        .bind(sponsor.tier.as_str())
        .bind(sponsor.contribution_cents)
        .bind(&sponsor.contact_name)
        .bind(&sponsor.contact_email)
        .bind(&sponsor.website)
        .bind(sponsor.status.as_str())
        .bind(&sponsor.created_at)
        .bind(&sponsor.updated_at)
        .execute(&self.pool)
        .await?;

        info!(
            sponsor_id = %sponsor.id,
            event_id = %sponsor.event_id,
            tier = %sponsor.tier,
            "created sponsor"
        );
        Ok(sponsor)
    }

    pub async fn update(&self, id: &str, request: UpdateSponsorRequest) -> DatabaseResult<Sponsor> {
        let mut sponsor = self.get(id).await?;
        sponsor.apply(request);
        sponsor.validate()?;
        sponsor.updated_at = timestamp();

        sqlx::query(
            "UPDATE sponsors
             SET name = ?, tier = ?, contribution_cents = ?, contact_name = ?, contact_email = ?,
                 website = ?, status = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&sponsor.name)
        .bind(sponsor.tier.as_str())
        .bind(sponsor.contribution_cents)
        .bind(&sponsor.contact_name)
        .bind(&sponsor.contact_email)
        .bind(&sponsor.website)
        .bind(sponsor.status.as_str())
        .bind(&sponsor.updated_at)
        .bind(&sponsor.id)
        .execute(&self.pool)
        .await?;

        info!(sponsor_id = %sponsor.id, status = %sponsor.status, "updated sponsor");
        Ok(sponsor)
    }

    pub async fn delete(&self, id: &str) -> DatabaseResult<()> {
        let result = sqlx::query("DELETE FROM sponsors WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Sponsor"));
        }
        info!(sponsor_id = %id, "deleted sponsor");
        Ok(())
    }

    /// Sum of contributions from confirmed and paid sponsors.
    pub async fn secured_contributions(&self, event_id: &str) -> DatabaseResult<i64> {
        let (total,): (i64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(contribution_cents), 0) FROM sponsors
             WHERE event_id = ? AND status IN ('confirmed', 'paid')",
        )
        .bind(event_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }
}
