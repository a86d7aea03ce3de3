//! Repository for the organisation-wide staff directory.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::info;

use crate::entities::{CreateStaffRequest, Staff, UpdateStaffRequest};
use crate::repos::duplicate_as;
use crate::types::{timestamp, DatabaseError, DatabaseResult};

const STAFF_COLUMNS: &str =
    "id, name, email, phone, role, hourly_rate_cents, active, created_at, updated_at";

const DUPLICATE_EMAIL: &str = "a staff member with this email already exists";

pub struct StaffRepository {
    pool: SqlitePool,
}

impl StaffRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, active: Option<bool>, search: Option<&str>) -> DatabaseResult<Vec<Staff>> {
        let mut builder: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new(format!("SELECT {STAFF_COLUMNS} FROM staff WHERE 1 = 1"));
        if let Some(active) = active {
            builder.push(" AND active = ").push_bind(active);
        }
        if let Some(search) = search.map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = format!("%{}%", search.to_lowercase());
            builder
                .push(" AND (LOWER(name) LIKE ")
                .push_bind(pattern.clone())
                .push(" OR LOWER(role) LIKE ")
                .push_bind(pattern)
                .push(")");
        }
        builder.push(" ORDER BY name COLLATE NOCASE");

        let staff = builder.build_query_as::<Staff>().fetch_all(&self.pool).await?;
        Ok(staff)
    }

    pub async fn find(&self, id: &str) -> DatabaseResult<Option<Staff>> {
        let staff = sqlx::query_as::<_, Staff>(&format!(
            "SELECT {STAFF_COLUMNS} FROM staff WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(staff)
    }

    pub async fn get(&self, id: &str) -> DatabaseResult<Staff> {
        self.find(id).await?.ok_or(DatabaseError::NotFound("Staff member"))
    }

    pub async fn create(&self, request: CreateStaffRequest) -> DatabaseResult<Staff> {
        let staff = Staff::from_request(cuid2::cuid(), request, &timestamp());
        staff.validate()?;

        sqlx::query(
            "INSERT INTO staff (id, name, email, phone, role, hourly_rate_cents, active,
                                created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&staff.id)
        .bind(&staff.name)
        .bind(&staff.email)
        .bind(&staff.phone)
        .bind(&staff.role)
        .bind(staff.hourly_rate_cents)
        .bind(staff.active)
        .bind(&staff.created_at)
        .bind(&staff.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| duplicate_as(e, DUPLICATE_EMAIL))?;

        info!(staff_id = %staff.id, role = %staff.role, "created staff member");
        Ok(staff)
    }

    pub async fn update(&self, id: &str, request: UpdateStaffRequest) -> DatabaseResult<Staff> {
        let mut staff = self.get(id).await?;
        staff.apply(request);
        staff.validate()?;
        staff.updated_at = timestamp();

        sqlx::query(
            "UPDATE staff
             SET name = ?, email = ?, phone = ?, role = ?, hourly_rate_cents = ?, active = ?,
                 updated_at = ?
             WHERE id = ?",
        )
        .bind(&staff.name)
        .bind(&staff.email)
        .bind(&staff.phone)
        .bind(&staff.role)
        .bind(staff.hourly_rate_cents)
        .bind(staff.active)
        .bind(&staff.updated_at)
        .bind(&staff.id)
        .execute(&self.pool)
        .await
        .map_err(|e| duplicate_as(e, DUPLICATE_EMAIL))?;

        info!(staff_id = %staff.id, active = staff.active, "updated staff member");
        Ok(staff)
    }

    /// Delete a staff member together with their assignments.
    pub async fn delete(&self, id: &str) -> DatabaseResult<()> {
        let result = sqlx::query("DELETE FROM staff WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Staff member"));
        }
        info!(staff_id = %id, "deleted staff member");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::test_support::test_pool;

    fn request(name: &str, email: &str, role: &str) -> CreateStaffRequest {
        CreateStaffRequest {
            name: name.to_string(),
            email: email.to_string(),
            phone: None,
            role: role.to_string(),
            hourly_rate_cents: 2_500,
            active: None,
        }
    }

    #[tokio::test]
    async fn test_staff_email_is_unique() {
        let (pool, _dir) = test_pool().await;
        let repo = StaffRepository::new(pool);

        repo.create(request("Sam", "sam@example.com", "Usher")).await.unwrap();
        let result = repo.create(request("Samuel", "Sam@Example.com", "Usher")).await;
        assert!(matches!(result, Err(DatabaseError::Duplicate(_))));
    }

    #[tokio::test]
    async fn test_list_filters_active_and_search() {
        let (pool, _dir) = test_pool().await;
        let repo = StaffRepository::new(pool);

        let sam = repo.create(request("Sam", "sam@example.com", "Usher")).await.unwrap();
        repo.create(request("Kim", "kim@example.com", "Sound tech")).await.unwrap();
        repo.update(
            &sam.id,
            UpdateStaffRequest {
                active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let active = repo.list(Some(true), None).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "Kim");

        let ushers = repo.list(None, Some("USHER")).await.unwrap();
        assert_eq!(ushers.len(), 1);
        assert!(!ushers[0].active);
    }
}
