//! Repository for budget categories, line items and the budget summary.

use sqlx::SqlitePool;
use tracing::info;

use crate::entities::{
    BudgetCategory, BudgetItem, CreateBudgetCategoryRequest, CreateBudgetItemRequest, Event,
    UpdateBudgetCategoryRequest, UpdateBudgetItemRequest,
};
use crate::repos::duplicate_as;
use crate::rules::budget::{self, BudgetSummary};
use crate::types::{timestamp, DatabaseError, DatabaseResult};

const CATEGORY_COLUMNS: &str = "id, event_id, name, allocated_cents, color, created_at, updated_at";

const ITEM_COLUMNS: &str = "id, event_id, category_id, description, vendor, planned_cents, \
                            actual_cents, status, due_date, notes, created_at, updated_at";

const DUPLICATE_CATEGORY: &str = "a budget category with this name already exists for the event";

pub struct BudgetRepository {
    pool: SqlitePool,
}

impl BudgetRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_categories(&self, event_id: &str) -> DatabaseResult<Vec<BudgetCategory>> {
        let categories = sqlx::query_as::<_, BudgetCategory>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM budget_categories
             WHERE event_id = ? ORDER BY name COLLATE NOCASE"
        ))
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }

    pub async fn get_category(&self, id: &str) -> DatabaseResult<BudgetCategory> {
        sqlx::query_as::<_, BudgetCategory>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM budget_categories WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DatabaseError::NotFound("Budget category"))
    }

    pub async fn create_category(
        &self,
        event_id: &str,
        request: CreateBudgetCategoryRequest,
    ) -> DatabaseResult<BudgetCategory> {
        let category = BudgetCategory::from_request(cuid2::cuid(), event_id, request, &timestamp());
        category.validate()?;

        sqlx::query(
            "INSERT INTO budget_categories (id, event_id, name, allocated_cents, color,
                                            created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&category.id)
        .bind(&category.event_id)
        .bind(&category.name)
        .bind(category.allocated_cents)
        .bind(&category.color)
        .bind(&category.created_at)
        .bind(&category.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| duplicate_as(e, DUPLICATE_CATEGORY))?;

        info!(category_id = %category.id, event_id = %category.event_id, "created budget category");
        Ok(category)
    }

    pub async fn update_category(
        &self,
        id: &str,
        request: UpdateBudgetCategoryRequest,
    ) -> DatabaseResult<BudgetCategory> {
        let mut category = self.get_category(id).await?;
        category.apply(request);
        category.validate()?;
        category.updated_at = timestamp();

        sqlx::query(
            "UPDATE budget_categories
             SET name = ?, allocated_cents = ?, color = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&category.name)
        .bind(category.allocated_cents)
        .bind(&category.color)
        .bind(&category.updated_at)
        .bind(&category.id)
        .execute(&self.pool)
        .await
        .map_err(|e| duplicate_as(e, DUPLICATE_CATEGORY))?;

        info!(category_id = %category.id, "updated budget category");
        Ok(category)
    }

    /// Delete a category; its items become uncategorised.
    pub async fn delete_category(&self, id: &str) -> DatabaseResult<()> {
        let result = sqlx::query("DELETE FROM budget_categories WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Budget category"));
        }
        info!(category_id = %id, "deleted budget category");
        Ok(())
    }

    pub async fn list_items(&self, event_id: &str) -> DatabaseResult<Vec<BudgetItem>> {
        let items = sqlx::query_as::<_, BudgetItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM budget_items WHERE event_id = ? ORDER BY created_at, id"
        ))
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    pub async fn get_item(&self, id: &str) -> DatabaseResult<BudgetItem> {
        sqlx::query_as::<_, BudgetItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM budget_items WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DatabaseError::NotFound("Budget item"))
    }

    pub async fn create_item(
        &self,
        event_id: &str,
        request: CreateBudgetItemRequest,
    ) -> DatabaseResult<BudgetItem> {
        let item = BudgetItem::from_request(cuid2::cuid(), event_id, request, &timestamp());
        item.validate()?;
        self.check_category(&item).await?;

        sqlx::query(
            "INSERT INTO budget_items (id, event_id, category_id, description, vendor,
                                       planned_cents, actual_cents, status, due_date, notes,
                                       created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&item.id)
        .bind(&item.event_id)
        .bind(&item.category_id)
        .bind(&item.description)
        .bind(&item.vendor)
        .bind(item.planned_cents)
        .bind(item.actual_cents)
        .bind(item.status.as_str())
        .bind(&item.due_date)
        .bind(&item.notes)
        .bind(&item.created_at)
        .bind(&item.updated_at)
        .execute(&self.pool)
        .await?;

        info!(
            item_id = %item.id,
            event_id = %item.event_id,
            planned_cents = item.planned_cents,
            "created budget item"
        );
        Ok(item)
    }

    pub async fn update_item(
        &self,
        id: &str,
        request: UpdateBudgetItemRequest,
    ) -> DatabaseResult<BudgetItem> {
        let mut item = self.get_item(id).await?;
        item.apply(request);
        item.validate()?;
        self.check_category(&item).await?;
        item.updated_at = timestamp();

        sqlx::query(
            "UPDATE budget_items
             SET category_id = ?, description = ?, vendor = ?, planned_cents = ?,
                 actual_cents = ?, status = ?, due_date = ?, notes = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&item.category_id)
        .bind(&item.description)
        .bind(&item.vendor)
        .bind(item.planned_cents)
        .bind(item.actual_cents)
        .bind(item.status.as_str())
        .bind(&item.due_date)
        .bind(&item.notes)
        .bind(&item.updated_at)
        .bind(&item.id)
        .execute(&self.pool)
        .await?;

        info!(item_id = %item.id, status = %item.status, "updated budget item");
        Ok(item)
    }

    pub async fn delete_item(&self, id: &str) -> DatabaseResult<()> {
        let result = sqlx::query("DELETE FROM budget_items WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Budget item"));
        }
        info!(item_id = %id, "deleted budget item");
        Ok(())
    }

    /// Aggregate the event's budget from its categories and items.
    pub async fn summary(&self, event: &Event) -> DatabaseResult<BudgetSummary> {
        let categories = self.list_categories(&event.id).await?;
        let items = self.list_items(&event.id).await?;
        Ok(budget::summarize(event.budget_cents, &categories, &items))
    }

    async fn check_category(&self, item: &BudgetItem) -> DatabaseResult<()> {
        let Some(category_id) = item.category_id.as_deref() else {
            return Ok(());
        };
        let owner: Option<(String,)> =
            sqlx::query_as("SELECT event_id FROM budget_categories WHERE id = ?")
                .bind(category_id)
                .fetch_optional(&self.pool)
                .await?;
        match owner {
            Some((event_id,)) if event_id == item.event_id => Ok(()),
            Some(_) => Err(DatabaseError::invalid(
                "category_id",
                "category belongs to another event",
            )),
            None => Err(DatabaseError::invalid("category_id", "unknown budget category")),
        }
    }
}
