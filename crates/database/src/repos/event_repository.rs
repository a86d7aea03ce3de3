//! Repository for event data access operations.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::info;

use crate::entities::{CreateEventRequest, Event, EventFilter, EventStatus, UpdateEventRequest};
use crate::types::{timestamp, DatabaseError, DatabaseResult};

const EVENT_COLUMNS: &str = "id, name, description, venue, start_date, end_date, capacity, \
                             budget_cents, status, created_at, updated_at";

/// Repository for event database operations
pub struct EventRepository {
    pool: SqlitePool,
}

impl EventRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List events ordered by start date, optionally filtered by status and
    /// a case-insensitive name/venue search.
    pub async fn list(&self, filter: &EventFilter) -> DatabaseResult<Vec<Event>> {
        let mut builder: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new(format!("SELECT {EVENT_COLUMNS} FROM events WHERE 1 = 1"));

        match (filter.status, filter.today) {
            (Some(status), Some(today)) => {
                // mirrors rules::event::effective_status; dates compare as text
                let today = today.format("%Y-%m-%d").to_string();
                builder
                    .push(
                        " AND (CASE WHEN status IN ('draft', 'cancelled') THEN status \
                         WHEN ",
                    )
                    .push_bind(today.clone())
                    .push(" < start_date THEN 'upcoming' WHEN ")
                    .push_bind(today)
                    .push(" > end_date THEN 'completed' ELSE 'active' END) = ")
                    .push_bind(status.as_str());
            }
            (Some(status), None) => {
                builder.push(" AND status = ").push_bind(status.as_str());
            }
            (None, _) => {}
        }
        if let Some(search) = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            let pattern = format!("%{}%", search.to_lowercase());
            builder
                .push(" AND (LOWER(name) LIKE ")
                .push_bind(pattern.clone())
                .push(" OR LOWER(COALESCE(venue, '')) LIKE ")
                .push_bind(pattern)
                .push(")");
        }
        builder
            .push(" ORDER BY start_date ASC, name ASC LIMIT ")
            .push_bind(filter.page.limit)
            .push(" OFFSET ")
            .push_bind(filter.page.offset);

        let events = builder
            .build_query_as::<Event>()
            .fetch_all(&self.pool)
            .await?;
        Ok(events)
    }

    pub async fn find(&self, id: &str) -> DatabaseResult<Option<Event>> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(event)
    }

    pub async fn get(&self, id: &str) -> DatabaseResult<Event> {
        self.find(id).await?.ok_or(DatabaseError::NotFound("Event"))
    }

    pub async fn create(&self, request: CreateEventRequest) -> DatabaseResult<Event> {
        let event = Event::from_request(cuid2::cuid(), request, &timestamp());
        event.validate()?;

        sqlx::query(
            "INSERT INTO events (id, name, description, venue, start_date, end_date, capacity,
                                 budget_cents, status, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&event.id)
        .bind(&event.name)
        .bind(&event.description)
        .bind(&event.venue)
        .bind(&event.start_date)
        .bind(&event.end_date)
        .bind(event.capacity)
        .bind(event.budget_cents)
        .bind(event.status.as_str())
        .bind(&event.created_at)
        .bind(&event.updated_at)
        .execute(&self.pool)
        .await?;

        info!(event_id = %event.id, name = %event.name, "created event");
        Ok(event)
    }

    pub async fn update(&self, id: &str, request: UpdateEventRequest) -> DatabaseResult<Event> {
        let mut event = self.get(id).await?;
        event.apply(request);
        event.validate()?;
        event.updated_at = timestamp();

        sqlx::query(
            "UPDATE events
             SET name = ?, description = ?, venue = ?, start_date = ?, end_date = ?,
                 capacity = ?, budget_cents = ?, status = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&event.name)
        .bind(&event.description)
        .bind(&event.venue)
        .bind(&event.start_date)
        .bind(&event.end_date)
        .bind(event.capacity)
        .bind(event.budget_cents)
        .bind(event.status.as_str())
        .bind(&event.updated_at)
        .bind(&event.id)
        .execute(&self.pool)
        .await?;

        info!(event_id = %event.id, status = %event.status, "updated event");
        Ok(event)
    }

    /// Delete an event; child rows go with it through the cascading keys.
    pub async fn delete(&self, id: &str) -> DatabaseResult<()> {
        let result = sqlx::query("DELETE FROM events WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Event"));
        }
        info!(event_id = %id, "deleted event");
        Ok(())
    }

    /// Number of events per stored status.
    pub async fn counts(&self) -> DatabaseResult<Vec<(EventStatus, i64)>> {
        let counts = sqlx::query_as::<_, (EventStatus, i64)>(
            "SELECT status, COUNT(*) FROM events GROUP BY status ORDER BY status",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(counts)
    }
}
