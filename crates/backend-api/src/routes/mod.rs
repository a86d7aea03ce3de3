pub mod agenda;
pub mod assignments;
pub mod budget;
pub mod communications;
pub mod deadlines;
pub mod events;
pub mod files;
pub mod health;
pub mod participants;
pub mod speakers;
pub mod sponsors;
pub mod staff;
pub mod templates;

use eventdesk_database::{Event, EventRepository};

use crate::{ApiError, AppState};

/// Resolve the owning event of a nested route, 404 when it does not exist.
pub(crate) async fn load_event(state: &AppState, event_id: &str) -> Result<Event, ApiError> {
    EventRepository::new(state.db_pool().clone())
        .get(event_id)
        .await
        .map_err(ApiError::from)
}
