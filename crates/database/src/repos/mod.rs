//! Database repository implementations

pub mod agenda_repository;
pub mod budget_repository;
pub mod communication_repository;
pub mod deadline_repository;
pub mod email_template_repository;
pub mod event_repository;
pub mod file_repository;
pub mod participant_repository;
pub mod speaker_repository;
pub mod sponsor_repository;
pub mod staff_assignment_repository;
pub mod staff_repository;

pub use agenda_repository::*;
pub use budget_repository::*;
pub use communication_repository::*;
pub use deadline_repository::*;
pub use email_template_repository::*;
pub use event_repository::*;
pub use file_repository::*;
pub use participant_repository::*;
pub use speaker_repository::*;
pub use sponsor_repository::*;
pub use staff_assignment_repository::*;
pub use staff_repository::*;

use crate::types::DatabaseError;

/// Replaces the driver's unique-violation text with a message naming the field.
pub(crate) fn duplicate_as(error: sqlx::Error, message: &str) -> DatabaseError {
    match DatabaseError::from(error) {
        DatabaseError::Duplicate(_) => DatabaseError::Duplicate(message.to_string()),
        other => other,
    }
}
