//! Error types for the database layer

use crate::validation::ValidationErrors;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Database connection error: {0}")]
    ConnectionError(String),

    #[error("Database query error: {0}")]
    QueryError(String),

    #[error("Database migration error: {0}")]
    MigrationError(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl DatabaseError {
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::Validation(ValidationErrors::single(field, message))
    }
}

impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_error) = &error {
            if db_error.is_unique_violation() {
                return Self::Duplicate(db_error.message().to_string());
            }
            if db_error.is_foreign_key_violation() {
                return Self::Conflict(db_error.message().to_string());
            }
            if db_error.is_check_violation() {
                return Self::Conflict(db_error.message().to_string());
            }
        }
        Self::QueryError(error.to_string())
    }
}

impl From<ValidationErrors> for DatabaseError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_wraps_single_field_error() {
        let error = DatabaseError::invalid("email", "is not a valid address");
        match error {
            DatabaseError::Validation(errors) => {
                assert_eq!(
                    errors.get("email"),
                    Some(&["is not a valid address".to_string()][..])
                );
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn not_found_message_names_entity() {
        assert_eq!(DatabaseError::NotFound("Event").to_string(), "Event not found");
    }
}
