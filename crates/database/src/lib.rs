//! EventDesk Database Crate
//!
//! Connection management, migrations, entities with their validation, pure
//! business rules and one repository per aggregate.

use sqlx::SqlitePool;

use eventdesk_config::DatabaseConfig;

pub mod connection;
pub mod entities;
pub mod migrations;
pub mod overview;
pub mod repos;
pub mod rules;
pub mod types;
pub mod validation;

pub use connection::{prepare_database, DatabaseConnection};
pub use migrations::run_migrations;
pub use overview::{load_overview, EventOverview};

pub use repos::{
    AgendaRepository, BudgetRepository, CommunicationRepository, DeadlineRepository,
    EmailTemplateRepository, EventRepository, FileRepository, ParticipantRepository,
    SpeakerRepository, SponsorRepository, StaffAssignmentRepository, StaffRepository,
};

pub use entities::*;

pub use rules::{AssignmentPayment, BudgetSummary, CategorySummary, StaffCostSummary};
pub use types::{timestamp, DatabaseError, DatabaseResult, Page};
pub use validation::ValidationErrors;

/// Open the pool and bring the schema up to date.
pub async fn initialize_database(config: &DatabaseConfig) -> DatabaseResult<SqlitePool> {
    let pool = prepare_database(config)
        .await
        .map_err(|e| DatabaseError::ConnectionError(format!("{e:#}")))?;

    run_migrations(&pool)
        .await
        .map_err(|e| DatabaseError::MigrationError(format!("{e:#}")))?;

    Ok(pool)
}
