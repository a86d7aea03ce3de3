//! Dashboard view of a single event assembled from every repository.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::SqlitePool;
use utoipa::ToSchema;

use crate::entities::{Deadline, Event, EventStatus, ParticipantCounts, SpeakerStatus};
use crate::repos::{
    AgendaRepository, BudgetRepository, DeadlineRepository, ParticipantRepository,
    SpeakerRepository, SponsorRepository, StaffAssignmentRepository,
};
use crate::rules::{self, BudgetSummary, StaffCostSummary};
use crate::types::DatabaseResult;

pub const UPCOMING_DEADLINES: i64 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct EventOverview {
    pub event: Event,
    pub effective_status: EventStatus,
    pub participants: ParticipantCounts,
    pub confirmed_speakers: i64,
    pub sponsor_contributions_cents: i64,
    pub budget: BudgetSummary,
    pub staff_costs: StaffCostSummary,
    pub upcoming_deadlines: Vec<Deadline>,
    pub session_count: i64,
}

pub async fn load_overview(
    pool: &SqlitePool,
    event: Event,
    today: NaiveDate,
) -> DatabaseResult<EventOverview> {
    let participants = ParticipantRepository::new(pool.clone())
        .count_by_status(&event.id)
        .await?;
    let confirmed_speakers = SpeakerRepository::new(pool.clone())
        .list_for_event(&event.id)
        .await?
        .iter()
        .filter(|speaker| speaker.status == SpeakerStatus::Confirmed)
        .count() as i64;
    let sponsor_contributions_cents = SponsorRepository::new(pool.clone())
        .secured_contributions(&event.id)
        .await?;
    let budget = BudgetRepository::new(pool.clone()).summary(&event).await?;
    let staff_costs = StaffAssignmentRepository::new(pool.clone())
        .cost_summary(&event.id, today)
        .await?;
    let upcoming_deadlines = DeadlineRepository::new(pool.clone())
        .upcoming(&event.id, today, UPCOMING_DEADLINES)
        .await?;
    let session_count = AgendaRepository::new(pool.clone())
        .count_for_event(&event.id)
        .await?;

    Ok(EventOverview {
        effective_status: rules::event::effective_status(&event, today),
        event,
        participants,
        confirmed_speakers,
        sponsor_contributions_cents,
        budget,
        staff_costs,
        upcoming_deadlines,
        session_count,
    })
}
