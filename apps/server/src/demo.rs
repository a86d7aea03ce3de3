//! Demo data for local exploration of the API.

use anyhow::Context;
use chrono::{Duration, NaiveDate};
use eventdesk_database::{
    AgendaRepository, Audience, BudgetItemStatus, BudgetRepository, CommunicationRepository,
    CreateAssignmentRequest, CreateBudgetCategoryRequest, CreateBudgetItemRequest,
    CreateCommunicationRequest, CreateDeadlineRequest, CreateEmailTemplateRequest,
    CreateEventRequest, CreateFileRequest, CreateParticipantRequest, CreateSessionRequest,
    CreateSpeakerRequest, CreateSponsorRequest, CreateStaffRequest, DeadlinePriority,
    DeadlineRepository, EmailTemplateRepository, EventFilter, EventRepository, EventStatus,
    FileRepository, ParticipantRepository, PaymentTerms, RateType, SessionType,
    SpeakerRepository, SpeakerStatus, SponsorRepository, SponsorStatus, SponsorTier, Staff,
    StaffAssignmentRepository, StaffRepository, TicketType,
};
use sqlx::SqlitePool;
use tracing::info;

pub const DEMO_EVENT_NAME: &str = "EventDesk Demo Conference";
const DEMO_TEMPLATE_NAME: &str = "Demo welcome";

#[derive(Debug)]
pub struct SeedReport {
    pub event_id: String,
    pub event_name: String,
    pub participants: usize,
    pub speakers: usize,
    pub sponsors: usize,
    pub assignments: usize,
    pub budget_items: usize,
    pub sessions: usize,
}

/// Seed one demo event starting a month after `today`. Returns `None` when
/// the demo event is already present.
pub async fn seed(pool: &SqlitePool, today: NaiveDate) -> anyhow::Result<Option<SeedReport>> {
    let events = EventRepository::new(pool.clone());
    let existing = events
        .list(&EventFilter {
            search: Some(DEMO_EVENT_NAME.to_string()),
            ..Default::default()
        })
        .await?;
    if existing.iter().any(|event| event.name == DEMO_EVENT_NAME) {
        return Ok(None);
    }

    let first_day = today + Duration::days(30);
    let last_day = first_day + Duration::days(2);
    let day = |offset: i64| (first_day + Duration::days(offset)).format("%Y-%m-%d").to_string();

    let event = events
        .create(CreateEventRequest {
            name: DEMO_EVENT_NAME.to_string(),
            description: Some("Three days of talks, workshops and hallway track".to_string()),
            venue: Some("Riverside Convention Centre".to_string()),
            start_date: first_day.format("%Y-%m-%d").to_string(),
            end_date: last_day.format("%Y-%m-%d").to_string(),
            capacity: Some(150),
            budget_cents: 5_000_000,
            status: Some(EventStatus::Upcoming),
        })
        .await
        .context("failed to create demo event")?;

    let participants = ParticipantRepository::new(pool.clone());
    let attendees = [
        ("Ada Lovelace", "ada@example.com", TicketType::Vip),
        ("Grace Hopper", "grace@example.com", TicketType::General),
        ("Alan Turing", "alan@example.com", TicketType::General),
        ("Katherine Johnson", "katherine@example.com", TicketType::Student),
        ("Edsger Dijkstra", "edsger@example.com", TicketType::Press),
    ];
    for (name, email, ticket_type) in attendees {
        participants
            .register(
                &event,
                CreateParticipantRequest {
                    name: name.to_string(),
                    email: email.to_string(),
                    phone: None,
                    company: None,
                    ticket_type: Some(ticket_type),
                    status: None,
                    notes: None,
                },
            )
            .await
            .with_context(|| format!("failed to register {name}"))?;
    }

    let speakers = SpeakerRepository::new(pool.clone());
    let keynote = speakers
        .create(
            &event.id,
            CreateSpeakerRequest {
                name: "Barbara Liskov".to_string(),
                email: Some("barbara@example.com".to_string()),
                bio: Some("Substitution principles and abstract data types".to_string()),
                company: None,
                job_title: Some("Professor".to_string()),
                photo_url: None,
                fee_cents: 250_000,
                status: Some(SpeakerStatus::Confirmed),
            },
        )
        .await
        .context("failed to create keynote speaker")?;
    speakers
        .create(
            &event.id,
            CreateSpeakerRequest {
                name: "Ken Thompson".to_string(),
                email: Some("ken@example.com".to_string()),
                bio: None,
                company: None,
                job_title: None,
                photo_url: None,
                fee_cents: 0,
                status: Some(SpeakerStatus::Invited),
            },
        )
        .await
        .context("failed to create invited speaker")?;

    let sponsors = SponsorRepository::new(pool.clone());
    for (name, tier, contribution_cents, status) in [
        ("Ferris Foundry", SponsorTier::Gold, 1_500_000, SponsorStatus::Confirmed),
        ("Crab Cloud", SponsorTier::Silver, 500_000, SponsorStatus::Prospect),
    ] {
        sponsors
            .create(
                &event.id,
                CreateSponsorRequest {
                    name: name.to_string(),
                    tier: Some(tier),
                    contribution_cents,
                    contact_name: None,
                    contact_email: None,
                    website: None,
                    status: Some(status),
                },
            )
            .await
            .with_context(|| format!("failed to create sponsor {name}"))?;
    }

    let budget = BudgetRepository::new(pool.clone());
    let venue = budget
        .create_category(
            &event.id,
            CreateBudgetCategoryRequest {
                name: "Venue".to_string(),
                allocated_cents: 2_000_000,
                color: Some("#3b82f6".to_string()),
            },
        )
        .await
        .context("failed to create venue budget category")?;
    let catering = budget
        .create_category(
            &event.id,
            CreateBudgetCategoryRequest {
                name: "Catering".to_string(),
                allocated_cents: 1_000_000,
                color: Some("#f59e0b".to_string()),
            },
        )
        .await
        .context("failed to create catering budget category")?;
    let items = [
        (Some(&venue.id), "Hall rental", 1_800_000, 0, BudgetItemStatus::Committed),
        (Some(&catering.id), "Lunch for three days", 900_000, 0, BudgetItemStatus::Planned),
        (None, "Lanyards and badges", 80_000, 76_500, BudgetItemStatus::Paid),
    ];
    for (category_id, description, planned_cents, actual_cents, status) in items {
        budget
            .create_item(
                &event.id,
                CreateBudgetItemRequest {
                    category_id: category_id.cloned(),
                    description: description.to_string(),
                    vendor: None,
                    planned_cents,
                    actual_cents,
                    status: Some(status),
                    due_date: Some(day(-7)),
                    notes: None,
                },
            )
            .await
            .with_context(|| format!("failed to create budget item {description}"))?;
    }

    let stage_manager = find_or_create_staff(
        pool,
        CreateStaffRequest {
            name: "Sam Rivera".to_string(),
            email: "sam.rivera@example.com".to_string(),
            phone: None,
            role: "Stage manager".to_string(),
            hourly_rate_cents: 3_500,
            active: None,
        },
    )
    .await?;
    let usher = find_or_create_staff(
        pool,
        CreateStaffRequest {
            name: "Kim Lee".to_string(),
            email: "kim.lee@example.com".to_string(),
            phone: None,
            role: "Usher".to_string(),
            hourly_rate_cents: 2_000,
            active: None,
        },
    )
    .await?;
    let assignments = StaffAssignmentRepository::new(pool.clone());
    for (staff, terms) in [(&stage_manager, PaymentTerms::Net15), (&usher, PaymentTerms::Net7)] {
        assignments
            .create(
                &event.id,
                CreateAssignmentRequest {
                    staff_id: staff.id.clone(),
                    role: None,
                    starts_at: format!("{}T08:00:00Z", day(0)),
                    ends_at: format!("{}T17:00:00Z", day(0)),
                    rate_type: Some(RateType::Hourly),
                    rate_cents: None,
                    payment_terms: Some(terms),
                    notes: None,
                },
            )
            .await
            .with_context(|| format!("failed to assign {}", staff.name))?;
    }

    let agenda = AgendaRepository::new(pool.clone());
    let sessions = [
        ("Opening keynote", SessionType::Keynote, 0, "09:00", "10:00", Some(&keynote.id)),
        ("Async in practice", SessionType::Workshop, 0, "10:30", "12:30", None),
        ("Lunch", SessionType::Break, 0, "12:30", "13:30", None),
    ];
    for (title, session_type, offset, starts, ends, speaker_id) in sessions {
        agenda
            .create(
                &event,
                CreateSessionRequest {
                    title: title.to_string(),
                    description: None,
                    session_type: Some(session_type),
                    starts_at: format!("{}T{starts}:00Z", day(offset)),
                    ends_at: format!("{}T{ends}:00Z", day(offset)),
                    location: Some("Main Hall".to_string()),
                    speaker_id: speaker_id.cloned(),
                },
            )
            .await
            .with_context(|| format!("failed to schedule {title}"))?;
    }

    let deadlines = DeadlineRepository::new(pool.clone());
    for (title, due, priority) in [
        ("Confirm catering headcount", day(-10), DeadlinePriority::High),
        ("Print badges", day(-3), DeadlinePriority::Medium),
    ] {
        deadlines
            .create(
                &event.id,
                CreateDeadlineRequest {
                    title: title.to_string(),
                    description: None,
                    due_date: due,
                    priority: Some(priority),
                    assignee: Some(stage_manager.name.clone()),
                },
            )
            .await
            .with_context(|| format!("failed to create deadline {title}"))?;
    }

    let templates = EmailTemplateRepository::new(pool.clone());
    let template = match templates
        .list(None)
        .await?
        .into_iter()
        .find(|template| template.name == DEMO_TEMPLATE_NAME)
    {
        Some(template) => template,
        None => templates
            .create(CreateEmailTemplateRequest {
                name: DEMO_TEMPLATE_NAME.to_string(),
                subject: "Welcome to {{event_name}}".to_string(),
                body: "We look forward to seeing you at {{event_venue}} on {{event_start_date}}."
                    .to_string(),
                category: Some("onboarding".to_string()),
            })
            .await
            .context("failed to create demo email template")?,
    };
    CommunicationRepository::new(pool.clone())
        .create(
            &event,
            CreateCommunicationRequest {
                subject: None,
                body: None,
                channel: None,
                audience: Some(Audience::Participants),
                status: None,
                scheduled_at: None,
                template_id: Some(template.id),
            },
        )
        .await
        .context("failed to create demo communication")?;

    FileRepository::new(pool.clone())
        .create(
            &event.id,
            CreateFileRequest {
                name: "floor-plan.pdf".to_string(),
                url: "https://files.example.com/demo/floor-plan.pdf".to_string(),
                content_type: Some("application/pdf".to_string()),
                size_bytes: 482_113,
                uploaded_by: Some(stage_manager.name.clone()),
            },
        )
        .await
        .context("failed to create demo file record")?;

    info!(event_id = %event.id, "seeded demo event");

    Ok(Some(SeedReport {
        event_id: event.id,
        event_name: event.name,
        participants: attendees.len(),
        speakers: 2,
        sponsors: 2,
        assignments: 2,
        budget_items: items.len(),
        sessions: sessions.len(),
    }))
}

/// Staff outlive events, so a re-seed after deleting the demo event reuses them.
async fn find_or_create_staff(pool: &SqlitePool, request: CreateStaffRequest) -> anyhow::Result<Staff> {
    let repo = StaffRepository::new(pool.clone());
    let existing = repo
        .list(None, Some(&request.name))
        .await?
        .into_iter()
        .find(|staff| staff.email.eq_ignore_ascii_case(&request.email));

    match existing {
        Some(staff) => Ok(staff),
        None => repo
            .create(request)
            .await
            .context("failed to create demo staff member"),
    }
}
