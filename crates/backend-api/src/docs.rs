use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    info(title = "EventDesk API", description = "Back office for events, people, money and schedules"),
    paths(
        crate::routes::health::health_check,
        crate::routes::events::list_events,
        crate::routes::events::create_event,
        crate::routes::events::get_event,
        crate::routes::events::update_event,
        crate::routes::events::delete_event,
        crate::routes::events::get_overview,
        crate::routes::events::get_budget_summary,
        crate::routes::participants::list_participants,
        crate::routes::participants::register_participant,
        crate::routes::participants::get_participant,
        crate::routes::participants::update_participant,
        crate::routes::participants::check_in_participant,
        crate::routes::participants::delete_participant,
        crate::routes::speakers::list_speakers,
        crate::routes::speakers::create_speaker,
        crate::routes::speakers::get_speaker,
        crate::routes::speakers::update_speaker,
        crate::routes::speakers::delete_speaker,
        crate::routes::sponsors::list_sponsors,
        crate::routes::sponsors::create_sponsor,
        crate::routes::sponsors::get_sponsor,
        crate::routes::sponsors::update_sponsor,
        crate::routes::sponsors::delete_sponsor,
        crate::routes::staff::list_staff,
        crate::routes::staff::create_staff,
        crate::routes::staff::get_staff,
        crate::routes::staff::update_staff,
        crate::routes::staff::delete_staff,
        crate::routes::staff::list_staff_assignments,
        crate::routes::assignments::list_assignments,
        crate::routes::assignments::create_assignment,
        crate::routes::assignments::get_assignment,
        crate::routes::assignments::update_assignment,
        crate::routes::assignments::mark_assignment_paid,
        crate::routes::assignments::delete_assignment,
        crate::routes::assignments::refresh_statuses,
        crate::routes::budget::list_categories,
        crate::routes::budget::create_category,
        crate::routes::budget::update_category,
        crate::routes::budget::delete_category,
        crate::routes::budget::list_items,
        crate::routes::budget::create_item,
        crate::routes::budget::get_item,
        crate::routes::budget::update_item,
        crate::routes::budget::delete_item,
        crate::routes::agenda::list_sessions,
        crate::routes::agenda::create_session,
        crate::routes::agenda::get_session,
        crate::routes::agenda::update_session,
        crate::routes::agenda::delete_session,
        crate::routes::deadlines::list_deadlines,
        crate::routes::deadlines::create_deadline,
        crate::routes::deadlines::get_deadline,
        crate::routes::deadlines::update_deadline,
        crate::routes::deadlines::complete_deadline,
        crate::routes::deadlines::delete_deadline,
        crate::routes::communications::list_communications,
        crate::routes::communications::create_communication,
        crate::routes::communications::get_communication,
        crate::routes::communications::update_communication,
        crate::routes::communications::preview_recipients,
        crate::routes::communications::send_communication,
        crate::routes::communications::delete_communication,
        crate::routes::templates::list_templates,
        crate::routes::templates::create_template,
        crate::routes::templates::get_template,
        crate::routes::templates::update_template,
        crate::routes::templates::delete_template,
        crate::routes::templates::preview_template,
        crate::routes::files::list_files,
        crate::routes::files::create_file,
        crate::routes::files::get_file,
        crate::routes::files::delete_file,
    ),
    components(
        schemas(
            crate::error::ErrorResponse,
            crate::routes::health::HealthResponse,
            crate::routes::events::EventView,
            crate::routes::events::EventsResponse,
            crate::routes::events::EventResponse,
            crate::routes::events::OverviewResponse,
            crate::routes::events::BudgetSummaryResponse,
            crate::routes::participants::ParticipantsResponse,
            crate::routes::participants::ParticipantResponse,
            crate::routes::speakers::SpeakersResponse,
            crate::routes::speakers::SpeakerResponse,
            crate::routes::sponsors::SponsorsResponse,
            crate::routes::sponsors::SponsorResponse,
            crate::routes::staff::StaffListResponse,
            crate::routes::staff::StaffResponse,
            crate::routes::staff::StaffAssignmentsResponse,
            crate::routes::assignments::AssignmentsResponse,
            crate::routes::assignments::AssignmentResponse,
            crate::routes::assignments::RefreshStatusesResponse,
            crate::routes::budget::CategoriesResponse,
            crate::routes::budget::CategoryResponse,
            crate::routes::budget::ItemsResponse,
            crate::routes::budget::ItemResponse,
            crate::routes::agenda::SessionsResponse,
            crate::routes::agenda::SessionResponse,
            crate::routes::deadlines::DeadlinesResponse,
            crate::routes::deadlines::DeadlineResponse,
            crate::routes::communications::CommunicationsResponse,
            crate::routes::communications::CommunicationResponse,
            crate::routes::communications::RecipientsResponse,
            crate::routes::templates::TemplatesResponse,
            crate::routes::templates::TemplateResponse,
            crate::routes::templates::PreviewResponse,
            crate::routes::templates::PreviewTemplateRequest,
            crate::routes::files::FilesResponse,
            crate::routes::files::FileResponse,
            eventdesk_database::Event,
            eventdesk_database::EventStatus,
            eventdesk_database::CreateEventRequest,
            eventdesk_database::UpdateEventRequest,
            eventdesk_database::EventOverview,
            eventdesk_database::Participant,
            eventdesk_database::ParticipantStatus,
            eventdesk_database::ParticipantCounts,
            eventdesk_database::TicketType,
            eventdesk_database::CreateParticipantRequest,
            eventdesk_database::UpdateParticipantRequest,
            eventdesk_database::Speaker,
            eventdesk_database::SpeakerStatus,
            eventdesk_database::CreateSpeakerRequest,
            eventdesk_database::UpdateSpeakerRequest,
            eventdesk_database::Sponsor,
            eventdesk_database::SponsorTier,
            eventdesk_database::SponsorStatus,
            eventdesk_database::CreateSponsorRequest,
            eventdesk_database::UpdateSponsorRequest,
            eventdesk_database::Staff,
            eventdesk_database::CreateStaffRequest,
            eventdesk_database::UpdateStaffRequest,
            eventdesk_database::StaffAssignment,
            eventdesk_database::AssignmentPayment,
            eventdesk_database::StaffCostSummary,
            eventdesk_database::RateType,
            eventdesk_database::PaymentTerms,
            eventdesk_database::PaymentStatus,
            eventdesk_database::CreateAssignmentRequest,
            eventdesk_database::UpdateAssignmentRequest,
            eventdesk_database::BudgetCategory,
            eventdesk_database::BudgetItem,
            eventdesk_database::BudgetItemStatus,
            eventdesk_database::BudgetSummary,
            eventdesk_database::CategorySummary,
            eventdesk_database::CreateBudgetCategoryRequest,
            eventdesk_database::UpdateBudgetCategoryRequest,
            eventdesk_database::CreateBudgetItemRequest,
            eventdesk_database::UpdateBudgetItemRequest,
            eventdesk_database::AgendaSession,
            eventdesk_database::SessionType,
            eventdesk_database::CreateSessionRequest,
            eventdesk_database::UpdateSessionRequest,
            eventdesk_database::Deadline,
            eventdesk_database::DeadlinePriority,
            eventdesk_database::DeadlineStatus,
            eventdesk_database::CreateDeadlineRequest,
            eventdesk_database::UpdateDeadlineRequest,
            eventdesk_database::Communication,
            eventdesk_database::Channel,
            eventdesk_database::Audience,
            eventdesk_database::CommunicationStatus,
            eventdesk_database::CreateCommunicationRequest,
            eventdesk_database::UpdateCommunicationRequest,
            eventdesk_database::EmailTemplate,
            eventdesk_database::RenderedTemplate,
            eventdesk_database::CreateEmailTemplateRequest,
            eventdesk_database::UpdateEmailTemplateRequest,
            eventdesk_database::FileRecord,
            eventdesk_database::CreateFileRequest,
        )
    ),
    tags(
        (name = "Health", description = "Service health endpoints"),
        (name = "Events", description = "Events and their dashboard overview"),
        (name = "Participants", description = "Registrations, waitlist and check-in"),
        (name = "Speakers", description = "Speaker management"),
        (name = "Sponsors", description = "Sponsor management"),
        (name = "Staff", description = "Staff directory"),
        (name = "Assignments", description = "Staff assignments and payments"),
        (name = "Budget", description = "Budget categories, items and totals"),
        (name = "Agenda", description = "Agenda sessions"),
        (name = "Deadlines", description = "Event deadlines"),
        (name = "Communications", description = "Outgoing communications"),
        (name = "Email templates", description = "Reusable email templates"),
        (name = "Files", description = "File records attached to events")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        let schemes = &mut components.security_schemes;

        let mut scheme = SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer));
        if let SecurityScheme::Http(http) = &mut scheme {
            http.bearer_format = Some("Bearer".to_string());
        }

        schemes.insert("bearerAuth".to_string(), scheme);
    }
}
