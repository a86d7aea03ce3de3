mod docs;
mod error;
mod state;
mod util;

pub mod routes;

pub use docs::ApiDoc;
pub use error::{ApiError, ErrorResponse};
pub use state::{AppState, ViewCache};

use axum::{
    http::header::{AUTHORIZATION, CONTENT_TYPE},
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health::health_check))
        // Event routes
        .route(
            "/api/events",
            get(routes::events::list_events).post(routes::events::create_event),
        )
        .route(
            "/api/events/:event_id",
            get(routes::events::get_event)
                .put(routes::events::update_event)
                .delete(routes::events::delete_event),
        )
        .route(
            "/api/events/:event_id/overview",
            get(routes::events::get_overview),
        )
        // Participant routes
        .route(
            "/api/events/:event_id/participants",
            get(routes::participants::list_participants)
                .post(routes::participants::register_participant),
        )
        .route(
            "/api/participants/:participant_id",
            get(routes::participants::get_participant)
                .put(routes::participants::update_participant)
                .delete(routes::participants::delete_participant),
        )
        .route(
            "/api/participants/:participant_id/check-in",
            post(routes::participants::check_in_participant),
        )
        // Speaker routes
        .route(
            "/api/events/:event_id/speakers",
            get(routes::speakers::list_speakers).post(routes::speakers::create_speaker),
        )
        .route(
            "/api/speakers/:speaker_id",
            get(routes::speakers::get_speaker)
                .put(routes::speakers::update_speaker)
                .delete(routes::speakers::delete_speaker),
        )
        // Sponsor routes
        .route(
            "/api/events/:event_id/sponsors",
            get(routes::sponsors::list_sponsors).post(routes::sponsors::create_sponsor),
        )
        .route(
            "/api/sponsors/:sponsor_id",
            get(routes::sponsors::get_sponsor)
                .put(routes::sponsors::update_sponsor)
                .delete(routes::sponsors::delete_sponsor),
        )
        // Staff routes
        .route(
            "/api/staff",
            get(routes::staff::list_staff).post(routes::staff::create_staff),
        )
        .route(
            "/api/staff/:staff_id",
            get(routes::staff::get_staff)
                .put(routes::staff::update_staff)
                .delete(routes::staff::delete_staff),
        )
        .route(
            "/api/staff/:staff_id/assignments",
            get(routes::staff::list_staff_assignments),
        )
        // Assignment routes
        .route(
            "/api/events/:event_id/assignments",
            get(routes::assignments::list_assignments)
                .post(routes::assignments::create_assignment),
        )
        .route(
            "/api/assignments/refresh-statuses",
            post(routes::assignments::refresh_statuses),
        )
        .route(
            "/api/assignments/:assignment_id",
            get(routes::assignments::get_assignment)
                .put(routes::assignments::update_assignment)
                .delete(routes::assignments::delete_assignment),
        )
        .route(
            "/api/assignments/:assignment_id/mark-paid",
            post(routes::assignments::mark_assignment_paid),
        )
        // Budget routes
        .route(
            "/api/events/:event_id/budget",
            get(routes::events::get_budget_summary),
        )
        .route(
            "/api/events/:event_id/budget/categories",
            get(routes::budget::list_categories).post(routes::budget::create_category),
        )
        .route(
            "/api/budget/categories/:category_id",
            put(routes::budget::update_category)
                .delete(routes::budget::delete_category),
        )
        .route(
            "/api/events/:event_id/budget/items",
            get(routes::budget::list_items).post(routes::budget::create_item),
        )
        .route(
            "/api/budget/items/:item_id",
            get(routes::budget::get_item)
                .put(routes::budget::update_item)
                .delete(routes::budget::delete_item),
        )
        // Agenda routes
        .route(
            "/api/events/:event_id/sessions",
            get(routes::agenda::list_sessions).post(routes::agenda::create_session),
        )
        .route(
            "/api/sessions/:session_id",
            get(routes::agenda::get_session)
                .put(routes::agenda::update_session)
                .delete(routes::agenda::delete_session),
        )
        // Deadline routes
        .route(
            "/api/events/:event_id/deadlines",
            get(routes::deadlines::list_deadlines).post(routes::deadlines::create_deadline),
        )
        .route(
            "/api/deadlines/:deadline_id",
            get(routes::deadlines::get_deadline)
                .put(routes::deadlines::update_deadline)
                .delete(routes::deadlines::delete_deadline),
        )
        .route(
            "/api/deadlines/:deadline_id/complete",
            post(routes::deadlines::complete_deadline),
        )
        // Communication routes
        .route(
            "/api/events/:event_id/communications",
            get(routes::communications::list_communications)
                .post(routes::communications::create_communication),
        )
        .route(
            "/api/communications/:communication_id",
            get(routes::communications::get_communication)
                .put(routes::communications::update_communication)
                .delete(routes::communications::delete_communication),
        )
        .route(
            "/api/communications/:communication_id/recipients",
            get(routes::communications::preview_recipients),
        )
        .route(
            "/api/communications/:communication_id/send",
            post(routes::communications::send_communication),
        )
        // Email template routes
        .route(
            "/api/email-templates",
            get(routes::templates::list_templates).post(routes::templates::create_template),
        )
        .route(
            "/api/email-templates/:template_id",
            get(routes::templates::get_template)
                .put(routes::templates::update_template)
                .delete(routes::templates::delete_template),
        )
        .route(
            "/api/email-templates/:template_id/preview",
            post(routes::templates::preview_template),
        )
        // File routes
        .route(
            "/api/events/:event_id/files",
            get(routes::files::list_files).post(routes::files::create_file),
        )
        .route(
            "/api/files/:file_id",
            get(routes::files::get_file).delete(routes::files::delete_file),
        )
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::PATCH,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
}
