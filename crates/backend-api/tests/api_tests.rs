use http_body_util::BodyExt;
use std::str::FromStr;

use axum::{
    body::Body,
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_REQUEST_HEADERS,
            ACCESS_CONTROL_REQUEST_METHOD, AUTHORIZATION, CONTENT_TYPE, ORIGIN,
        },
        Method, Request, StatusCode,
    },
    response::{IntoResponse, Response},
    Router,
};
use eventdesk_api::{build_router, ApiError, AppState};
use eventdesk_config::AppConfig;
use serde_json::{json, Value};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use tempfile::TempDir;
use tower::ServiceExt;

type TestResult<T = ()> = anyhow::Result<T>;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");

struct TestContext {
    _temp_dir: TempDir,
    pool: SqlitePool,
    state: AppState,
}

impl TestContext {
    async fn new() -> TestResult<Self> {
        Self::with_config(AppConfig::default()).await
    }

    async fn with_tokens(tokens: &[&str]) -> TestResult<Self> {
        let mut config = AppConfig::default();
        config.auth.api_tokens = tokens.iter().map(|t| t.to_string()).collect();
        Self::with_config(config).await
    }

    async fn with_config(config: AppConfig) -> TestResult<Self> {
        let temp_dir = TempDir::new()?;
        let db_path = temp_dir.path().join("eventdesk_api.sqlite");
        let db_url = format!("sqlite://{}", db_path.display());

        let mut options = SqliteConnectOptions::from_str(&db_url)?;
        options = options.create_if_missing(true);
        options = options.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        MIGRATOR.run(&pool).await?;

        let state = AppState::new(pool.clone(), config.auth.clone(), &config.cache);

        Ok(Self {
            _temp_dir: temp_dir,
            pool,
            state,
        })
    }

    fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> TestResult<Response> {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body)?))?,
            None => builder.body(Body::empty())?,
        };
        Ok(self.router().oneshot(request).await?)
    }

    async fn send_json(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> TestResult<(StatusCode, Value)> {
        let response = self.send(method, uri, body).await?;
        let status = response.status();
        Ok((status, read_json(response).await?))
    }

    async fn create_event(&self, body: Value) -> TestResult<String> {
        let (status, payload) = self.send_json(Method::POST, "/api/events", Some(body)).await?;
        assert_eq!(status, StatusCode::CREATED, "unexpected body {payload}");
        Ok(payload["event"]["id"].as_str().unwrap_or_default().to_string())
    }
}

async fn read_json(response: Response) -> TestResult<Value> {
    let body = response.into_body().collect().await?.to_bytes();
    if body.is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_slice(&body)?)
}

fn conference() -> Value {
    json!({
        "name": "RustConf",
        "venue": "Harbour Centre",
        "start_date": "2099-06-10",
        "end_date": "2099-06-12",
        "capacity": 1,
        "budget_cents": 1_000_000,
        "status": "upcoming"
    })
}

fn attendee(name: &str, email: &str) -> Value {
    json!({ "name": name, "email": email })
}

mod router_tests {
    use super::*;

    #[tokio::test]
    async fn health_reports_database_status() -> TestResult {
        let ctx = TestContext::new().await?;
        let (status, payload) = ctx.send_json(Method::GET, "/health", None).await?;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["status"], "ok");
        assert_eq!(payload["database"], "ok");

        Ok(())
    }

    #[tokio::test]
    async fn openapi_document_lists_event_routes() -> TestResult {
        let ctx = TestContext::new().await?;
        let response = ctx.send(Method::GET, "/api-docs/openapi.json", None).await?;

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_owned();
        assert!(
            content_type.contains("application/json"),
            "expected OpenAPI JSON content-type, got {}",
            content_type
        );

        let payload = read_json(response).await?;
        assert!(payload["paths"]["/api/events"].is_object());
        assert!(payload["paths"]["/api/events/{event_id}/overview"].is_object());
        assert!(payload["components"]["securitySchemes"]["bearerAuth"].is_object());

        Ok(())
    }

    #[tokio::test]
    async fn cors_layer_allows_configured_methods_and_headers() -> TestResult {
        let ctx = TestContext::new().await?;
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/events")
            .header(ORIGIN, "https://example.com")
            .header(ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(ACCESS_CONTROL_REQUEST_HEADERS, "authorization, content-type")
            .body(Body::empty())?;

        let response = ctx.router().oneshot(request).await?;
        let status = response.status();
        assert!(
            matches!(status, StatusCode::NO_CONTENT | StatusCode::OK),
            "expected CORS preflight to return 204 or 200, got {}",
            status
        );

        let header = |name| {
            response
                .headers()
                .get(name)
                .and_then(|value| value.to_str().ok())
                .unwrap_or_default()
                .to_ascii_lowercase()
        };
        assert_eq!(header(ACCESS_CONTROL_ALLOW_ORIGIN), "*");
        let allow_methods = header(ACCESS_CONTROL_ALLOW_METHODS);
        assert!(allow_methods.contains("post") && allow_methods.contains("delete"));
        let allow_headers = header(ACCESS_CONTROL_ALLOW_HEADERS);
        assert!(allow_headers.contains("authorization") && allow_headers.contains("content-type"));

        Ok(())
    }
}

mod auth_tests {
    use super::*;

    fn events_request(authorization: Option<&str>) -> TestResult<Request<Body>> {
        let mut builder = Request::builder().uri("/api/events");
        if let Some(value) = authorization {
            builder = builder.header(AUTHORIZATION, value);
        }
        Ok(builder.body(Body::empty())?)
    }

    #[tokio::test]
    async fn configured_tokens_are_required() -> TestResult {
        let ctx = TestContext::with_tokens(&["desk-token"]).await?;

        let response = ctx.router().oneshot(events_request(None)?).await?;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(read_json(response).await?["error"], "missing authorization header");

        let response = ctx
            .router()
            .oneshot(events_request(Some("Bearer nope"))?)
            .await?;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(read_json(response).await?["error"], "invalid bearer token");

        let response = ctx
            .router()
            .oneshot(events_request(Some("bearer desk-token"))?)
            .await?;
        assert_eq!(response.status(), StatusCode::OK);

        Ok(())
    }

    #[tokio::test]
    async fn health_stays_open_when_tokens_are_configured() -> TestResult {
        let ctx = TestContext::with_tokens(&["desk-token"]).await?;
        let response = ctx.send(Method::GET, "/health", None).await?;
        assert_eq!(response.status(), StatusCode::OK);
        Ok(())
    }
}

mod error_handling_tests {
    use super::*;

    #[tokio::test]
    async fn api_error_into_response_sets_status_and_body() -> TestResult {
        let response = ApiError::bad_request("missing payload").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let payload = read_json(response).await?;
        assert_eq!(payload["error"], "missing payload");
        assert!(payload.get("field_errors").is_none());

        Ok(())
    }

    #[tokio::test]
    async fn malformed_json_is_a_bad_request() -> TestResult {
        let ctx = TestContext::new().await?;
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/events")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from("{\"name\": "))?;

        let response = ctx.router().oneshot(request).await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let payload = read_json(response).await?;
        assert!(payload["error"].is_string());

        Ok(())
    }

    #[tokio::test]
    async fn unknown_enum_in_query_is_a_bad_request() -> TestResult {
        let ctx = TestContext::new().await?;
        let (status, payload) = ctx
            .send_json(Method::GET, "/api/events?status=postponed", None)
            .await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(payload["error"].is_string());
        Ok(())
    }
}

mod event_route_tests {
    use super::*;

    #[tokio::test]
    async fn event_crud_round_trip() -> TestResult {
        let ctx = TestContext::new().await?;
        let event_id = ctx.create_event(conference()).await?;

        let (status, payload) = ctx
            .send_json(Method::GET, &format!("/api/events/{event_id}"), None)
            .await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["event"]["name"], "RustConf");
        assert_eq!(payload["event"]["status"], "upcoming");
        assert_eq!(payload["event"]["effective_status"], "upcoming");

        let (status, payload) = ctx
            .send_json(
                Method::PUT,
                &format!("/api/events/{event_id}"),
                Some(json!({ "venue": "Pier 9" })),
            )
            .await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["event"]["venue"], "Pier 9");
        assert_eq!(payload["event"]["name"], "RustConf");

        let (status, payload) = ctx
            .send_json(Method::GET, "/api/events?search=pier", None)
            .await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["events"].as_array().map(Vec::len), Some(1));

        let response = ctx
            .send(Method::DELETE, &format!("/api/events/{event_id}"), None)
            .await?;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let (status, payload) = ctx
            .send_json(Method::GET, &format!("/api/events/{event_id}"), None)
            .await?;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(payload["error"], "Event not found");

        Ok(())
    }

    #[tokio::test]
    async fn null_clears_optional_event_fields() -> TestResult {
        let ctx = TestContext::new().await?;
        let event_id = ctx.create_event(conference()).await?;

        let (status, payload) = ctx
            .send_json(
                Method::PUT,
                &format!("/api/events/{event_id}"),
                Some(json!({ "capacity": null, "venue": null })),
            )
            .await?;
        assert_eq!(status, StatusCode::OK, "unexpected body {payload}");
        assert_eq!(payload["event"]["capacity"], Value::Null);
        assert_eq!(payload["event"]["venue"], Value::Null);
        assert_eq!(payload["event"]["budget_cents"], 1_000_000);

        let (status, payload) = ctx
            .send_json(
                Method::PUT,
                &format!("/api/events/{event_id}"),
                Some(json!({ "budget_cents": i64::MAX })),
            )
            .await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(payload["field_errors"]["budget_cents"].is_array());

        Ok(())
    }

    #[tokio::test]
    async fn status_filter_uses_the_status_for_today() -> TestResult {
        let ctx = TestContext::new().await?;
        ctx.create_event(conference()).await?;
        let past_id = ctx
            .create_event(json!({
                "name": "Retro Meetup",
                "start_date": "2020-01-01",
                "end_date": "2020-01-02",
                "status": "upcoming"
            }))
            .await?;

        let (status, payload) = ctx
            .send_json(Method::GET, "/api/events?status=completed", None)
            .await?;
        assert_eq!(status, StatusCode::OK);
        let events = payload["events"].as_array().cloned().unwrap_or_default();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0]["id"], past_id.as_str());
        assert_eq!(events[0]["status"], "upcoming");
        assert_eq!(events[0]["effective_status"], "completed");

        let (_, payload) = ctx
            .send_json(Method::GET, "/api/events?status=upcoming", None)
            .await?;
        assert_eq!(payload["events"].as_array().map(Vec::len), Some(1));
        assert_eq!(payload["events"][0]["name"], "RustConf");

        Ok(())
    }

    #[tokio::test]
    async fn invalid_event_reports_every_field() -> TestResult {
        let ctx = TestContext::new().await?;
        let (status, payload) = ctx
            .send_json(
                Method::POST,
                "/api/events",
                Some(json!({
                    "name": "  ",
                    "start_date": "2099-06-12",
                    "end_date": "2099-06-10",
                    "capacity": 0
                })),
            )
            .await?;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(payload["error"], "validation failed");
        let fields = payload["field_errors"]
            .as_object()
            .map(|map| map.keys().cloned().collect::<Vec<_>>())
            .unwrap_or_default();
        assert_eq!(fields, vec!["capacity", "end_date", "name"]);

        Ok(())
    }

    #[tokio::test]
    async fn nested_routes_require_an_existing_event() -> TestResult {
        let ctx = TestContext::new().await?;
        let (status, _) = ctx
            .send_json(Method::GET, "/api/events/missing/participants", None)
            .await?;
        assert_eq!(status, StatusCode::NOT_FOUND);
        Ok(())
    }
}

mod participant_route_tests {
    use super::*;

    #[tokio::test]
    async fn registrations_beyond_capacity_are_waitlisted() -> TestResult {
        let ctx = TestContext::new().await?;
        let event_id = ctx.create_event(conference()).await?;
        let uri = format!("/api/events/{event_id}/participants");

        let (status, first) = ctx
            .send_json(Method::POST, &uri, Some(attendee("Ada", "ada@example.com")))
            .await?;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(first["participant"]["status"], "registered");

        let (status, second) = ctx
            .send_json(Method::POST, &uri, Some(attendee("Grace", "grace@example.com")))
            .await?;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(second["participant"]["status"], "waitlisted");

        let (status, duplicate) = ctx
            .send_json(Method::POST, &uri, Some(attendee("Ada L.", "ADA@example.com")))
            .await?;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(duplicate["error"].is_string());

        let waitlisted_id = second["participant"]["id"].as_str().unwrap_or_default();
        let (status, payload) = ctx
            .send_json(
                Method::POST,
                &format!("/api/participants/{waitlisted_id}/check-in"),
                None,
            )
            .await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(payload["field_errors"]["status"].is_array());

        let registered_id = first["participant"]["id"].as_str().unwrap_or_default();
        let (status, payload) = ctx
            .send_json(
                Method::POST,
                &format!("/api/participants/{registered_id}/check-in"),
                None,
            )
            .await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["participant"]["status"], "attended");

        let (status, payload) = ctx
            .send_json(Method::GET, &format!("{uri}?status=waitlisted"), None)
            .await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["participants"].as_array().map(Vec::len), Some(1));

        Ok(())
    }
}

mod overview_route_tests {
    use super::*;
    use eventdesk_database::{CreateParticipantRequest, EventRepository, ParticipantRepository};

    #[tokio::test]
    async fn overview_is_cached_until_a_mutation_revalidates_it() -> TestResult {
        let ctx = TestContext::new().await?;
        let mut event = conference();
        event["capacity"] = json!(100);
        let event_id = ctx.create_event(event).await?;
        let overview_uri = format!("/api/events/{event_id}/overview");

        let (status, payload) = ctx.send_json(Method::GET, &overview_uri, None).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["overview"]["participants"]["total"], 0);
        assert_eq!(payload["overview"]["effective_status"], "upcoming");

        // written behind the API's back, so the cached view stays stale
        let stored = EventRepository::new(ctx.pool().clone()).get(&event_id).await?;
        ParticipantRepository::new(ctx.pool().clone())
            .register(
                &stored,
                CreateParticipantRequest {
                    name: "Linus".into(),
                    email: "linus@example.com".into(),
                    phone: None,
                    company: None,
                    ticket_type: None,
                    status: None,
                    notes: None,
                },
            )
            .await?;
        let (_, payload) = ctx.send_json(Method::GET, &overview_uri, None).await?;
        assert_eq!(payload["overview"]["participants"]["total"], 0);

        let (status, _) = ctx
            .send_json(
                Method::POST,
                &format!("/api/events/{event_id}/participants"),
                Some(attendee("Ada", "ada@example.com")),
            )
            .await?;
        assert_eq!(status, StatusCode::CREATED);

        let (_, payload) = ctx.send_json(Method::GET, &overview_uri, None).await?;
        assert_eq!(payload["overview"]["participants"]["total"], 2);
        assert_eq!(payload["overview"]["participants"]["registered"], 2);

        Ok(())
    }

    #[tokio::test]
    async fn communication_and_file_writes_revalidate_the_overview() -> TestResult {
        let ctx = TestContext::new().await?;
        let mut event = conference();
        event["capacity"] = json!(100);
        let event_id = ctx.create_event(event).await?;
        let overview_uri = format!("/api/events/{event_id}/overview");
        let stored = EventRepository::new(ctx.pool().clone()).get(&event_id).await?;
        let participants = ParticipantRepository::new(ctx.pool().clone());

        let register = |name: &str, email: &str| CreateParticipantRequest {
            name: name.into(),
            email: email.into(),
            phone: None,
            company: None,
            ticket_type: None,
            status: None,
            notes: None,
        };

        ctx.send_json(Method::GET, &overview_uri, None).await?;
        participants
            .register(&stored, register("Linus", "linus@example.com"))
            .await?;

        let (status, _) = ctx
            .send_json(
                Method::POST,
                &format!("/api/events/{event_id}/communications"),
                Some(json!({ "subject": "Doors open", "body": "At nine." })),
            )
            .await?;
        assert_eq!(status, StatusCode::CREATED);
        let (_, payload) = ctx.send_json(Method::GET, &overview_uri, None).await?;
        assert_eq!(payload["overview"]["participants"]["total"], 1);

        participants
            .register(&stored, register("Ken", "ken@example.com"))
            .await?;
        let (status, file) = ctx
            .send_json(
                Method::POST,
                &format!("/api/events/{event_id}/files"),
                Some(json!({ "name": "floorplan.pdf", "url": "https://cdn.example.com/floorplan.pdf" })),
            )
            .await?;
        assert_eq!(status, StatusCode::CREATED);
        let (_, payload) = ctx.send_json(Method::GET, &overview_uri, None).await?;
        assert_eq!(payload["overview"]["participants"]["total"], 2);

        participants
            .register(&stored, register("Barbara", "barbara@example.com"))
            .await?;
        let file_id = file["file"]["id"].as_str().unwrap_or_default();
        let response = ctx
            .send(Method::DELETE, &format!("/api/files/{file_id}"), None)
            .await?;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let (_, payload) = ctx.send_json(Method::GET, &overview_uri, None).await?;
        assert_eq!(payload["overview"]["participants"]["total"], 3);

        Ok(())
    }
}

mod budget_route_tests {
    use super::*;

    #[tokio::test]
    async fn budget_summary_aggregates_items() -> TestResult {
        let ctx = TestContext::new().await?;
        let event_id = ctx.create_event(conference()).await?;

        let (status, category) = ctx
            .send_json(
                Method::POST,
                &format!("/api/events/{event_id}/budget/categories"),
                Some(json!({ "name": "Venue", "allocated_cents": 500_000 })),
            )
            .await?;
        assert_eq!(status, StatusCode::CREATED);
        let category_id = category["category"]["id"].as_str().unwrap_or_default().to_string();

        let items_uri = format!("/api/events/{event_id}/budget/items");
        for item in [
            json!({
                "category_id": category_id,
                "description": "Hall rental",
                "planned_cents": 300_000,
                "status": "committed"
            }),
            json!({
                "description": "Badges",
                "planned_cents": 100_000,
                "actual_cents": 120_000,
                "status": "paid"
            }),
            json!({
                "description": "Fireworks",
                "planned_cents": 50_000,
                "status": "cancelled"
            }),
        ] {
            let (status, payload) = ctx.send_json(Method::POST, &items_uri, Some(item)).await?;
            assert_eq!(status, StatusCode::CREATED, "unexpected body {payload}");
        }

        let (status, payload) = ctx
            .send_json(Method::GET, &format!("/api/events/{event_id}/budget"), None)
            .await?;
        assert_eq!(status, StatusCode::OK);
        let budget = &payload["budget"];
        assert_eq!(budget["planned_cents"], 400_000);
        assert_eq!(budget["committed_cents"], 300_000);
        assert_eq!(budget["paid_cents"], 120_000);
        assert_eq!(budget["spent_cents"], 420_000);
        assert_eq!(budget["remaining_cents"], 580_000);
        assert_eq!(budget["over_budget"], false);

        let categories = budget["categories"].as_array().cloned().unwrap_or_default();
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0]["name"], "Venue");
        assert_eq!(categories[0]["planned_cents"], 300_000);
        assert_eq!(categories[1]["name"], "Uncategorised");
        assert_eq!(categories[1]["actual_cents"], 120_000);

        Ok(())
    }

    #[tokio::test]
    async fn category_of_another_event_is_rejected() -> TestResult {
        let ctx = TestContext::new().await?;
        let first = ctx.create_event(conference()).await?;
        let second = ctx.create_event(conference()).await?;

        let (_, category) = ctx
            .send_json(
                Method::POST,
                &format!("/api/events/{first}/budget/categories"),
                Some(json!({ "name": "Catering" })),
            )
            .await?;
        let category_id = category["category"]["id"].clone();

        let (status, payload) = ctx
            .send_json(
                Method::POST,
                &format!("/api/events/{second}/budget/items"),
                Some(json!({
                    "category_id": category_id,
                    "description": "Lunch",
                    "planned_cents": 10_000
                })),
            )
            .await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(payload["field_errors"]["category_id"].is_array());

        Ok(())
    }
}

mod assignment_route_tests {
    use super::*;

    #[tokio::test]
    async fn past_assignment_is_overdue_until_paid() -> TestResult {
        let ctx = TestContext::new().await?;
        let event_id = ctx.create_event(conference()).await?;

        let (status, staff) = ctx
            .send_json(
                Method::POST,
                "/api/staff",
                Some(json!({
                    "name": "Sam Rivera",
                    "email": "sam@example.com",
                    "role": "Stage manager",
                    "hourly_rate_cents": 2_500
                })),
            )
            .await?;
        assert_eq!(status, StatusCode::CREATED);
        let staff_id = staff["staff"]["id"].clone();

        let (status, created) = ctx
            .send_json(
                Method::POST,
                &format!("/api/events/{event_id}/assignments"),
                Some(json!({
                    "staff_id": staff_id,
                    "starts_at": "2020-01-01T09:00:00Z",
                    "ends_at": "2020-01-01T13:00:00Z",
                    "payment_terms": "net7"
                })),
            )
            .await?;
        assert_eq!(status, StatusCode::CREATED, "unexpected body {created}");
        let assignment = &created["assignment"];
        assert_eq!(assignment["role"], "Stage manager");
        assert_eq!(assignment["rate_cents"], 2_500);
        assert_eq!(assignment["amount_due_cents"], 10_000);
        assert_eq!(assignment["due_date"], "2020-01-08");
        assert_eq!(assignment["payment_status"], "overdue");

        let (_, listing) = ctx
            .send_json(Method::GET, &format!("/api/events/{event_id}/assignments"), None)
            .await?;
        assert_eq!(listing["costs"]["overdue_cents"], 10_000);

        let assignment_id = assignment["id"].as_str().unwrap_or_default();
        let (status, paid) = ctx
            .send_json(
                Method::POST,
                &format!("/api/assignments/{assignment_id}/mark-paid"),
                None,
            )
            .await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(paid["assignment"]["payment_status"], "paid");
        assert!(paid["assignment"]["paid_at"].is_string());

        let (status, _) = ctx
            .send_json(
                Method::POST,
                &format!("/api/assignments/{assignment_id}/mark-paid"),
                None,
            )
            .await?;
        assert_eq!(status, StatusCode::CONFLICT);

        let (_, listing) = ctx
            .send_json(Method::GET, &format!("/api/events/{event_id}/assignments"), None)
            .await?;
        assert_eq!(listing["costs"]["paid_cents"], 10_000);
        assert_eq!(listing["costs"]["overdue_cents"], 0);

        Ok(())
    }

    #[tokio::test]
    async fn refresh_persists_overdue_status() -> TestResult {
        let ctx = TestContext::new().await?;
        let event_id = ctx.create_event(conference()).await?;
        let (_, staff) = ctx
            .send_json(
                Method::POST,
                "/api/staff",
                Some(json!({ "name": "Kim", "email": "kim@example.com", "role": "Usher" })),
            )
            .await?;
        ctx.send_json(
            Method::POST,
            &format!("/api/events/{event_id}/assignments"),
            Some(json!({
                "staff_id": staff["staff"]["id"],
                "starts_at": "2020-03-01T08:00:00Z",
                "ends_at": "2020-03-01T16:00:00Z",
                "rate_type": "flat",
                "rate_cents": 40_000,
                "payment_terms": "immediate"
            })),
        )
        .await?;

        let (status, payload) = ctx
            .send_json(Method::POST, "/api/assignments/refresh-statuses", None)
            .await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["updated"], 1);

        let (stored,): (String,) =
            sqlx::query_as("SELECT payment_status FROM staff_assignments LIMIT 1")
                .fetch_one(ctx.pool())
                .await?;
        assert_eq!(stored, "overdue");

        Ok(())
    }
}

mod communication_route_tests {
    use super::*;

    #[tokio::test]
    async fn template_backed_communication_is_sent_once() -> TestResult {
        let ctx = TestContext::new().await?;
        let mut event = conference();
        event["capacity"] = json!(10);
        let event_id = ctx.create_event(event).await?;

        for (name, email) in [("Ada", "ada@example.com"), ("Grace", "Grace@Example.com ")] {
            ctx.send_json(
                Method::POST,
                &format!("/api/events/{event_id}/participants"),
                Some(attendee(name, email)),
            )
            .await?;
        }

        let (status, template) = ctx
            .send_json(
                Method::POST,
                "/api/email-templates",
                Some(json!({
                    "name": "Reminder",
                    "subject": "{{event_name}} starts soon",
                    "body": "See you at {{ event_venue }}."
                })),
            )
            .await?;
        assert_eq!(status, StatusCode::CREATED);

        let (status, created) = ctx
            .send_json(
                Method::POST,
                &format!("/api/events/{event_id}/communications"),
                Some(json!({
                    "template_id": template["template"]["id"],
                    "audience": "participants"
                })),
            )
            .await?;
        assert_eq!(status, StatusCode::CREATED, "unexpected body {created}");
        assert_eq!(created["communication"]["subject"], "RustConf starts soon");
        assert_eq!(created["communication"]["body"], "See you at Harbour Centre.");
        assert_eq!(created["communication"]["status"], "draft");

        let id = created["communication"]["id"].as_str().unwrap_or_default();
        let (_, recipients) = ctx
            .send_json(Method::GET, &format!("/api/communications/{id}/recipients"), None)
            .await?;
        assert_eq!(
            recipients["recipients"],
            json!(["ada@example.com", "grace@example.com"])
        );

        let (status, sent) = ctx
            .send_json(Method::POST, &format!("/api/communications/{id}/send"), None)
            .await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(sent["communication"]["status"], "sent");
        assert_eq!(sent["communication"]["recipient_count"], 2);

        let (status, _) = ctx
            .send_json(Method::POST, &format!("/api/communications/{id}/send"), None)
            .await?;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = ctx
            .send_json(
                Method::PUT,
                &format!("/api/communications/{id}"),
                Some(json!({ "subject": "Changed" })),
            )
            .await?;
        assert_eq!(status, StatusCode::CONFLICT);

        Ok(())
    }

    #[tokio::test]
    async fn template_preview_reports_missing_variables() -> TestResult {
        let ctx = TestContext::new().await?;
        let (_, template) = ctx
            .send_json(
                Method::POST,
                "/api/email-templates",
                Some(json!({
                    "name": "Welcome",
                    "subject": "Hi {{first_name}}",
                    "body": "Welcome to {{event_name}}"
                })),
            )
            .await?;
        let id = template["template"]["id"].as_str().unwrap_or_default();

        let (status, payload) = ctx
            .send_json(
                Method::POST,
                &format!("/api/email-templates/{id}/preview"),
                Some(json!({ "variables": { "first_name": "Ada" } })),
            )
            .await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["preview"]["subject"], "Hi Ada");
        assert_eq!(payload["preview"]["missing_variables"], json!(["event_name"]));

        Ok(())
    }
}

mod agenda_route_tests {
    use super::*;

    #[tokio::test]
    async fn overlapping_sessions_in_one_room_are_rejected() -> TestResult {
        let ctx = TestContext::new().await?;
        let event_id = ctx.create_event(conference()).await?;
        let uri = format!("/api/events/{event_id}/sessions");

        let (status, _) = ctx
            .send_json(
                Method::POST,
                &uri,
                Some(json!({
                    "title": "Keynote",
                    "starts_at": "2099-06-10T09:00:00Z",
                    "ends_at": "2099-06-10T10:00:00Z",
                    "location": "Room A"
                })),
            )
            .await?;
        assert_eq!(status, StatusCode::CREATED);

        let (status, payload) = ctx
            .send_json(
                Method::POST,
                &uri,
                Some(json!({
                    "title": "Workshop",
                    "starts_at": "2099-06-10T09:30:00Z",
                    "ends_at": "2099-06-10T11:00:00Z",
                    "location": "Room A"
                })),
            )
            .await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(payload["field_errors"]["starts_at"].is_array());

        let (status, _) = ctx
            .send_json(
                Method::POST,
                &uri,
                Some(json!({
                    "title": "Workshop",
                    "starts_at": "2099-06-10T09:30:00Z",
                    "ends_at": "2099-06-10T11:00:00Z",
                    "location": "Room B"
                })),
            )
            .await?;
        assert_eq!(status, StatusCode::CREATED);

        Ok(())
    }
}
