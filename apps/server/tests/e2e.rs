use axum::{
    body::Body,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method, Request, StatusCode,
    },
    Router,
};
use eventdesk_api::{build_router, AppState};
use eventdesk_config::AppConfig;
use eventdesk_runtime::BackendServices;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::ServiceExt;

const TEST_TOKEN: &str = "test-token";

struct TestApp {
    router: Router,
    pool: SqlitePool,
    _db_dir: TempDir,
}

struct TestResponse {
    status: StatusCode,
    body: Value,
}

impl TestApp {
    async fn new() -> Self {
        let db_dir = TempDir::new().expect("create temp dir");
        let db_path = db_dir.path().join("eventdesk-test.db");

        let mut config = AppConfig::default();
        config.database.url = format!("sqlite://{}", db_path.to_string_lossy());
        config.database.max_connections = 5;
        config.auth.api_tokens = vec![TEST_TOKEN.to_string()];

        let services = BackendServices::initialise(&config)
            .await
            .expect("initialise backend services");

        let state = AppState::new(services.db_pool.clone(), config.auth.clone(), &config.cache);

        Self {
            router: build_router(state),
            pool: services.db_pool.clone(),
            _db_dir: db_dir,
        }
    }

    async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let app = self.router.clone();
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        let body = if let Some(json_body) = body {
            let bytes = serde_json::to_vec(&json_body).expect("serialize request body");
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(bytes)
        } else {
            Body::empty()
        };

        let response = app
            .oneshot(builder.body(body).expect("build request"))
            .await
            .expect("router response");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("collect body")
            .to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };

        TestResponse { status, body }
    }

    async fn authed(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        self.request(method, uri, body, Some(TEST_TOKEN)).await
    }
}

fn id_of(value: &Value) -> String {
    value["id"].as_str().expect("id present").to_string()
}

#[tokio::test]
async fn health_is_public_and_api_requires_token() {
    let app = TestApp::new().await;

    let health = app.request(Method::GET, "/health", None, None).await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.body["database"], "ok");

    let denied = app.request(Method::GET, "/api/events", None, None).await;
    assert_eq!(denied.status, StatusCode::UNAUTHORIZED);
    assert_eq!(denied.body["error"], "missing authorization header");

    let wrong = app
        .request(Method::GET, "/api/events", None, Some("other-token"))
        .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);

    let allowed = app.authed(Method::GET, "/api/events", None).await;
    assert_eq!(allowed.status, StatusCode::OK);
    assert_eq!(allowed.body["events"], json!([]));
}

#[tokio::test]
async fn planning_an_event_end_to_end() {
    let app = TestApp::new().await;

    let created = app
        .authed(
            Method::POST,
            "/api/events",
            Some(json!({
                "name": "Systems Summit",
                "venue": "Dock 5",
                "start_date": "2099-04-01",
                "end_date": "2099-04-02",
                "capacity": 2,
                "budget_cents": 200_000,
                "status": "upcoming"
            })),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let event_id = id_of(&created.body["event"]);

    for (name, email) in [
        ("Ada", "ada@example.com"),
        ("Grace", "grace@example.com"),
        ("Alan", "alan@example.com"),
    ] {
        let registered = app
            .authed(
                Method::POST,
                &format!("/api/events/{event_id}/participants"),
                Some(json!({ "name": name, "email": email })),
            )
            .await;
        assert_eq!(registered.status, StatusCode::CREATED);
    }

    let speaker = app
        .authed(
            Method::POST,
            &format!("/api/events/{event_id}/speakers"),
            Some(json!({ "name": "Barbara", "status": "confirmed" })),
        )
        .await;
    assert_eq!(speaker.status, StatusCode::CREATED);
    let speaker_id = id_of(&speaker.body["speaker"]);

    let session = app
        .authed(
            Method::POST,
            &format!("/api/events/{event_id}/sessions"),
            Some(json!({
                "title": "Keynote",
                "session_type": "keynote",
                "starts_at": "2099-04-01T09:00:00Z",
                "ends_at": "2099-04-01T10:00:00Z",
                "location": "Main stage",
                "speaker_id": speaker_id
            })),
        )
        .await;
    assert_eq!(session.status, StatusCode::CREATED);

    let sponsor = app
        .authed(
            Method::POST,
            &format!("/api/events/{event_id}/sponsors"),
            Some(json!({
                "name": "Ferris Foundry",
                "tier": "gold",
                "contribution_cents": 75_000,
                "status": "paid"
            })),
        )
        .await;
    assert_eq!(sponsor.status, StatusCode::CREATED);

    let item = app
        .authed(
            Method::POST,
            &format!("/api/events/{event_id}/budget/items"),
            Some(json!({
                "description": "Stage rental",
                "planned_cents": 250_000,
                "status": "committed"
            })),
        )
        .await;
    assert_eq!(item.status, StatusCode::CREATED);

    let deadline = app
        .authed(
            Method::POST,
            &format!("/api/events/{event_id}/deadlines"),
            Some(json!({ "title": "Send speaker briefs", "due_date": "2099-03-20" })),
        )
        .await;
    assert_eq!(deadline.status, StatusCode::CREATED);
    assert_eq!(deadline.body["deadline"]["status"], "pending");

    let overview = app
        .authed(Method::GET, &format!("/api/events/{event_id}/overview"), None)
        .await;
    assert_eq!(overview.status, StatusCode::OK);
    let overview = &overview.body["overview"];
    assert_eq!(overview["effective_status"], "upcoming");
    assert_eq!(overview["participants"]["registered"], 2);
    assert_eq!(overview["participants"]["waitlisted"], 1);
    assert_eq!(overview["confirmed_speakers"], 1);
    assert_eq!(overview["sponsor_contributions_cents"], 75_000);
    assert_eq!(overview["session_count"], 1);
    assert_eq!(overview["budget"]["remaining_cents"], -50_000);
    assert_eq!(overview["budget"]["over_budget"], true);
    assert_eq!(overview["upcoming_deadlines"].as_array().map(Vec::len), Some(1));

    let deleted = app
        .authed(Method::DELETE, &format!("/api/events/{event_id}"), None)
        .await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let (participants,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM participants")
        .fetch_one(&app.pool)
        .await
        .expect("count participants");
    assert_eq!(participants, 0, "event deletion cascades to participants");

    let gone = app
        .authed(Method::GET, &format!("/api/events/{event_id}/overview"), None)
        .await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn staff_member_follows_assignments_across_events() {
    let app = TestApp::new().await;

    let staff = app
        .authed(
            Method::POST,
            "/api/staff",
            Some(json!({
                "name": "Sam Rivera",
                "email": "sam@example.com",
                "role": "Technician",
                "hourly_rate_cents": 4_000
            })),
        )
        .await;
    assert_eq!(staff.status, StatusCode::CREATED);
    let staff_id = id_of(&staff.body["staff"]);

    for (name, day) in [("Spring Meetup", "2099-03-01"), ("Autumn Meetup", "2099-09-01")] {
        let event = app
            .authed(
                Method::POST,
                "/api/events",
                Some(json!({ "name": name, "start_date": day, "end_date": day })),
            )
            .await;
        let event_id = id_of(&event.body["event"]);

        let assignment = app
            .authed(
                Method::POST,
                &format!("/api/events/{event_id}/assignments"),
                Some(json!({
                    "staff_id": staff_id,
                    "starts_at": format!("{day}T10:00:00Z"),
                    "ends_at": format!("{day}T12:30:00Z")
                })),
            )
            .await;
        assert_eq!(assignment.status, StatusCode::CREATED);
        assert_eq!(assignment.body["assignment"]["amount_due_cents"], 10_000);
        assert_eq!(assignment.body["assignment"]["payment_status"], "pending");
    }

    let listed = app
        .authed(Method::GET, &format!("/api/staff/{staff_id}/assignments"), None)
        .await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.body["assignments"].as_array().map(Vec::len), Some(2));

    let deactivated = app
        .authed(
            Method::PUT,
            &format!("/api/staff/{staff_id}"),
            Some(json!({ "active": false })),
        )
        .await;
    assert_eq!(deactivated.status, StatusCode::OK);

    let active_only = app.authed(Method::GET, "/api/staff?active=true", None).await;
    assert_eq!(active_only.body["staff"], json!([]));
}
