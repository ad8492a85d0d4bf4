use autopilot_app_lib::commands::{router, AppState};
use autopilot_app_lib::db::DbPool;
use autopilot_app_lib::services::plan_dispatcher::{DispatcherConfig, PlanDispatcher};
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value as JsonValue};
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

fn app() -> (TempDir, Router) {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("autopilot.sqlite")).expect("pool");
    let dispatcher = PlanDispatcher::new(None, DispatcherConfig::default());
    (dir, router(AppState::new(pool, dispatcher)))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, JsonValue) {
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let body = serde_json::from_slice(&bytes).expect("json body");
    (status, body)
}

fn post_json(uri: &str, body: &JsonValue) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

#[tokio::test]
async fn generate_returns_plan_and_meta() {
    let (_dir, app) = app();

    let (status, body) = send(
        &app,
        post_json(
            "/api/plans/generate",
            &json!({
                "mood": "motivated",
                "timeAvailable": "2",
                "energyLevel": "Medium",
                "priorityTasks": ["Write report", "Read book"]
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["meta"]["usedAI"], false);
    assert_eq!(body["meta"]["fallbackReason"], "no-credentials");

    let timeline = body["plan"]["timeline"].as_array().expect("timeline");
    assert_eq!(timeline.len(), 4);
    assert_eq!(timeline[0]["startTime"], "09:00");
    assert_eq!(timeline[0]["task"], "Write report");
    assert_eq!(timeline[0]["completed"], false);
    assert_eq!(timeline[3]["endTime"], "11:00");
    assert!(body["plan"]["greeting"].as_str().is_some_and(|g| !g.is_empty()));
}

#[tokio::test]
async fn generate_rejects_incomplete_input() {
    let (_dir, app) = app();

    let (status, body) = send(
        &app,
        post_json("/api/plans/generate", &json!({ "mood": "happy" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid input data");
    assert!(body["errors"].is_array());
}

#[tokio::test]
async fn generate_rejects_unparseable_body() {
    let (_dir, app) = app();

    let request = Request::builder()
        .method("POST")
        .uri("/api/plans/generate")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .expect("request");
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid input data");
}

#[tokio::test]
async fn saved_plans_are_listed_newest_first() {
    let (_dir, app) = app();

    for mood in ["tired", "focused"] {
        let (status, body) = send(
            &app,
            post_json(
                "/api/plans",
                &json!({
                    "mood": mood,
                    "timeAvailable": "full",
                    "energyLevel": "High",
                    "priorityTasks": ["Deep work"],
                    "planData": { "greeting": "Hi", "timeline": [], "motivationalTip": "Go" }
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["plan"]["mood"], mood);
        assert_eq!(body["plan"]["userId"], 1);
    }

    let (status, body) = send(&app, get("/api/plans")).await;
    assert_eq!(status, StatusCode::OK);
    let plans = body["plans"].as_array().expect("plans");
    assert_eq!(plans.len(), 2);
    assert_eq!(plans[0]["mood"], "focused");
    assert_eq!(plans[1]["mood"], "tired");
    assert_eq!(plans[0]["planData"]["motivationalTip"], "Go");
}

#[tokio::test]
async fn save_rejects_malformed_plan() {
    let (_dir, app) = app();

    let (status, body) = send(&app, post_json("/api/plans", &json!({ "mood": "ok" }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn current_user_omits_password() {
    let (_dir, app) = app();

    let (status, body) = send(&app, get("/api/me")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], 1);
    assert_eq!(body["user"]["username"], "demo");
    assert!(body["user"].get("password").is_none());
}

#[tokio::test]
async fn health_check_responds() {
    let (_dir, app) = app();
    let (status, body) = send(&app, get("/api/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], "OK");
}
