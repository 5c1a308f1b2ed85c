use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use spycat_core::{
    open_db_in_memory, Breed, BreedError, BreedSource, CachedBreedCatalog, StaticBreedSource,
};
use spycat_server::{router, AppState};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower::ServiceExt;

fn app() -> Router {
    let conn = open_db_in_memory().unwrap();
    let catalog = CachedBreedCatalog::new(StaticBreedSource::from_names([
        "Abyssinian",
        "Bengal",
        "Siamese",
    ]));
    router(Arc::new(AppState::new(conn, Arc::new(catalog))))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_cat(app: &Router, name: &str) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/agency/cats",
        Some(json!({
            "name": name,
            "years_of_experience": 4,
            "breed": "Bengal",
            "salary": 60000.0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_i64().unwrap()
}

async fn create_mission(app: &Router, targets: &[&str]) -> Value {
    let targets: Vec<Value> = targets
        .iter()
        .map(|name| json!({ "name": name, "country": "Monaco" }))
        .collect();
    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/agency/missions",
        Some(json!({
            "name": "Operation Goldfish",
            "description": "Recover the stolen fish",
            "targets": targets
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

fn status_uri(cat_id: i64, target_id: i64) -> String {
    format!("/api/v1/spy-cats/{cat_id}/mission/targets/{target_id}/status")
}

#[tokio::test]
async fn health_reports_healthy() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn cat_crud_round_trip() {
    let app = app();
    let cat_id = create_cat(&app, "Felix").await;

    let (status, body) = send(&app, Method::GET, &format!("/api/v1/cats/{cat_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Felix");
    assert!(body.get("mission_id").is_none());

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/agency/cats/{cat_id}/salary"),
        Some(json!({ "salary": 75000.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["salary"], 75000.0);

    let (status, body) = send(&app, Method::GET, "/api/v1/cats?limit=5", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["limit"], 5);
    assert_eq!(body["breeds"].as_array().unwrap().len(), 3);

    let (status, _) = send(&app, Method::DELETE, &format!("/api/v1/agency/cats/{cat_id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, body) = send(&app, Method::GET, &format!("/api/v1/cats/{cat_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn invalid_cat_input_is_bad_request() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/agency/cats",
        Some(json!({
            "name": "Felix",
            "years_of_experience": 1,
            "breed": "Dragon",
            "salary": 1.0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let (status, _) = send(&app, Method::GET, "/api/v1/cats?limit=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(&app, Method::GET, "/api/v1/cats/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(&app, Method::GET, "/api/v1/cats/0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn breeds_endpoint_lists_catalog() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api/v1/cats/breeds", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["breeds"], json!(["Abyssinian", "Bengal", "Siamese"]));
}

#[tokio::test]
async fn completing_all_targets_completes_mission_and_frees_cat() {
    let app = app();
    let cat_id = create_cat(&app, "Shadow").await;
    let mission = create_mission(&app, &["Dr. Fisherman", "Captain Aquarius"]).await;
    let mission_id = mission["id"].as_i64().unwrap();
    let first = mission["targets"][0]["id"].as_i64().unwrap();
    let second = mission["targets"][1]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/v1/agency/missions/{mission_id}/assign"),
        Some(json!({ "cat_id": cat_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cat_id"], cat_id);

    let (status, body) = send(&app, Method::GET, &format!("/api/v1/spy-cats/{cat_id}/mission"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], mission_id);

    let (status, body) = send(
        &app,
        Method::PUT,
        &status_uri(cat_id, first),
        Some(json!({ "status": "completed" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "completed");

    let (_, body) = send(&app, Method::GET, &format!("/api/v1/agency/missions/{mission_id}"), None).await;
    assert_eq!(body["is_completed"], false);

    let (status, _) = send(
        &app,
        Method::PUT,
        &status_uri(cat_id, second),
        Some(json!({ "status": "completed" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, Method::GET, &format!("/api/v1/agency/missions/{mission_id}"), None).await;
    assert_eq!(body["is_completed"], true);
    assert_eq!(body["cat_id"], Value::Null);
    assert!(body["completed_at"].is_string());

    let (status, _) = send(&app, Method::GET, &format!("/api/v1/spy-cats/{cat_id}/mission"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(&app, Method::GET, "/api/v1/agency/missions/free-cats", None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/spy-cats/{cat_id}/mission/targets/{first}/notes"),
        Some(json!({ "notes": "too late" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "invalid_transition");
}

#[tokio::test]
async fn lifecycle_errors_map_to_expected_statuses() {
    let app = app();
    let owner = create_cat(&app, "Kvas").await;
    let stranger = create_cat(&app, "Luna").await;
    let mission = create_mission(&app, &["Rex"]).await;
    let mission_id = mission["id"].as_i64().unwrap();
    let target_id = mission["targets"][0]["id"].as_i64().unwrap();
    send(
        &app,
        Method::POST,
        &format!("/api/v1/agency/missions/{mission_id}/assign"),
        Some(json!({ "cat_id": owner })),
    )
    .await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &status_uri(stranger, target_id),
        Some(json!({ "status": "in_progress" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");

    let (status, _) = send(
        &app,
        Method::PUT,
        &status_uri(owner, target_id),
        Some(json!({ "status": "paused" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/api/v1/agency/missions/{mission_id}/targets/{target_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "invalid_state");

    let (status, _) = send(&app, Method::DELETE, &format!("/api/v1/agency/cats/{owner}"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, _) = send(&app, Method::DELETE, &format!("/api/v1/agency/missions/{mission_id}"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/v1/agency/missions/{mission_id}/unassign"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cat_id"], Value::Null);
    let (status, _) = send(&app, Method::DELETE, &format!("/api/v1/agency/cats/{owner}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn target_bounds_are_enforced_over_http() {
    let app = app();
    let mission = create_mission(&app, &["a", "b", "c"]).await;
    let mission_id = mission["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/v1/agency/missions/{mission_id}/targets"),
        Some(json!({ "name": "d", "country": "Chad" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "invariant_violation");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/agency/missions",
        Some(json!({ "name": "Empty", "description": "none", "targets": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let (status, body) = send(&app, Method::GET, "/api/v1/agency/missions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/agency/missions")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

struct SlowBreeds;

impl BreedSource for SlowBreeds {
    fn fetch_breeds(&self) -> Result<Vec<Breed>, BreedError> {
        std::thread::sleep(Duration::from_millis(1500));
        StaticBreedSource::from_names(["Bengal"]).fetch_breeds()
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn slow_breed_fetch_does_not_stall_database_reads() {
    let conn = open_db_in_memory().unwrap();
    let catalog = CachedBreedCatalog::new(SlowBreeds);
    let app = router(Arc::new(AppState::new(conn, Arc::new(catalog))));

    let creating = tokio::spawn({
        let app = app.clone();
        async move {
            send(
                &app,
                Method::POST,
                "/api/v1/agency/cats",
                Some(json!({
                    "name": "Shadow",
                    "years_of_experience": 4,
                    "breed": "Bengal",
                    "salary": 60000.0
                })),
            )
            .await
        }
    });
    tokio::time::sleep(Duration::from_millis(100)).await;

    let started = Instant::now();
    let (status, _) = send(&app, Method::GET, "/api/v1/agency/missions", None).await;
    let waited = started.elapsed();
    assert_eq!(status, StatusCode::OK);
    assert!(
        waited < Duration::from_millis(1000),
        "mission list waited {waited:?} behind the breed fetch"
    );

    let (status, body) = creating.await.unwrap();
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["breed"], "Bengal");
}
