//! End-to-end REST tests through the full router

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use common::{print_test_header, test_module};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn send(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn ship_body(name: &str) -> Value {
    json!({
        "name": name,
        "type": "container_ship",
        "imo_number": "9321483",
        "flag_state": "Liberia"
    })
}

#[tokio::test]
async fn test_health_needs_no_token() {
    let (module, _) = test_module().await;
    let (status, body) = send(&module.router(), Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "healthy"}));
}

#[tokio::test]
async fn test_missing_or_bad_credentials_are_rejected() {
    print_test_header(
        "test_missing_or_bad_credentials_are_rejected",
        &["401 without a usable token, 404 for unknown users, 403 when inactive"],
    );
    let (module, _) = test_module().await;
    let app = module.router();

    let (status, body) = send(&app, Method::GET, "/ships", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], 401);
    assert_eq!(body["title"], "Unauthorized");

    let (status, _) = send(&app, Method::GET, "/ships", Some("forged"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, Method::GET, "/users/me", Some("token-stranger"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["title"], "User Not Found");

    let (status, _) = send(&app, Method::GET, "/users/me", Some("token-inactive"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_me_returns_the_caller() {
    let (module, _) = test_module().await;
    let (status, body) = send(&module.router(), Method::GET, "/users/me", Some("token-master"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Master Mariner");
    assert_eq!(body["role"], "master");
}

#[tokio::test]
async fn test_ship_crud_over_http() {
    print_test_header(
        "test_ship_crud_over_http",
        &["MASTER creates, lists, updates and deletes a ship; CREW may not create"],
    );
    let (module, _) = test_module().await;
    let app = module.router();

    let (status, body) = send(&app, Method::POST, "/ships", Some("token-crew"), Some(ship_body("MV Denied"))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["title"], "Forbidden");

    let (status, created) = send(&app, Method::POST, "/ships", Some("token-master"), Some(ship_body("MV Horizon"))).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_owned();
    assert_eq!(created["type"], "container_ship");
    assert_eq!(created["status"], "active");

    let (status, list) = send(&app, Method::GET, "/ships", Some("token-master"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["total"], 1);
    assert_eq!(list["items"][0]["id"], id.as_str());

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/ships/{id}"),
        Some("token-master"),
        Some(json!({"status": "docked"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "docked");
    assert_eq!(updated["name"], "MV Horizon");

    let (status, _) = send(&app, Method::DELETE, &format!("/ships/{id}"), Some("token-master"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, Method::GET, &format!("/ships/{id}"), Some("token-master"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["title"], "Ship Not Found");
}

#[tokio::test]
async fn test_malformed_body_is_a_validation_problem() {
    let (module, _) = test_module().await;
    let app = module.router();

    let (status, body) = send(
        &app,
        Method::POST,
        "/ships",
        Some("token-master"),
        Some(json!({"name": "MV Broken"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn test_bad_query_string_is_a_validation_problem() {
    print_test_header(
        "test_bad_query_string_is_a_validation_problem",
        &["An undecodable query string yields a JSON 400 Problem, not plain text"],
    );
    let (module, _) = test_module().await;
    let app = module.router();

    let request = Request::builder()
        .method(Method::GET)
        .uri("/pms?status=bogus")
        .header(header::AUTHORIZATION, "Bearer token-master")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE].to_str().unwrap(),
        "application/json"
    );
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], 400);
    assert_eq!(body["title"], "Validation Error");
    assert!(body["detail"].as_str().unwrap().contains("bogus"));

    for uri in ["/invoices?status=lost", "/recruitment/candidates?stage=astronaut", "/documents/submissions?status=maybe"] {
        let (status, body) = send(&app, Method::GET, uri, Some("token-master"), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["title"], "Validation Error", "{uri}");
    }
}

#[tokio::test]
async fn test_unassigned_crew_gets_empty_envelope() {
    let (module, _) = test_module().await;
    let app = module.router();

    for uri in ["/pms", "/worklogs", "/invoices", "/documents/submissions"] {
        let (status, body) = send(&app, Method::GET, uri, Some("token-crew"), None).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(body, json!({"items": [], "total": 0}), "{uri}");
    }
}

#[tokio::test]
async fn test_trigger_work_over_http() {
    let (module, _) = test_module().await;
    let app = module.router();

    let (_, ship) = send(&app, Method::POST, "/ships", Some("token-master"), Some(ship_body("MV Horizon"))).await;
    let vessel_id = ship["id"].as_str().unwrap().to_owned();
    let (status, template) = send(
        &app,
        Method::POST,
        "/documents/templates",
        Some("token-master"),
        Some(json!({"name": "Enclosed space entry", "category": "Checklist"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        Method::POST,
        "/documents/trigger-work",
        Some("token-master"),
        Some(json!({"vessel_id": vessel_id, "template_ids": [template["id"]]})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["status"], "pending");

    let (status, body) = send(
        &app,
        Method::POST,
        "/documents/trigger-work",
        Some("token-master"),
        Some(json!({"vessel_id": vessel_id})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["title"], "Validation Error");
}

#[tokio::test]
async fn test_trigger_work_accepts_form_category_and_assigned_crew_ids() {
    print_test_header(
        "test_trigger_work_accepts_form_category_and_assigned_crew_ids",
        &["Fan-out requests using form_category and assigned_crew_ids reach the named crew"],
    );
    let (module, _) = test_module().await;
    let app = module.router();

    let (_, ship) = send(&app, Method::POST, "/ships", Some("token-master"), Some(ship_body("MV Horizon"))).await;
    let vessel_id = ship["id"].as_str().unwrap().to_owned();
    let (_, cadet) = send(&app, Method::GET, "/users/me", Some("token-crew"), None).await;
    let cadet_id = cadet["id"].as_str().unwrap().to_owned();
    let (status, _) = send(
        &app,
        Method::POST,
        "/documents/templates",
        Some("token-master"),
        Some(json!({"name": "Hot work permit", "category": "ISM"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        Method::POST,
        "/documents/trigger-work",
        Some("token-master"),
        Some(json!({
            "vessel_id": vessel_id,
            "form_category": "ISM",
            "assigned_crew_ids": [cadet_id],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["assigned_to"], json!(cadet_id));
}

#[tokio::test]
async fn test_cargo_routes() {
    let (module, _) = test_module().await;
    let app = module.router();

    let (_, ship) = send(&app, Method::POST, "/ships", Some("token-master"), Some(ship_body("MV Horizon"))).await;
    let (status, op) = send(
        &app,
        Method::POST,
        "/cargo",
        Some("token-master"),
        Some(json!({
            "ship_id": ship["id"],
            "cargo_type": "unloading",
            "cargo_name": "Steel coils",
            "quantity": 3400.0,
            "port": "Antwerp",
            "scheduled_date": "2025-06-01T08:00:00Z"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(op["status"], "planned");
    assert_eq!(op["ship_name"], "MV Horizon");
    let uri = format!("/cargo/{}", op["id"].as_str().unwrap());

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some("token-master"),
        Some(json!({"status": "in_progress", "notes": "Crane 2 down"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "in_progress");
    assert_eq!(body["notes"], "Crane 2 down");

    let (status, body) = send(&app, Method::GET, "/cargo?status=in_progress", Some("token-master"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);

    let (status, body) = send(&app, Method::GET, "/cargo", Some("token-crew"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"items": [], "total": 0}));

    let (status, _) = send(&app, Method::GET, "/cargo/missing", Some("token-master"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
