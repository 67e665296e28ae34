//! HTTP-level tests driving the router against the in-memory store.

use acado_api::{create_router, AppState};
use acado_common::{config::AppConfig, db, Repositories};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

async fn app() -> Router {
    let config = AppConfig::in_memory();
    let repos: Repositories = db::connect(&config.database).await.unwrap();
    create_router(AppState::new(config, repos))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, value)
}

async fn create_university(app: &Router, body: Value) -> Value {
    let (status, created) = send(app, Method::POST, "/api/universities", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    created
}

#[tokio::test]
async fn test_health_and_ready() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&app, Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["checks"]["store"]["status"], "up");
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let app = app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "req-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers()["x-request-id"], "req-123");
}

#[tokio::test]
async fn test_university_crud_over_http() {
    let app = app().await;
    let actor = Uuid::new_v4();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/universities")
                .header(header::CONTENT_TYPE, "application/json")
                .header("x-user-id", actor.to_string())
                .body(Body::from(
                    json!({
                        "name": "University of Helsinki",
                        "institutionType": "University",
                        "parentInstitutionId": "garbage",
                        "location": { "city": "Helsinki", "country": "Finland" }
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let created: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(created["createdBy"], actor.to_string());
    assert_eq!(created["parentInstitutionId"], Value::Null);
    assert_eq!(created["status"], "Active");
    assert_eq!(created["isActive"], true);
    assert_eq!(created["tags"]["isVerified"], false);

    let id = created["id"].as_str().unwrap().to_string();

    let (status, fetched) = send(&app, Method::GET, &format!("/api/universities/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "University of Helsinki");
    assert_eq!(fetched["location"]["country"], "Finland");

    let (status, updated) = send(
        &app,
        Method::PATCH,
        &format!("/api/universities/{id}"),
        Some(json!({ "status": "bogus", "tagline": "Est. 1640" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "Active");
    assert_eq!(updated["tagline"], "Est. 1640");

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/api/universities/{id}"),
        Some(json!({ "tagline": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["tagline"], Value::Null);

    let (status, body) = send(&app, Method::DELETE, &format!("/api/universities/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = send(&app, Method::GET, &format!("/api/universities/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_and_unknown_ids_are_both_not_found() {
    let app = app().await;

    let (malformed, malformed_body) =
        send(&app, Method::GET, "/api/universities/not-an-id", None).await;
    let (unknown, unknown_body) = send(
        &app,
        Method::GET,
        &format!("/api/universities/{}", Uuid::new_v4()),
        None,
    )
    .await;

    assert_eq!(malformed, StatusCode::NOT_FOUND);
    assert_eq!(unknown, StatusCode::NOT_FOUND);
    assert_eq!(malformed_body["error"]["code"], "NOT_FOUND");
    assert_eq!(unknown_body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_list_filters_and_pagination() {
    let app = app().await;

    for name in ["Aalto", "Tampere", "Turku"] {
        create_university(
            &app,
            json!({ "name": name, "location": { "country": "Finland" } }),
        )
        .await;
    }
    create_university(&app, json!({ "name": "ETH", "location": { "country": "Switzerland" } }))
        .await;

    let (status, page) = send(
        &app,
        Method::GET,
        "/api/universities?country=Finland&page=1&pageSize=2&institutionType=Spaceport",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["items"].as_array().unwrap().len(), 2);
    assert_eq!(page["pagination"]["totalItems"], 3);
    assert_eq!(page["pagination"]["totalPages"], 2);
    assert_eq!(page["pagination"]["pageSize"], 2);
    for item in page["items"].as_array().unwrap() {
        assert_eq!(item["location"]["country"], "Finland");
    }

    let (status, empty) = send(&app, Method::GET, "/api/universities?search=nowhere", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(empty["pagination"]["totalItems"], 0);
    assert_eq!(empty["pagination"]["totalPages"], 1);

    let (status, clamped) =
        send(&app, Method::GET, "/api/universities?page=-4&pageSize=1000", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(clamped["pagination"]["page"], 1);
    assert_eq!(clamped["pagination"]["pageSize"], 100);

    let (status, beyond) = send(
        &app,
        Method::GET,
        "/api/universities?page=9223372036854775807&pageSize=100",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(beyond["items"].as_array().unwrap().is_empty());
    assert_eq!(beyond["pagination"]["page"], 9223372036854775807_u64);
    assert_eq!(beyond["pagination"]["totalItems"], 4);
    assert_eq!(beyond["pagination"]["totalPages"], 1);
}

#[tokio::test]
async fn test_non_numeric_page_is_bad_request() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, "/api/universities?page=abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_create_rejects_blank_name_and_bad_json() {
    let app = app().await;

    let (status, _) = send(&app, Method::POST, "/api/universities", Some(json!({ "name": "" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::POST, "/api/universities", Some(json!({ "tagline": "x" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_blocked_by_courses() {
    let app = app().await;

    let university = create_university(&app, json!({ "name": "Aalto" })).await;
    let id = university["id"].as_str().unwrap().to_string();

    let (status, course) = send(
        &app,
        Method::POST,
        "/api/courses",
        Some(json!({ "name": "Computer Science", "universityId": id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(course["university"]["name"], "Aalto");

    let (status, body) = send(&app, Method::DELETE, &format!("/api/universities/{id}"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");

    let (status, courses) =
        send(&app, Method::GET, &format!("/api/universities/{id}/courses"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(courses.as_array().unwrap().len(), 1);

    let course_id = course["id"].as_str().unwrap();
    let (status, _) = send(&app, Method::DELETE, &format!("/api/courses/{course_id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::DELETE, &format!("/api/universities/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_stats_endpoint() {
    let app = app().await;

    create_university(
        &app,
        json!({ "name": "A", "institutionType": "University", "location": { "country": "Finland" } }),
    )
    .await;
    create_university(&app, json!({ "name": "B", "isActive": false })).await;

    let (status, stats) = send(&app, Method::GET, "/api/universities/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total"], 2);
    assert_eq!(stats["active"], 1);
    assert_eq!(stats["inactive"], 1);
    let countries = stats["topCountries"].as_array().unwrap();
    assert!(countries
        .iter()
        .any(|group| group["key"] == "Unknown" && group["count"] == 1));
}

#[tokio::test]
async fn test_course_with_unknown_university_is_bad_request() {
    let app = app().await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/courses",
        Some(json!({ "name": "Physics", "universityId": Uuid::new_v4().to_string() })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, course) = send(
        &app,
        Method::POST,
        "/api/courses",
        Some(json!({ "name": "Physics", "universityId": "garbage" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(course["universityId"], Value::Null);
}

#[tokio::test]
async fn test_form_lifecycle_over_http() {
    let app = app().await;

    let (status, category) = send(
        &app,
        Method::POST,
        "/api/form-categories",
        Some(json!({ "name": "Personal details" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let category_id = category["id"].as_str().unwrap().to_string();

    let (status, form) = send(
        &app,
        Method::POST,
        "/api/forms",
        Some(json!({ "title": "Admissions 2026" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(form["status"], "draft");
    let form_id = form["id"].as_str().unwrap().to_string();

    // Nothing to publish yet
    let (status, _) = send(&app, Method::POST, &format!("/api/forms/{form_id}/publish"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let mut field_ids = Vec::new();
    for label in ["Full name", "Email address"] {
        let (status, field) = send(
            &app,
            Method::POST,
            &format!("/api/forms/{form_id}/fields"),
            Some(json!({ "label": label, "fieldType": "text", "categoryId": category_id })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        field_ids.push(field["id"].as_str().unwrap().to_string());
    }

    let reversed: Vec<&String> = field_ids.iter().rev().collect();
    let (status, reordered) = send(
        &app,
        Method::PUT,
        &format!("/api/forms/{form_id}/fields/order"),
        Some(json!({ "fieldIds": reversed })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reordered["fields"][0]["key"], "email_address");
    assert_eq!(reordered["fields"][0]["position"], 0);

    let (status, field) = send(
        &app,
        Method::PATCH,
        &format!("/api/forms/{form_id}/fields/{}", field_ids[0]),
        Some(json!({ "required": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(field["required"], true);

    let (status, published) =
        send(&app, Method::POST, &format!("/api/forms/{form_id}/publish"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(published["status"], "published");
    assert!(published["publishedAt"].is_string());

    let (status, archived) =
        send(&app, Method::POST, &format!("/api/forms/{form_id}/archive"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(archived["isActive"], false);

    let (status, body) =
        send(&app, Method::POST, &format!("/api/forms/{form_id}/publish"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "INVALID_TRANSITION");

    // Category still has fields
    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/form-categories/{category_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(&app, Method::DELETE, &format!("/api/forms/{form_id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/form-categories/{category_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_category_tree() {
    let app = app().await;

    let (_, parent) = send(&app, Method::POST, "/api/form-categories", Some(json!({ "name": "Academics" }))).await;
    let parent_id = parent["id"].as_str().unwrap().to_string();
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/form-categories",
        Some(json!({ "name": "Transcripts", "parentId": parent_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, tree) = send(&app, Method::GET, "/api/form-categories", None).await;
    assert_eq!(status, StatusCode::OK);
    let tree = tree.as_array().unwrap();
    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0]["name"], "Academics");
    assert_eq!(tree[0]["subcategories"][0]["name"], "Transcripts");
}

#[tokio::test]
async fn test_publish_checks() {
    let app = app().await;

    let (status, checklist) = send(
        &app,
        Method::POST,
        "/api/events/publish-check",
        Some(json!({
            "title": "Hackathon",
            "description": "48 hours",
            "startDate": "2026-03-01",
            "endDate": "2026-03-03",
            "mode": "online",
            "stages": [{ "name": "Finals" }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(checklist["publishable"], true);
    assert!(checklist["missing"].as_array().unwrap().is_empty());

    let (status, checklist) = send(
        &app,
        Method::POST,
        "/api/scholarships/publish-check",
        Some(json!({ "title": "Merit award" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(checklist["publishable"], false);
    let missing: Vec<&str> = checklist["missing"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert!(missing.contains(&"provider"));
    assert!(!missing.contains(&"title"));
}

#[tokio::test]
async fn test_rate_limit_returns_429() {
    let mut config = AppConfig::in_memory();
    config.rate_limit.enabled = true;
    config.rate_limit.requests_per_second = 1;
    config.rate_limit.burst = 1;
    let repos = db::connect(&config.database).await.unwrap();
    let app = create_router(AppState::new(config, repos));

    let (first, _) = send(&app, Method::GET, "/health", None).await;
    let (second, body) = send(&app, Method::GET, "/health", None).await;

    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error"]["code"], "RATE_LIMITED");
}
