use axum::body::{to_bytes, Body};
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_REQUEST_METHOD,
    CONTENT_TYPE, ORIGIN,
};
use axum::http::{HeaderValue, Method, Request, StatusCode};
use axum::Router;
use notes_core::{DbTarget, Note, SharedDb};
use notes_server::controller::DeleteResponse;
use notes_server::{create_app, AppState, ErrorBody};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tower::ServiceExt;

const ORIGIN_URL: &str = "http://localhost:3000";

fn test_app() -> Router {
    let state = AppState::new(SharedDb::new(DbTarget::Memory));
    create_app(state, HeaderValue::from_static(ORIGIN_URL))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    };

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    (status, bytes.to_vec())
}

fn parse<T: DeserializeOwned>(bytes: &[u8]) -> T {
    serde_json::from_slice(bytes).expect("json body")
}

async fn create(app: &Router, title: &str, content: &str) -> Note {
    let (status, body) = send(
        app,
        Method::POST,
        "/notes",
        Some(json!({ "title": title, "content": content })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    parse(&body)
}

#[tokio::test]
async fn create_then_get_returns_same_record() {
    let app = test_app();
    let created = create(&app, "Groceries", "Milk, eggs").await;
    assert!(created.created_at > 0);

    let (status, body) = send(&app, Method::GET, &format!("/notes/{}", created.id), None).await;
    assert_eq!(status, StatusCode::OK);
    let fetched: Note = parse(&body);
    assert_eq!(fetched, created);

    let raw: Value = parse(&body);
    assert!(raw.get("createdAt").is_some());
}

#[tokio::test]
async fn create_with_blank_title_is_rejected() {
    let app = test_app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/notes",
        Some(json!({ "title": "", "content": "x" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: ErrorBody = parse(&body);
    assert_eq!(error.error, "validation_error");
    assert_eq!(error.message, "title must not be blank");

    let (_, body) = send(&app, Method::GET, "/notes", None).await;
    let notes: Vec<Note> = parse(&body);
    assert!(notes.is_empty());
}

#[tokio::test]
async fn create_with_missing_content_or_bad_json_is_rejected() {
    let app = test_app();
    let (status, _) = send(
        &app,
        Method::POST,
        "/notes",
        Some(json!({ "title": "only title" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/notes")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .expect("request");
    let response = app.clone().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_changes_only_submitted_fields() {
    let app = test_app();
    let created = create(&app, "Work", "Draft").await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/notes/{}", created.id),
        Some(json!({ "content": "Finish report", "createdAt": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let updated: Note = parse(&body);
    assert_eq!(updated.title, "Work");
    assert_eq!(updated.content, "Finish report");
    assert_eq!(updated.created_at, created.created_at);
}

#[tokio::test]
async fn update_unknown_id_is_not_found() {
    let app = test_app();
    let existing = create(&app, "Keep", "me").await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/notes/00000000-0000-4000-8000-000000000000",
        Some(json!({ "title": "ghost" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let error: ErrorBody = parse(&body);
    assert_eq!(error.error, "not_found");

    let (_, body) = send(&app, Method::GET, "/notes", None).await;
    let notes: Vec<Note> = parse(&body);
    assert_eq!(notes, vec![existing]);
}

#[tokio::test]
async fn second_delete_is_not_found() {
    let app = test_app();
    let created = create(&app, "Temp", "gone").await;
    let uri = format!("/notes/{}", created.id);

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let confirmation: DeleteResponse = parse(&body);
    assert_eq!(confirmation.message, "Note deleted successfully");

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_id_is_not_found() {
    let app = test_app();
    let (status, _) = send(&app, Method::GET, "/notes/not-an-id", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn only_canonical_id_form_resolves() {
    let app = test_app();
    let created = create(&app, "Work", "Draft").await;
    let simple = created.id.simple().to_string();
    let braced = created.id.braced().to_string().replace('{', "%7B").replace('}', "%7D");

    for uri in [format!("/notes/{simple}"), format!("/notes/{braced}")] {
        let (status, _) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        let (status, _) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
    }

    let (status, _) = send(&app, Method::GET, &format!("/notes/{}", created.id), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn body_without_json_content_type_keeps_its_status() {
    let app = test_app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/notes")
        .body(Body::from(r#"{"title":"t","content":"c"}"#))
        .expect("request");
    let response = app.clone().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let error: ErrorBody = parse(&bytes);
    assert_eq!(error.error, "request_rejected");
}

#[tokio::test]
async fn list_after_creates_and_delete_and_trailing_slash() {
    let app = test_app();
    let a = create(&app, "Groceries", "Milk, eggs").await;
    let b = create(&app, "Work", "Finish report").await;
    let c = create(&app, "Gym", "Legs").await;

    let (status, _) = send(&app, Method::DELETE, &format!("/notes/{}", a.id), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::GET, "/notes/", None).await;
    assert_eq!(status, StatusCode::OK);
    let notes: Vec<Note> = parse(&body);
    assert_eq!(notes, vec![b, c]);
}

#[tokio::test]
async fn cors_preflight_allows_configured_origin_and_four_methods() {
    let app = test_app();
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/notes")
        .header(ORIGIN, ORIGIN_URL)
        .header(ACCESS_CONTROL_REQUEST_METHOD, "PUT")
        .body(Body::empty())
        .expect("request");
    let response = app.clone().oneshot(request).await.expect("response");

    assert!(response.status().is_success());
    let headers = response.headers();
    assert_eq!(headers[ACCESS_CONTROL_ALLOW_ORIGIN], ORIGIN_URL);
    let methods = headers[ACCESS_CONTROL_ALLOW_METHODS]
        .to_str()
        .expect("ascii header");
    for method in ["GET", "POST", "PUT", "DELETE"] {
        assert!(methods.contains(method), "missing {method} in {methods}");
    }
    assert!(!methods.contains("PATCH"));
}

#[tokio::test]
async fn cors_does_not_grant_other_origins() {
    let app = test_app();
    let request = Request::builder()
        .method(Method::GET)
        .uri("/notes")
        .header(ORIGIN, "http://evil.example")
        .body(Body::empty())
        .expect("request");
    let response = app.clone().oneshot(request).await.expect("response");

    assert!(response
        .headers()
        .get(ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[tokio::test]
async fn health_reports_version() {
    let app = test_app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    let health: Value = parse(&body);
    assert_eq!(health["status"], "ok");
    assert_eq!(health["version"], env!("CARGO_PKG_VERSION"));
}
