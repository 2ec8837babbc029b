use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use todos_api::{build_router, AppState, ErrorResponse};
use todos_core::db::open_db_in_memory;
use todos_core::{Page, Todo};
use tower::ServiceExt;

fn app() -> Router {
    build_router(AppState::new(open_db_in_memory().unwrap()))
}

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_len(response: axum::response::Response) -> usize {
    response.into_body().collect().await.unwrap().to_bytes().len()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

async fn send(app: &Router, request: Request<String>) -> axum::response::Response {
    app.clone().oneshot(request).await.unwrap()
}

async fn create(app: &Router, body: &str) -> Todo {
    let resp = send(app, json_request("POST", "/todos", body)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    body_json(resp).await
}

// --- health ---

#[tokio::test]
async fn health_reports_version() {
    let resp = send(&app(), empty_request("GET", "/health")).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], todos_core::core_version());
}

// --- list ---

#[tokio::test]
async fn list_empty_store_returns_404_with_error_body() {
    let resp = send(&app(), empty_request("GET", "/todos")).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let error: ErrorResponse = body_json(resp).await;
    assert_eq!(error.status, 404);
    assert_eq!(error.message, "No tasks found.");
    assert!(!error.time_stamp.is_empty());
}

#[tokio::test]
async fn list_returns_single_record_page() {
    let app = app();
    let created = create(
        &app,
        r#"{"name":"Buy milk","description":"2%","done":false,"priority":5}"#,
    )
    .await;

    let resp = send(&app, empty_request("GET", "/todos?page=0&pageSize=10&sortBy=id")).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let page: Page<Todo> = body_json(resp).await;
    assert_eq!(page.content, vec![created]);
    assert_eq!(page.page, 0);
    assert_eq!(page.page_size, 10);
    assert_eq!(page.total_elements, 1);
}

#[tokio::test]
async fn list_clamps_page_size_and_sorts_priority_descending() {
    let app = app();
    for priority in 0..60 {
        create(
            &app,
            &format!(r#"{{"name":"todo {priority}","description":"bulk","priority":{priority}}}"#),
        )
        .await;
    }

    let resp = send(&app, empty_request("GET", "/todos?pageSize=100&sortBy=priority")).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let page: Page<Todo> = body_json(resp).await;
    assert_eq!(page.page_size, 50);
    assert_eq!(page.content.len(), 50);
    assert_eq!(page.content[0].priority, 59);
    assert_eq!(page.content[49].priority, 10);
}

#[tokio::test]
async fn list_unknown_sort_field_returns_400() {
    let app = app();
    create(&app, r#"{"name":"a","description":"b"}"#).await;

    let resp = send(&app, empty_request("GET", "/todos?sortBy=owner")).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = body_json(resp).await;
    assert!(error.message.contains("owner"));
}

#[tokio::test]
async fn list_blank_paging_params_fall_back_to_defaults() {
    let app = app();
    let created = create(&app, r#"{"name":"a","description":"b"}"#).await;

    let resp = send(&app, empty_request("GET", "/todos?pageSize=&page=&sortBy=")).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let page: Page<Todo> = body_json(resp).await;
    assert_eq!(page.page, 0);
    assert_eq!(page.page_size, 10);
    assert_eq!(page.content, vec![created]);
}

#[tokio::test]
async fn list_corrupt_stored_row_returns_500() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO todos (name, description, done, priority) VALUES ('', 'desc', 0, 0);",
        [],
    )
    .unwrap();
    let app = build_router(AppState::new(conn));

    let resp = send(&app, empty_request("GET", "/todos")).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let error: ErrorResponse = body_json(resp).await;
    assert_eq!(error.status, 500);
    assert_eq!(error.message, "Internal server error");
}

#[tokio::test]
async fn list_negative_page_returns_400() {
    let resp = send(&app(), empty_request("GET", "/todos?page=-1")).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- create ---

#[tokio::test]
async fn create_todo_returns_201_with_assigned_id() {
    let app = app();
    let todo = create(
        &app,
        r#"{"name":"Walk dog","description":"park","done":true,"priority":3}"#,
    )
    .await;

    assert_eq!(todo.id, Some(1));
    assert_eq!(todo.name, "Walk dog");
    assert_eq!(todo.description, "park");
    assert!(todo.done);
    assert_eq!(todo.priority, 3);
}

#[tokio::test]
async fn create_todo_empty_name_returns_400() {
    let app = app();
    let resp = send(
        &app,
        json_request("POST", "/todos", r#"{"name":"","description":"x"}"#),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = body_json(resp).await;
    assert_eq!(error.status, 400);
    assert_eq!(error.message, "Task name must not be empty.");

    let resp = send(&app, empty_request("GET", "/todos")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_todo_missing_description_returns_400() {
    let resp = send(
        &app(),
        json_request("POST", "/todos", r#"{"name":"Buy milk"}"#),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = body_json(resp).await;
    assert_eq!(error.message, "Task description must not be empty.");
}

#[tokio::test]
async fn create_todo_malformed_json_returns_400() {
    let resp = send(&app(), json_request("POST", "/todos", r#"{"name":"#)).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = body_json(resp).await;
    assert_eq!(error.status, 400);
}

// --- get ---

#[tokio::test]
async fn get_todo_not_found() {
    let resp = send(&app(), empty_request("GET", "/todos/5")).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let error: ErrorResponse = body_json(resp).await;
    assert_eq!(error.message, "Task with id '5' not found.");
}

#[tokio::test]
async fn get_todo_bad_id_returns_400() {
    let resp = send(&app(), empty_request("GET", "/todos/not-a-number")).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- update ---

#[tokio::test]
async fn update_todo_replaces_fields_and_keeps_id() {
    let app = app();
    create(
        &app,
        r#"{"name":"Buy milk","description":"2%","done":false,"priority":5}"#,
    )
    .await;

    let resp = send(
        &app,
        json_request(
            "PUT",
            "/todos/1",
            r#"{"name":"Buy milk","description":"whole","done":true,"priority":5}"#,
        ),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Todo = body_json(resp).await;
    assert_eq!(updated.id, Some(1));
    assert_eq!(updated.name, "Buy milk");
    assert_eq!(updated.description, "whole");
    assert!(updated.done);
    assert_eq!(updated.priority, 5);
}

#[tokio::test]
async fn update_todo_not_found() {
    let app = app();
    let resp = send(
        &app,
        json_request("PUT", "/todos/2", r#"{"name":"a","description":"b"}"#),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let error: ErrorResponse = body_json(resp).await;
    assert_eq!(error.message, "Task with id '2' not found.");

    let resp = send(&app, empty_request("GET", "/todos")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_todo_blank_description_returns_400() {
    let app = app();
    create(&app, r#"{"name":"a","description":"b"}"#).await;

    let resp = send(
        &app,
        json_request("PUT", "/todos/1", r#"{"name":"a","description":"  "}"#),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- delete ---

#[tokio::test]
async fn delete_todo_not_found() {
    let resp = send(&app(), empty_request("DELETE", "/todos/99")).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let error: ErrorResponse = body_json(resp).await;
    assert_eq!(error.message, "Task with id '99' not found.");
}

// --- full CRUD lifecycle ---

#[tokio::test]
async fn crud_lifecycle() {
    let app = app();

    let first = create(&app, r#"{"name":"Walk dog","description":"park"}"#).await;
    let second = create(&app, r#"{"name":"Feed cat","description":"tuna"}"#).await;
    let first_id = first.id.unwrap();

    let resp = send(&app, empty_request("GET", &format!("/todos/{first_id}"))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Todo = body_json(resp).await;
    assert_eq!(fetched, first);

    let resp = send(&app, empty_request("DELETE", &format!("/todos/{first_id}"))).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert_eq!(body_len(resp).await, 0);

    let resp = send(&app, empty_request("GET", &format!("/todos/{first_id}"))).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = send(&app, empty_request("GET", "/todos")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let page: Page<Todo> = body_json(resp).await;
    assert_eq!(page.content, vec![second]);
}
