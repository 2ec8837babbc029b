//! Todo CRUD handlers.
//!
//! # Responsibility
//! - Decode query, path and JSON inputs into core types.
//! - Validate write payloads before they reach the service.
//! - Map service results onto status codes.

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::de::{self, Deserializer};
use serde::Deserialize;
use todos_core::{Page, Todo, TodoId, TodoListQuery, TodoRequest};

/// Optional list parameters: `page`, `pageSize`, `sortBy`.
///
/// A present but empty value (`?pageSize=`) counts as unset.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub page: Option<u32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub page_size: Option<u32>,
    pub sort_by: Option<String>,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|err| de::Error::custom(format!("`{value}`: {err}"))),
    }
}

impl From<ListParams> for TodoListQuery {
    fn from(value: ListParams) -> Self {
        Self {
            page: value.page,
            page_size: value.page_size,
            sort_by: value.sort_by,
        }
    }
}

pub async fn list_todos(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Page<Todo>>, ApiError> {
    let Query(params) = params.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let query = TodoListQuery::from(params);
    let page = state.with_todo_service(|service| service.list(&query))?;
    Ok(Json(page))
}

pub async fn get_todo(
    State(state): State<AppState>,
    id: Result<Path<TodoId>, PathRejection>,
) -> Result<Json<Todo>, ApiError> {
    let id = todo_id(id)?;
    let todo = state.with_todo_service(|service| service.get(id))?;
    Ok(Json(todo))
}

pub async fn create_todo(
    State(state): State<AppState>,
    body: Result<Json<TodoRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let request = valid_body(body)?;
    let created = state.with_todo_service(|service| service.create(request))?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_todo(
    State(state): State<AppState>,
    id: Result<Path<TodoId>, PathRejection>,
    body: Result<Json<TodoRequest>, JsonRejection>,
) -> Result<Json<Todo>, ApiError> {
    let id = todo_id(id)?;
    let request = valid_body(body)?;
    let updated = state.with_todo_service(|service| service.update(id, request))?;
    Ok(Json(updated))
}

pub async fn delete_todo(
    State(state): State<AppState>,
    id: Result<Path<TodoId>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let id = todo_id(id)?;
    state.with_todo_service(|service| service.delete(id))?;
    Ok(StatusCode::NO_CONTENT)
}

fn todo_id(id: Result<Path<TodoId>, PathRejection>) -> Result<TodoId, ApiError> {
    let Path(id) = id.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    Ok(id)
}

fn valid_body(body: Result<Json<TodoRequest>, JsonRejection>) -> Result<TodoRequest, ApiError> {
    let Json(request) = body.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    request.validate()?;
    Ok(request)
}
