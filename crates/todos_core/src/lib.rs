//! Core domain logic for the todos service.
//! This crate owns the record store and the todo use-cases; transports
//! live in sibling crates.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LogLevel};
pub use model::todo::{Todo, TodoId, TodoRequest, TodoValidationError};
pub use repo::page::{Page, PageRequest, Sort, SortDirection, SortField};
pub use repo::todo_repo::{RepoError, RepoResult, SqliteTodoRepository, TodoRepository};
pub use service::todo_service::{
    normalize_page_size, resolve_page_request, ServiceResult, TodoListQuery, TodoService,
    TodoServiceError, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
