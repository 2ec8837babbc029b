//! Todo use-case service.
//!
//! # Responsibility
//! - Apply list defaults (page, page size, sort) before querying the store.
//! - Translate missing records into typed not-found errors.
//! - Delegate CRUD persistence to a `TodoRepository`.
//!
//! # Invariants
//! - Effective page size is `min(page_size or 10, 50)`; `0` means unset.
//! - Sort defaults to `id`; `priority` sorts descending, everything else ascending.
//! - Update and delete never create records as a side effect.

use crate::model::todo::{Todo, TodoId, TodoRequest};
use crate::repo::page::{Page, PageRequest, Sort, SortField};
use crate::repo::todo_repo::{RepoError, TodoRepository};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const DEFAULT_PAGE: u32 = 0;
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 50;
const DEFAULT_SORT_FIELD: &str = "id";

/// Service error for todo use-cases.
#[derive(Debug)]
pub enum TodoServiceError {
    /// Listing produced an empty page.
    NoTodosFound,
    /// Target todo does not exist.
    TodoNotFound(TodoId),
    /// Requested sort column is not a todo field.
    InvalidSortField(String),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl TodoServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NoTodosFound | Self::TodoNotFound(_))
    }
}

impl Display for TodoServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoTodosFound => write!(f, "No tasks found."),
            Self::TodoNotFound(id) => write!(f, "Task with id '{id}' not found."),
            Self::InvalidSortField(value) => write!(
                f,
                "unknown sort field `{value}`; expected id|name|description|done|priority"
            ),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TodoServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for TodoServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::TodoNotFound(id),
            other => Self::Repo(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, TodoServiceError>;

/// Raw list parameters as received from callers; every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoListQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub sort_by: Option<String>,
}

/// Resolves optional list parameters into an effective `PageRequest`.
pub fn resolve_page_request(query: &TodoListQuery) -> ServiceResult<PageRequest> {
    let page = query.page.unwrap_or(DEFAULT_PAGE);
    let page_size = normalize_page_size(query.page_size);
    let sort_by = query
        .sort_by
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_SORT_FIELD);

    let field = SortField::parse(sort_by)
        .ok_or_else(|| TodoServiceError::InvalidSortField(sort_by.to_string()))?;
    let sort = if field == SortField::Priority {
        Sort::desc(field)
    } else {
        Sort::asc(field)
    };

    Ok(PageRequest::new(page, page_size, sort))
}

/// Applies the default and upper bound to a requested page size.
pub fn normalize_page_size(page_size: Option<u32>) -> u32 {
    match page_size {
        Some(0) | None => DEFAULT_PAGE_SIZE,
        Some(value) => value.min(MAX_PAGE_SIZE),
    }
}

/// Use-case service over a todo record store.
pub struct TodoService<R: TodoRepository> {
    repo: R,
}

impl<R: TodoRepository> TodoService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists one page of todos.
    ///
    /// # Errors
    /// - `NoTodosFound` when the requested page holds no rows.
    /// - `InvalidSortField` when `sort_by` names no todo field.
    pub fn list(&self, query: &TodoListQuery) -> ServiceResult<Page<Todo>> {
        let request = resolve_page_request(query)?;
        let page = self.repo.find_all(&request)?;
        if page.is_empty() {
            warn!(
                "event=todo_list module=service status=empty page={} page_size={} sort={}",
                request.page(),
                request.page_size(),
                request.sort().field
            );
            return Err(TodoServiceError::NoTodosFound);
        }

        info!(
            "event=todo_list module=service status=ok page={} page_size={} items={}",
            request.page(),
            request.page_size(),
            page.content.len()
        );
        Ok(page)
    }

    /// Gets one todo by ID.
    pub fn get(&self, id: TodoId) -> ServiceResult<Todo> {
        self.with_existing(id, |_, todo| Ok(todo))
    }

    /// Persists a new todo; the store assigns its ID.
    ///
    /// Callers validate `request` before this call.
    pub fn create(&self, request: TodoRequest) -> ServiceResult<Todo> {
        let created = self.repo.save(&Todo::draft(request))?;
        info!(
            "event=todo_create module=service status=ok id={}",
            created.id.unwrap_or_default()
        );
        Ok(created)
    }

    /// Replaces every field except `id` on an existing todo.
    pub fn update(&self, id: TodoId, request: TodoRequest) -> ServiceResult<Todo> {
        self.with_existing(id, |repo, _| {
            let updated = repo.save(&Todo::with_id(id, request))?;
            info!("event=todo_update module=service status=ok id={id}");
            Ok(updated)
        })
    }

    /// Removes an existing todo.
    pub fn delete(&self, id: TodoId) -> ServiceResult<()> {
        self.with_existing(id, |repo, todo| {
            repo.delete(&todo)?;
            info!("event=todo_delete module=service status=ok id={id}");
            Ok(())
        })
    }

    /// Looks up `id` and runs `action` on the found record.
    ///
    /// Fails with `TodoNotFound(id)` without calling `action` when absent.
    fn with_existing<T>(
        &self,
        id: TodoId,
        action: impl FnOnce(&R, Todo) -> ServiceResult<T>,
    ) -> ServiceResult<T> {
        match self.repo.find_by_id(id)? {
            Some(todo) => action(&self.repo, todo),
            None => {
                warn!("event=todo_lookup module=service status=not_found id={id}");
                Err(TodoServiceError::TodoNotFound(id))
            }
        }
    }
}
