//! Todo repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide paged find-all, find-by-id, save and delete over `todos`.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths call `Todo::validate()` before SQL mutations.
//! - Read paths report invalid persisted rows as `InvalidData`, never as
//!   caller validation errors.
//! - Sort columns come from `SortField`, never from caller text.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::todo::{Todo, TodoId, TodoValidationError};
use crate::repo::page::{Page, PageRequest};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const TODO_SELECT_SQL: &str = "SELECT
    id,
    name,
    description,
    done,
    priority
FROM todos";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for todo persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(TodoValidationError),
    Db(DbError),
    NotFound(TodoId),
    /// Delete was called with a record that was never persisted.
    MissingId,
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "todo not found: {id}"),
            Self::MissingId => write!(f, "todo has no id; it was never persisted"),
            Self::InvalidData(message) => write!(f, "invalid persisted todo data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::MissingId | Self::InvalidData(_) => None,
        }
    }
}

impl From<TodoValidationError> for RepoError {
    fn from(value: TodoValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Record-store interface consumed by `TodoService`.
pub trait TodoRepository {
    fn find_all(&self, request: &PageRequest) -> RepoResult<Page<Todo>>;
    fn find_by_id(&self, id: TodoId) -> RepoResult<Option<Todo>>;
    /// Inserts when `todo.id` is `None`, otherwise inserts-or-replaces that row.
    fn save(&self, todo: &Todo) -> RepoResult<Todo>;
    fn delete(&self, todo: &Todo) -> RepoResult<()>;
}

/// SQLite-backed todo repository.
pub struct SqliteTodoRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTodoRepository<'conn> {
    /// Wraps a connection whose schema is at the latest migration version.
    ///
    /// # Errors
    /// - `DbError::SchemaNotMigrated` when the connection was not opened via
    ///   `open_db`/`open_db_in_memory`.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let found = current_user_version(conn)?;
        let expected = latest_version();
        if found != expected {
            return Err(DbError::SchemaNotMigrated { found, expected }.into());
        }
        Ok(Self { conn })
    }
}

impl TodoRepository for SqliteTodoRepository<'_> {
    fn find_all(&self, request: &PageRequest) -> RepoResult<Page<Todo>> {
        let total = count_todos(self.conn)?;
        let sort = request.sort();
        let sql = format!(
            "{TODO_SELECT_SQL} ORDER BY {} {}, id ASC LIMIT ?1 OFFSET ?2;",
            sort.field.column(),
            sort.direction.as_sql()
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params![i64::from(request.page_size()), request.offset()])?;
        let mut todos = Vec::new();
        while let Some(row) = rows.next()? {
            todos.push(parse_todo_row(row)?);
        }

        Ok(Page::new(todos, request, total))
    }

    fn find_by_id(&self, id: TodoId) -> RepoResult<Option<Todo>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TODO_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_todo_row(row)?));
        }

        Ok(None)
    }

    fn save(&self, todo: &Todo) -> RepoResult<Todo> {
        todo.validate()?;

        let id = match todo.id {
            None => {
                self.conn.execute(
                    "INSERT INTO todos (name, description, done, priority)
                     VALUES (?1, ?2, ?3, ?4);",
                    params![
                        todo.name.as_str(),
                        todo.description.as_str(),
                        bool_to_int(todo.done),
                        todo.priority,
                    ],
                )?;
                self.conn.last_insert_rowid()
            }
            Some(id) => {
                self.conn.execute(
                    "INSERT INTO todos (id, name, description, done, priority)
                     VALUES (?1, ?2, ?3, ?4, ?5)
                     ON CONFLICT(id) DO UPDATE SET
                        name = excluded.name,
                        description = excluded.description,
                        done = excluded.done,
                        priority = excluded.priority;",
                    params![
                        id,
                        todo.name.as_str(),
                        todo.description.as_str(),
                        bool_to_int(todo.done),
                        todo.priority,
                    ],
                )?;
                id
            }
        };

        Ok(Todo {
            id: Some(id),
            ..todo.clone()
        })
    }

    fn delete(&self, todo: &Todo) -> RepoResult<()> {
        let id = todo.id.ok_or(RepoError::MissingId)?;
        let changed = self.conn.execute("DELETE FROM todos WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

/// Counts all rows in `todos`.
pub fn count_todos(conn: &Connection) -> RepoResult<u64> {
    let total: i64 = conn.query_row("SELECT COUNT(*) FROM todos;", [], |row| row.get(0))?;
    u64::try_from(total).map_err(|_| RepoError::InvalidData(format!("negative row count `{total}`")))
}

fn parse_todo_row(row: &Row<'_>) -> RepoResult<Todo> {
    let done = match row.get::<_, i64>("done")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid done value `{other}` in todos.done"
            )));
        }
    };

    let id: TodoId = row.get("id")?;
    let todo = Todo {
        id: Some(id),
        name: row.get("name")?,
        description: row.get("description")?,
        done,
        priority: row.get("priority")?,
    };
    todo.validate()
        .map_err(|err| RepoError::InvalidData(format!("todo {id}: {err}")))?;
    Ok(todo)
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
