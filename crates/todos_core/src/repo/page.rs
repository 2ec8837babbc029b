//! Paging and sorting value types shared by repository and service.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Sortable todo columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Name,
    Description,
    Done,
    Priority,
}

impl SortField {
    /// Parses a field name case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "id" => Some(Self::Id),
            "name" => Some(Self::Name),
            "description" => Some(Self::Description),
            "done" => Some(Self::Done),
            "priority" => Some(Self::Priority),
            _ => None,
        }
    }

    /// Column name in the `todos` table.
    pub fn column(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Description => "description",
            Self::Done => "done",
            Self::Priority => "priority",
        }
    }
}

impl Display for SortField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Sort {
    pub fn asc(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Desc,
        }
    }
}

/// Effective paging parameters for one `find_all` call.
///
/// # Invariants
/// - `page_size` is at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    page_size: u32,
    sort: Sort,
}

impl PageRequest {
    pub fn new(page: u32, page_size: u32, sort: Sort) -> Self {
        Self {
            page,
            page_size: page_size.max(1),
            sort,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn sort(&self) -> Sort {
        self.sort
    }

    /// Row offset of the first item on this page.
    pub fn offset(&self) -> i64 {
        i64::from(self.page).saturating_mul(i64::from(self.page_size))
    }
}

/// One slice of a sorted collection plus navigation metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: u64) -> Self {
        let page_size = request.page_size();
        Self {
            content,
            page: request.page(),
            page_size,
            total_elements,
            total_pages: total_elements.div_ceil(u64::from(page_size)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}
