//! Listing filters, ordering and the raw query-parameter boundary.

use super::{ParseSortError, TaskFilterError, TaskPriority, TaskStatus};
use crate::category::domain::CategoryId;
use crate::pagination::{DEFAULT_PER_PAGE, PageRequest};
use crate::user::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Restricts a listing by whether tasks carry a completion timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionFilter {
    /// Only tasks with `completed_at` set (`completed=yes`).
    Completed,
    /// Only tasks without `completed_at` (`completed=no`).
    Incomplete,
}

impl CompletionFilter {
    /// Maps the `yes`/`no` query token; any other value applies no filter.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "yes" => Some(Self::Completed),
            "no" => Some(Self::Incomplete),
            _ => None,
        }
    }

    /// Returns `true` when a task with the given completion timestamp
    /// presence passes the filter.
    #[must_use]
    pub const fn accepts(self, has_completed_at: bool) -> bool {
        match self {
            Self::Completed => has_completed_at,
            Self::Incomplete => !has_completed_at,
        }
    }
}

/// Equality and presence filters for task listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilters {
    /// Only tasks in this status.
    pub status: Option<TaskStatus>,
    /// Only tasks with this priority.
    pub priority: Option<TaskPriority>,
    /// Only completed or only open tasks.
    pub completion: Option<CompletionFilter>,
    /// Only tasks associated with this category.
    pub category: Option<CategoryId>,
    /// Requested page size; [`DEFAULT_PER_PAGE`] when absent.
    pub per_page: Option<u32>,
    /// Requested one-based page; the first page when absent.
    pub page: Option<u32>,
}

impl TaskFilters {
    /// Creates an empty filter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Filters by status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Filters by priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Filters by completion.
    #[must_use]
    pub const fn with_completion(mut self, completion: CompletionFilter) -> Self {
        self.completion = Some(completion);
        self
    }

    /// Filters by associated category.
    #[must_use]
    pub const fn with_category(mut self, category: CategoryId) -> Self {
        self.category = Some(category);
        self
    }

    /// Sets the page size.
    #[must_use]
    pub const fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    /// Sets the one-based page number.
    #[must_use]
    pub const fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Resolves the page window, substituting defaults for absent values.
    #[must_use]
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(
            self.page.unwrap_or(1),
            self.per_page.unwrap_or(DEFAULT_PER_PAGE),
        )
    }
}

/// Listing parameters as received from a query string.
///
/// Empty values count as absent, matching how form submissions send
/// unselected filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTaskFilters {
    /// Status token.
    pub status: Option<String>,
    /// Priority token.
    pub priority: Option<String>,
    /// `yes` or `no`.
    pub completed: Option<String>,
    /// Category UUID.
    pub category_id: Option<String>,
    /// Page size.
    pub per_page: Option<String>,
    /// One-based page number.
    pub page: Option<String>,
}

impl TryFrom<RawTaskFilters> for TaskFilters {
    type Error = TaskFilterError;

    fn try_from(raw: RawTaskFilters) -> Result<Self, Self::Error> {
        let status = present(raw.status.as_deref())
            .map(TaskStatus::try_from)
            .transpose()?;
        let priority = present(raw.priority.as_deref())
            .map(TaskPriority::try_from)
            .transpose()?;
        let completion = present(raw.completed.as_deref()).and_then(CompletionFilter::from_token);
        let category = present(raw.category_id.as_deref())
            .map(|value| {
                Uuid::parse_str(value)
                    .map(CategoryId::from_uuid)
                    .map_err(|_| TaskFilterError::Category(value.to_owned()))
            })
            .transpose()?;
        let per_page = parse_count("per_page", raw.per_page.as_deref())?;
        let page = parse_count("page", raw.page.as_deref())?;

        Ok(Self {
            status,
            priority,
            completion,
            category,
            per_page,
            page,
        })
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.is_empty())
}

fn parse_count(
    parameter: &'static str,
    value: Option<&str>,
) -> Result<Option<u32>, TaskFilterError> {
    present(value)
        .map(|text| {
            text.parse::<u32>()
                .map_err(|_| TaskFilterError::Pagination {
                    parameter,
                    value: text.to_owned(),
                })
        })
        .transpose()
}

/// Sortable task columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskSortField {
    /// Creation timestamp.
    CreatedAt,
    /// Latest modification timestamp.
    UpdatedAt,
    /// Due date; tasks without one sort as if later than any date.
    DueDate,
    /// Completion timestamp; open tasks sort as if later than any time.
    CompletedAt,
    /// Priority, by urgency rank.
    Priority,
    /// Status, by workflow order.
    Status,
    /// Title, lexicographically.
    Title,
}

impl TaskSortField {
    /// Returns the column name used in queries and query strings.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::DueDate => "due_date",
            Self::CompletedAt => "completed_at",
            Self::Priority => "priority",
            Self::Status => "status",
            Self::Title => "title",
        }
    }
}

impl TryFrom<&str> for TaskSortField {
    type Error = ParseSortError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "created_at" => Ok(Self::CreatedAt),
            "updated_at" => Ok(Self::UpdatedAt),
            "due_date" => Ok(Self::DueDate),
            "completed_at" => Ok(Self::CompletedAt),
            "priority" => Ok(Self::Priority),
            "status" => Ok(Self::Status),
            "title" => Ok(Self::Title),
            _ => Err(ParseSortError::UnknownField(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskSortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction; descending unless stated otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Smallest first.
    Asc,
    /// Largest first.
    #[default]
    Desc,
}

impl TryFrom<&str> for SortDirection {
    type Error = ParseSortError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(ParseSortError::UnknownDirection(value.to_owned())),
        }
    }
}

/// Requested listing order.
///
/// Without a field the listing is ordered newest first and the direction
/// is ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskSort {
    /// Column to order by.
    pub field: Option<TaskSortField>,
    /// Direction applied to `field`.
    pub direction: SortDirection,
}

impl TaskSort {
    /// Orders by `field` in `direction`.
    #[must_use]
    pub const fn by(field: TaskSortField, direction: SortDirection) -> Self {
        Self {
            field: Some(field),
            direction,
        }
    }

    /// Parses the `sort_by` and `sort_direction` query parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ParseSortError`] when either value is present but unknown.
    pub fn parse(field: Option<&str>, direction: Option<&str>) -> Result<Self, ParseSortError> {
        let parsed_field = present(field).map(TaskSortField::try_from).transpose()?;
        let parsed_direction = present(direction)
            .map(SortDirection::try_from)
            .transpose()?
            .unwrap_or_default();
        Ok(Self {
            field: parsed_field,
            direction: parsed_direction,
        })
    }

    /// Returns the effective column and direction after defaulting.
    #[must_use]
    pub const fn resolved(self) -> (TaskSortField, SortDirection) {
        match self.field {
            Some(field) => (field, self.direction),
            None => (TaskSortField::CreatedAt, SortDirection::Desc),
        }
    }
}

/// Complete listing query handed to a [`crate::task::ports::TaskRepository`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskQuery {
    /// Filters to apply.
    pub filters: TaskFilters,
    /// Ordering to apply.
    pub sort: TaskSort,
    /// Restrict to tasks owned by this user.
    pub owner: Option<UserId>,
}

impl TaskQuery {
    /// Creates a query from its parts.
    #[must_use]
    pub const fn new(filters: TaskFilters, sort: TaskSort, owner: Option<UserId>) -> Self {
        Self {
            filters,
            sort,
            owner,
        }
    }

    /// Resolves the page window.
    #[must_use]
    pub fn page_request(&self) -> PageRequest {
        self.filters.page_request()
    }
}
