//! Listing descriptions: filters, pagination, and the listing result.
//!
//! These types describe a listing without committing to a storage engine;
//! each adapter translates them into its own query calls.

use super::{Task, TaskDomainError, TaskId, TaskStatus};

/// Equality filters over one project's tasks.
///
/// A listing is always scoped to one sibling group: `parent_id = Some(p)`
/// selects the children of `p`, `None` selects the project's top-level
/// tasks. A listing never spans both a parent and its children.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilters {
    parent_id: Option<TaskId>,
    status: Option<TaskStatus>,
    delegated: Option<bool>,
}

impl TaskFilters {
    /// Creates a filter over the top-level sibling group with no further
    /// restrictions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the listing to the children of `parent_id`.
    #[must_use]
    pub const fn with_parent(mut self, parent_id: TaskId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Restricts the listing to one status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restricts the listing by delegation flag.
    #[must_use]
    pub const fn with_delegated(mut self, delegated: bool) -> Self {
        self.delegated = Some(delegated);
        self
    }

    /// Returns the parent restriction; `None` means the top-level group.
    #[must_use]
    pub const fn parent_id(&self) -> Option<TaskId> {
        self.parent_id
    }

    /// Returns the status restriction, if any.
    #[must_use]
    pub const fn status(&self) -> Option<TaskStatus> {
        self.status
    }

    /// Returns the delegation restriction, if any.
    #[must_use]
    pub const fn delegated(&self) -> Option<bool> {
        self.delegated
    }
}

/// One-indexed pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    page: u32,
    limit: u32,
}

impl Page {
    /// Creates a pagination window.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidPagination`] when `page` or
    /// `limit` is zero.
    pub const fn new(page: u32, limit: u32) -> Result<Self, TaskDomainError> {
        if page == 0 || limit == 0 {
            return Err(TaskDomainError::InvalidPagination);
        }
        Ok(Self { page, limit })
    }

    /// Returns the one-indexed page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Returns the page size.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Returns the number of rows to skip.
    #[must_use]
    pub const fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.limit as i64
    }

    /// Returns the page count for a listing of `total` rows.
    #[must_use]
    pub const fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.limit as u64)
    }
}

/// One page of tasks plus the total match count ignoring pagination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListing {
    /// The tasks inside the requested window, ordered by position.
    pub tasks: Vec<Task>,
    /// How many tasks matched the filters in total.
    pub total: u64,
}
