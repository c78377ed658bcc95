//! Partial task updates.

use super::TaskStatus;

/// Partial update over a task's mutable fields.
///
/// Absent fields are left untouched. The description is doubly optional:
/// `with_description(None)` clears the stored value, while an unset field
/// keeps it. Status and delegation are human-only under direct update; the
/// field-level lock lives in [`super::access::patch_access`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    title: Option<String>,
    description: Option<Option<String>>,
    status: Option<TaskStatus>,
    is_delegated: Option<bool>,
}

impl TaskPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a replacement title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets a replacement description; `None` clears the stored value.
    #[must_use]
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    /// Sets a replacement status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the delegation flag.
    #[must_use]
    pub const fn with_delegated(mut self, delegated: bool) -> Self {
        self.is_delegated = Some(delegated);
        self
    }

    /// Returns the replacement title, if set.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Returns the replacement description, if set; the inner `None`
    /// clears the stored value.
    #[must_use]
    pub fn description(&self) -> Option<Option<&str>> {
        self.description.as_ref().map(Option::as_deref)
    }

    /// Returns the replacement status, if set.
    #[must_use]
    pub const fn status(&self) -> Option<TaskStatus> {
        self.status
    }

    /// Returns the replacement delegation flag, if set.
    #[must_use]
    pub const fn delegated(&self) -> Option<bool> {
        self.is_delegated
    }

    /// Returns `true` when no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.is_delegated.is_none()
    }

    /// Returns `true` when the patch touches status or delegation, the
    /// fields reserved for human actors.
    #[must_use]
    pub const fn touches_protected_fields(&self) -> bool {
        self.status.is_some() || self.is_delegated.is_some()
    }
}
