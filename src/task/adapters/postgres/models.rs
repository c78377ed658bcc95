//! Diesel row models for task persistence.

use super::schema::{task_comments, tasks};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for task records.
///
/// Also derives `QueryableByName` because the propose/reject procedures
/// are invoked through `sql_query` and return task rows.
#[derive(Debug, Clone, Queryable, QueryableByName, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    #[diesel(sql_type = diesel::sql_types::Uuid)]
    pub id: uuid::Uuid,
    /// Owning project identifier.
    #[diesel(sql_type = diesel::sql_types::Uuid)]
    pub project_id: uuid::Uuid,
    /// Optional parent task identifier.
    #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::Uuid>)]
    pub parent_id: Option<uuid::Uuid>,
    /// Task title.
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    pub title: String,
    /// Optional description.
    #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::Text>)]
    pub description: Option<String>,
    /// Status identifier.
    #[diesel(sql_type = diesel::sql_types::SmallInt)]
    pub status_id: i16,
    /// Sibling position.
    #[diesel(sql_type = diesel::sql_types::Int4)]
    pub position: i32,
    /// Delegation flag.
    #[diesel(sql_type = diesel::sql_types::Bool)]
    pub is_delegated: bool,
    /// Creation-origin flag.
    #[diesel(sql_type = diesel::sql_types::Bool)]
    pub created_by_ai: bool,
    /// Creation timestamp.
    #[diesel(sql_type = diesel::sql_types::Timestamptz)]
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    #[diesel(sql_type = diesel::sql_types::Timestamptz)]
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning project identifier.
    pub project_id: uuid::Uuid,
    /// Optional parent task identifier.
    pub parent_id: Option<uuid::Uuid>,
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Status identifier.
    pub status_id: i16,
    /// Sibling position.
    pub position: i32,
    /// Delegation flag.
    pub is_delegated: bool,
    /// Creation-origin flag.
    pub created_by_ai: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Changeset for partial task updates.
///
/// `None` fields are skipped; the doubly optional description writes SQL
/// `NULL` for an inner `None`. `updated_at` is always written.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
pub struct TaskChangeset {
    /// Replacement title, if set.
    pub title: Option<String>,
    /// Replacement description, if set; the inner `None` clears it.
    pub description: Option<Option<String>>,
    /// Replacement status identifier, if set.
    pub status_id: Option<i16>,
    /// Replacement delegation flag, if set.
    pub is_delegated: Option<bool>,
    /// Mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Query result row for task comments.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = task_comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CommentRow {
    /// Comment identifier.
    pub id: uuid::Uuid,
    /// Owning task identifier.
    pub task_id: uuid::Uuid,
    /// Comment body.
    pub comment: String,
    /// Authorship flag.
    pub author_is_ai: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
