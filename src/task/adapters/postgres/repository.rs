//! `PostgreSQL` repository implementation for task lifecycle storage.
//!
//! The propose and reject operations call the store's
//! `propose_task_status` / `reject_task_proposal` functions so the status
//! change and its comment commit in one transaction; this adapter never
//! orchestrates them as separate statements.

use super::{
    models::{CommentRow, NewTaskRow, TaskChangeset, TaskRow},
    schema::{task_comments, tasks},
};
use crate::project::domain::ProjectId;
use crate::task::{
    domain::{
        CommentAuthor, CommentId, Page, PersistedCommentData, PersistedTaskData,
        PositionAssignment, Task, TaskComment, TaskFilters, TaskId, TaskListing, TaskPatch,
        TaskStatus,
    },
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use chrono::Utc;
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

impl From<DieselError> for TaskRepositoryError {
    fn from(err: DieselError) -> Self {
        // Constraint context is matched at the call sites that have it;
        // everything reaching this blanket conversion is opaque.
        Self::persistence(err)
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let project = task.project_id();
        let parent = task.parent_id();
        let position = task.position();
        let new_row = to_new_row(task);

        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if is_sibling_position_violation(info.as_ref()) =>
                    {
                        TaskRepositoryError::SiblingPositionTaken {
                            project,
                            parent,
                            position,
                        }
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list(
        &self,
        project_id: ProjectId,
        filters: &TaskFilters,
        page: &Page,
    ) -> TaskRepositoryResult<TaskListing> {
        let list_filters = *filters;
        let window = *page;
        self.run_blocking(move |connection| {
            let total_rows: i64 = apply_filters(
                tasks::table.select(diesel::dsl::count_star()).into_boxed(),
                project_id,
                &list_filters,
            )
            .first(connection)
            .map_err(TaskRepositoryError::persistence)?;

            let rows = apply_filters(
                tasks::table.select(TaskRow::as_select()).into_boxed(),
                project_id,
                &list_filters,
            )
            .order(tasks::position.asc())
            .offset(window.offset())
            .limit(i64::from(window.limit()))
            .load::<TaskRow>(connection)
            .map_err(TaskRepositoryError::persistence)?;

            let tasks = rows
                .into_iter()
                .map(row_to_task)
                .collect::<TaskRepositoryResult<Vec<Task>>>()?;
            let total = u64::try_from(total_rows).map_err(TaskRepositoryError::persistence)?;
            Ok(TaskListing { tasks, total })
        })
        .await
    }

    async fn max_position(
        &self,
        project_id: ProjectId,
        parent_id: Option<TaskId>,
    ) -> TaskRepositoryResult<Option<i32>> {
        self.run_blocking(move |connection| {
            let scoped = tasks::table.filter(tasks::project_id.eq(project_id.into_inner()));
            let highest = match parent_id {
                Some(parent) => scoped
                    .filter(tasks::parent_id.eq(parent.into_inner()))
                    .select(diesel::dsl::max(tasks::position))
                    .first::<Option<i32>>(connection),
                None => scoped
                    .filter(tasks::parent_id.is_null())
                    .select(diesel::dsl::max(tasks::position))
                    .first::<Option<i32>>(connection),
            }
            .map_err(TaskRepositoryError::persistence)?;
            Ok(highest)
        })
        .await
    }

    async fn update(
        &self,
        id: TaskId,
        patch: &TaskPatch,
        project_scope: Option<ProjectId>,
    ) -> TaskRepositoryResult<Task> {
        let changeset = to_changeset(patch);
        self.run_blocking(move |connection| {
            let target = diesel::update(tasks::table).filter(tasks::id.eq(id.into_inner()));
            let row = match project_scope {
                Some(scope) => target
                    .filter(tasks::project_id.eq(scope.into_inner()))
                    .set(&changeset)
                    .get_result::<TaskRow>(connection)
                    .optional(),
                None => target
                    .set(&changeset)
                    .get_result::<TaskRow>(connection)
                    .optional(),
            }
            .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task)
                .transpose()?
                .ok_or(TaskRepositoryError::NotFound(id))
        })
        .await
    }

    async fn set_status(&self, id: TaskId, status: TaskStatus) -> TaskRepositoryResult<Task> {
        self.run_blocking(move |connection| {
            let row = diesel::update(tasks::table)
                .filter(tasks::id.eq(id.into_inner()))
                .set((
                    tasks::status_id.eq(status.as_id()),
                    tasks::updated_at.eq(Utc::now()),
                ))
                .get_result::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task)
                .transpose()?
                .ok_or(TaskRepositoryError::NotFound(id))
        })
        .await
    }

    async fn propose_status(
        &self,
        id: TaskId,
        pending_status: TaskStatus,
        comment: &str,
    ) -> TaskRepositoryResult<Task> {
        let comment_text = comment.to_owned();
        self.run_blocking(move |connection| {
            let row = diesel::sql_query(concat!(
                "SELECT id, project_id, parent_id, title, description, status_id, position, ",
                "is_delegated, created_by_ai, created_at, updated_at ",
                "FROM propose_task_status($1, $2, $3, $4)",
            ))
            .bind::<diesel::sql_types::Uuid, _>(id.into_inner())
            .bind::<diesel::sql_types::SmallInt, _>(pending_status.as_id())
            .bind::<diesel::sql_types::Text, _>(comment_text)
            .bind::<diesel::sql_types::Bool, _>(true)
            .get_result::<TaskRow>(connection)
            .optional()
            .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task)
                .transpose()?
                .ok_or(TaskRepositoryError::NotFound(id))
        })
        .await
    }

    async fn reject_proposal(&self, id: TaskId, comment: &str) -> TaskRepositoryResult<Task> {
        let comment_text = comment.to_owned();
        self.run_blocking(move |connection| {
            let row = diesel::sql_query(concat!(
                "SELECT id, project_id, parent_id, title, description, status_id, position, ",
                "is_delegated, created_by_ai, created_at, updated_at ",
                "FROM reject_task_proposal($1, $2)",
            ))
            .bind::<diesel::sql_types::Uuid, _>(id.into_inner())
            .bind::<diesel::sql_types::Text, _>(comment_text)
            .get_result::<TaskRow>(connection)
            .optional()
            .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task)
                .transpose()?
                .ok_or(TaskRepositoryError::NotFound(id))
        })
        .await
    }

    async fn reorder(&self, assignments: &[PositionAssignment]) -> TaskRepositoryResult<()> {
        let batch = assignments.to_vec();
        self.run_blocking(move |connection| {
            // The sibling-position index is deferred, so intra-batch swaps
            // stay legal until commit.
            connection.transaction::<(), TaskRepositoryError, _>(|inner| {
                let now = Utc::now();
                for assignment in &batch {
                    let updated = diesel::update(tasks::table)
                        .filter(tasks::id.eq(assignment.task_id.into_inner()))
                        .set((
                            tasks::position.eq(assignment.position),
                            tasks::updated_at.eq(now),
                        ))
                        .execute(inner)?;
                    if updated == 0 {
                        return Err(TaskRepositoryError::NotFound(assignment.task_id));
                    }
                }
                Ok(())
            })
        })
        .await
    }

    async fn comments_for(&self, task_id: TaskId) -> TaskRepositoryResult<Vec<TaskComment>> {
        self.run_blocking(move |connection| {
            let rows = task_comments::table
                .filter(task_comments::task_id.eq(task_id.into_inner()))
                .order(task_comments::created_at.asc())
                .select(CommentRow::as_select())
                .load::<CommentRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            Ok(rows.into_iter().map(row_to_comment).collect())
        })
        .await
    }
}

type BoxedTaskQuery<'a, ST> = tasks::BoxedQuery<'a, Pg, ST>;

fn apply_filters<'a, ST>(
    query: BoxedTaskQuery<'a, ST>,
    project_id: ProjectId,
    filters: &TaskFilters,
) -> BoxedTaskQuery<'a, ST> {
    let mut scoped = query.filter(tasks::project_id.eq(project_id.into_inner()));
    scoped = match filters.parent_id() {
        Some(parent) => scoped.filter(tasks::parent_id.eq(parent.into_inner())),
        None => scoped.filter(tasks::parent_id.is_null()),
    };
    if let Some(status) = filters.status() {
        scoped = scoped.filter(tasks::status_id.eq(status.as_id()));
    }
    if let Some(delegated) = filters.delegated() {
        scoped = scoped.filter(tasks::is_delegated.eq(delegated));
    }
    scoped
}

fn to_new_row(task: &Task) -> NewTaskRow {
    NewTaskRow {
        id: task.id().into_inner(),
        project_id: task.project_id().into_inner(),
        parent_id: task.parent_id().map(TaskId::into_inner),
        title: task.title().to_owned(),
        description: task.description().map(ToOwned::to_owned),
        status_id: task.status().as_id(),
        position: task.position(),
        is_delegated: task.is_delegated(),
        created_by_ai: task.created_by_ai(),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    }
}

fn to_changeset(patch: &TaskPatch) -> TaskChangeset {
    TaskChangeset {
        title: patch.title().map(ToOwned::to_owned),
        description: patch
            .description()
            .map(|value| value.map(ToOwned::to_owned)),
        status_id: patch.status().map(TaskStatus::as_id),
        is_delegated: patch.delegated(),
        updated_at: Utc::now(),
    }
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        project_id,
        parent_id,
        title,
        description,
        status_id,
        position,
        is_delegated,
        created_by_ai,
        created_at,
        updated_at,
    } = row;

    let status =
        TaskStatus::try_from(status_id).map_err(TaskRepositoryError::persistence)?;

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(id),
        project_id: ProjectId::from_uuid(project_id),
        parent_id: parent_id.map(TaskId::from_uuid),
        title,
        description,
        status,
        position,
        is_delegated,
        created_by_ai,
        created_at,
        updated_at,
    }))
}

fn row_to_comment(row: CommentRow) -> TaskComment {
    let CommentRow {
        id,
        task_id,
        comment,
        author_is_ai,
        created_at,
    } = row;

    let author = if author_is_ai {
        CommentAuthor::AiAgent
    } else {
        CommentAuthor::Human
    };
    TaskComment::from_persisted(PersistedCommentData {
        id: CommentId::from_uuid(id),
        task_id: TaskId::from_uuid(task_id),
        body: comment,
        author,
        created_at,
    })
}

fn is_sibling_position_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name == "idx_tasks_sibling_position_unique")
}
