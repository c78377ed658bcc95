//! `PostgreSQL` repository implementation for project storage.

use super::{
    models::{NewProjectRow, ProjectRow},
    schema::projects,
};
use crate::project::{
    domain::{ApiKey, PersistedProjectData, Project, ProjectId, UserId},
    ports::{ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by project adapters.
pub type ProjectPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed project repository.
#[derive(Debug, Clone)]
pub struct PostgresProjectRepository {
    pool: ProjectPgPool,
}

impl PostgresProjectRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: ProjectPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> ProjectRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ProjectRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(ProjectRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(ProjectRepositoryError::persistence)?
    }
}

#[async_trait]
impl ProjectRepository for PostgresProjectRepository {
    async fn store(&self, project: &Project) -> ProjectRepositoryResult<()> {
        let project_id = project.id();
        let new_row = to_new_row(project);

        self.run_blocking(move |connection| {
            diesel::insert_into(projects::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        ProjectRepositoryError::DuplicateProject(project_id)
                    }
                    _ => ProjectRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, project: &Project) -> ProjectRepositoryResult<()> {
        let project_id = project.id();
        let name = project.name().to_owned();
        let description = project.description().map(ToOwned::to_owned);
        let api_key = project.api_key();

        self.run_blocking(move |connection| {
            let updated = diesel::update(
                projects::table.filter(projects::id.eq(project_id.into_inner())),
            )
            .set((
                projects::name.eq(name),
                projects::description.eq(description),
                projects::api_key.eq(api_key.into_inner()),
            ))
            .execute(connection)
            .map_err(ProjectRepositoryError::persistence)?;

            if updated == 0 {
                return Err(ProjectRepositoryError::NotFound(project_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: ProjectId) -> ProjectRepositoryResult<Option<Project>> {
        self.run_blocking(move |connection| {
            let row = projects::table
                .filter(projects::id.eq(id.into_inner()))
                .select(ProjectRow::as_select())
                .first::<ProjectRow>(connection)
                .optional()
                .map_err(ProjectRepositoryError::persistence)?;
            Ok(row.map(row_to_project))
        })
        .await
    }

    async fn find_by_api_key(&self, api_key: ApiKey) -> ProjectRepositoryResult<Option<Project>> {
        self.run_blocking(move |connection| {
            let row = projects::table
                .filter(projects::api_key.eq(api_key.into_inner()))
                .select(ProjectRow::as_select())
                .first::<ProjectRow>(connection)
                .optional()
                .map_err(ProjectRepositoryError::persistence)?;
            Ok(row.map(row_to_project))
        })
        .await
    }

    async fn list_for_user(&self, user_id: UserId) -> ProjectRepositoryResult<Vec<Project>> {
        self.run_blocking(move |connection| {
            let rows = projects::table
                .filter(projects::user_id.eq(user_id.into_inner()))
                .order(projects::created_at.desc())
                .select(ProjectRow::as_select())
                .load::<ProjectRow>(connection)
                .map_err(ProjectRepositoryError::persistence)?;
            Ok(rows.into_iter().map(row_to_project).collect())
        })
        .await
    }

    async fn delete(&self, id: ProjectId) -> ProjectRepositoryResult<()> {
        self.run_blocking(move |connection| {
            // Task rows cascade via the tasks.project_id foreign key.
            let deleted =
                diesel::delete(projects::table.filter(projects::id.eq(id.into_inner())))
                    .execute(connection)
                    .map_err(ProjectRepositoryError::persistence)?;
            if deleted == 0 {
                return Err(ProjectRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }
}

fn to_new_row(project: &Project) -> NewProjectRow {
    NewProjectRow {
        id: project.id().into_inner(),
        user_id: project.user_id().into_inner(),
        name: project.name().to_owned(),
        description: project.description().map(ToOwned::to_owned),
        api_key: project.api_key().into_inner(),
        created_at: project.created_at(),
    }
}

fn row_to_project(row: ProjectRow) -> Project {
    let ProjectRow {
        id,
        user_id,
        name,
        description,
        api_key,
        created_at,
    } = row;

    Project::from_persisted(PersistedProjectData {
        id: ProjectId::from_uuid(id),
        user_id: UserId::from_uuid(user_id),
        name,
        description,
        api_key: ApiKey::from_uuid(api_key),
        created_at,
    })
}
