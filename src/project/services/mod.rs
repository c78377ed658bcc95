//! Application services for project administration.

mod admin;

pub use admin::{
    CreateProjectRequest, ProjectAdminError, ProjectAdminResult, ProjectAdminService,
    UpdateProjectRequest,
};
