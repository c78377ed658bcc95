//! Application services for the task lifecycle and delegation protocol.

mod error;
mod lifecycle;
mod position;

pub use error::{TaskServiceError, TaskServiceResult};
pub use lifecycle::{
    CreateTaskRequest, ListTasksRequest, ProposeStatusRequest, ReorderTasksRequest,
    TaskLifecycleService,
};
pub use position::next_position;
