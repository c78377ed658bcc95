//! Diesel schema for task lifecycle persistence.

diesel::table! {
    /// Task records with hierarchy, ordering, and delegation columns.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Owning project identifier.
        project_id -> Uuid,
        /// Optional parent task within the same project.
        parent_id -> Nullable<Uuid>,
        /// Task title.
        #[max_length = 255]
        title -> Varchar,
        /// Optional free-text description.
        description -> Nullable<Text>,
        /// Status identifier (1–5).
        status_id -> SmallInt,
        /// Position within the sibling scope; unique per
        /// `(project_id, parent_id)` via `idx_tasks_sibling_position_unique`
        /// (deferred, so reorder batches may swap positions).
        position -> Int4,
        /// Whether the task is delegated to the AI agent.
        is_delegated -> Bool,
        /// Whether the AI agent created the task.
        created_by_ai -> Bool,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last mutation timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Comments recorded by the propose/reject procedures.
    task_comments (id) {
        /// Comment identifier.
        id -> Uuid,
        /// Owning task identifier.
        task_id -> Uuid,
        /// Comment body.
        comment -> Text,
        /// Whether the AI agent authored the comment.
        author_is_ai -> Bool,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(task_comments -> tasks (task_id));

diesel::allow_tables_to_appear_in_same_query!(tasks, task_comments);
