//! Diesel schema for project persistence.

diesel::table! {
    /// Project records with ownership and API-key columns.
    projects (id) {
        /// Project identifier.
        id -> Uuid,
        /// Owning user identifier.
        user_id -> Uuid,
        /// Project name.
        #[max_length = 255]
        name -> Varchar,
        /// Optional free-text description.
        description -> Nullable<Text>,
        /// Secret API key bound to this project.
        api_key -> Uuid,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}
