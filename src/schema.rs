//! Diesel schema shared by the `PostgreSQL` adapters.

diesel::table! {
    /// Task records.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Owning user.
        user_id -> Uuid,
        /// Task title.
        #[max_length = 255]
        title -> Varchar,
        /// Free-form description.
        description -> Text,
        /// Status token.
        #[max_length = 20]
        status -> Varchar,
        /// Priority token.
        #[max_length = 20]
        priority -> Varchar,
        /// Optional due date.
        due_date -> Nullable<Date>,
        /// Completion timestamp, set iff the status is `completed`.
        completed_at -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// User-owned categories.
    categories (id) {
        /// Category identifier.
        id -> Uuid,
        /// Owning user.
        user_id -> Uuid,
        /// Category name.
        #[max_length = 255]
        name -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Task to category associations.
    category_task (task_id, category_id) {
        /// Associated task.
        task_id -> Uuid,
        /// Associated category.
        category_id -> Uuid,
    }
}

diesel::joinable!(category_task -> tasks (task_id));
diesel::joinable!(category_task -> categories (category_id));

diesel::allow_tables_to_appear_in_same_query!(tasks, categories, category_task);
