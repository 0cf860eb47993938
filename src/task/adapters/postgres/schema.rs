//! Diesel schema for task persistence.

diesel::table! {
    /// Task records.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Title.
        #[max_length = 255]
        title -> Varchar,
        /// Optional description.
        description -> Nullable<Text>,
        /// Status storage string.
        #[max_length = 32]
        status -> Varchar,
        /// Priority storage string.
        #[max_length = 16]
        priority -> Varchar,
        /// Deadline.
        deadline -> Timestamptz,
        /// Optional planned start.
        start_date -> Nullable<Timestamptz>,
        /// Set while the task is completed.
        completed_at -> Nullable<Timestamptz>,
        /// Creating user.
        #[max_length = 255]
        creator_id -> Varchar,
        /// Owning team.
        team_id -> Nullable<Uuid>,
        /// Estimated effort in hours.
        estimated_hours -> Nullable<Float8>,
        /// Actual effort in hours.
        actual_hours -> Nullable<Float8>,
        /// Archived flag.
        archived -> Bool,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Subtasks owned by a task.
    sub_tasks (id) {
        /// Subtask identifier.
        id -> Uuid,
        /// Parent task.
        task_id -> Uuid,
        /// Title.
        #[max_length = 255]
        title -> Varchar,
        /// Optional description.
        description -> Nullable<Text>,
        /// Status storage string.
        #[max_length = 32]
        status -> Varchar,
        /// Priority storage string.
        #[max_length = 16]
        priority -> Varchar,
        /// Optional assignee.
        #[max_length = 255]
        assignee_id -> Nullable<Varchar>,
        /// Estimated effort in hours.
        estimated_hours -> Nullable<Float8>,
        /// Actual effort in hours.
        actual_hours -> Nullable<Float8>,
        /// Set while the subtask is completed.
        completed_at -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Comments and replies.
    comments (id) {
        /// Comment identifier.
        id -> Uuid,
        /// Body.
        text -> Text,
        /// Author.
        #[max_length = 255]
        author_id -> Varchar,
        /// Commented task, denormalised for subtask comments.
        task_id -> Uuid,
        /// Commented subtask.
        sub_task_id -> Nullable<Uuid>,
        /// Parent comment for replies.
        parent_id -> Nullable<Uuid>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Tags keyed by unique name.
    tags (id) {
        /// Tag identifier.
        id -> Uuid,
        /// Unique name.
        #[max_length = 50]
        name -> Varchar,
        /// `#rrggbb` color.
        #[max_length = 7]
        color -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Task assignee links.
    task_assignees (task_id, user_id) {
        /// Task.
        task_id -> Uuid,
        /// Assigned user.
        #[max_length = 255]
        user_id -> Varchar,
    }
}

diesel::table! {
    /// Task tag links.
    task_tags (task_id, tag_name) {
        /// Task.
        task_id -> Uuid,
        /// Tag name.
        #[max_length = 50]
        tag_name -> Varchar,
    }
}

diesel::table! {
    /// Related and prerequisite task links.
    task_related (task_id, related_id) {
        /// Task.
        task_id -> Uuid,
        /// Related task.
        related_id -> Uuid,
    }
}

diesel::joinable!(sub_tasks -> tasks (task_id));
diesel::joinable!(comments -> tasks (task_id));
diesel::joinable!(task_assignees -> tasks (task_id));
diesel::joinable!(task_tags -> tasks (task_id));

diesel::allow_tables_to_appear_in_same_query!(
    tasks,
    sub_tasks,
    comments,
    tags,
    task_assignees,
    task_tags,
    task_related,
);
