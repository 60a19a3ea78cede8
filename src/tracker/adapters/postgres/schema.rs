//! Diesel schema for tracker persistence.

diesel::table! {
    /// Registered users.
    users (id) {
        /// User identifier.
        id -> Uuid,
        /// Unique handle.
        #[max_length = 150]
        username -> Varchar,
        /// Email address.
        #[max_length = 254]
        email -> Varchar,
        /// Given name.
        #[max_length = 150]
        first_name -> Varchar,
        /// Family name.
        #[max_length = 150]
        last_name -> Varchar,
        /// Registration timestamp.
        date_joined -> Timestamptz,
    }
}

diesel::table! {
    /// Projects.
    projects (id) {
        /// Project identifier.
        id -> Uuid,
        /// Project name.
        #[max_length = 200]
        name -> Varchar,
        /// Free-form description.
        description -> Text,
        /// Creator.
        created_by -> Uuid,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Project team membership.
    project_members (project_id, user_id) {
        /// Project.
        project_id -> Uuid,
        /// Team member.
        user_id -> Uuid,
    }
}

diesel::table! {
    /// Tasks.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Task title.
        #[max_length = 200]
        title -> Varchar,
        /// Free-form description.
        description -> Text,
        /// Owning project.
        project_id -> Uuid,
        /// Creator.
        created_by -> Uuid,
        /// Optional assignee.
        assigned_to -> Nullable<Uuid>,
        /// Workflow status.
        #[max_length = 20]
        status -> Varchar,
        /// Priority.
        #[max_length = 20]
        priority -> Varchar,
        /// Optional deadline.
        due_date -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Task comments.
    comments (id) {
        /// Comment identifier.
        id -> Uuid,
        /// Commented task.
        task_id -> Uuid,
        /// Author.
        author_id -> Uuid,
        /// Comment body.
        body -> Text,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last edit timestamp.
        edited_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Append-only activity log. `project_id` carries no
    /// foreign key so entries survive project deletion.
    activities (id) {
        /// Entry identifier.
        id -> Uuid,
        /// Project the entry belongs to.
        project_id -> Uuid,
        /// Acting user.
        actor_id -> Uuid,
        /// Action label.
        #[max_length = 200]
        action -> Varchar,
        /// Human-readable details.
        details -> Text,
        /// When the change happened.
        occurred_at -> Timestamptz,
        /// Insertion order, used to break timestamp ties.
        seq -> Int8,
    }
}

diesel::joinable!(project_members -> projects (project_id));
diesel::joinable!(tasks -> projects (project_id));
diesel::joinable!(comments -> tasks (task_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    projects,
    project_members,
    tasks,
    comments,
    activities,
);
