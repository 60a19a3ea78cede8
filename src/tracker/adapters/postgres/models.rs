//! Diesel row models for tracker persistence.

use super::schema::{activities, comments, project_members, projects, tasks, users};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

/// User record.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    /// User identifier.
    pub id: Uuid,
    /// Unique handle.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Registration timestamp.
    pub date_joined: DateTime<Utc>,
}

/// Project record, without its team.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProjectRow {
    /// Project identifier.
    pub id: Uuid,
    /// Project name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Creator.
    pub created_by: Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Team membership record.
#[derive(Debug, Clone, Copy, Queryable, Selectable, Insertable)]
#[diesel(table_name = project_members)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProjectMemberRow {
    /// Project.
    pub project_id: Uuid,
    /// Team member.
    pub user_id: Uuid,
}

/// Task record.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct TaskRow {
    /// Task identifier.
    pub id: Uuid,
    /// Task title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Owning project.
    pub project_id: Uuid,
    /// Creator.
    pub created_by: Uuid,
    /// Optional assignee.
    pub assigned_to: Option<Uuid>,
    /// Workflow status.
    pub status: String,
    /// Priority.
    pub priority: String,
    /// Optional deadline.
    pub due_date: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Comment record.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct CommentRow {
    /// Comment identifier.
    pub id: Uuid,
    /// Commented task.
    pub task_id: Uuid,
    /// Author.
    pub author_id: Uuid,
    /// Comment body.
    pub body: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last edit timestamp.
    pub edited_at: Option<DateTime<Utc>>,
}

/// Query result row for activity entries.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = activities)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ActivityRow {
    /// Entry identifier.
    pub id: Uuid,
    /// Project the entry belongs to.
    pub project_id: Uuid,
    /// Acting user.
    pub actor_id: Uuid,
    /// Action label.
    pub action: String,
    /// Human-readable details.
    pub details: String,
    /// When the change happened.
    pub occurred_at: DateTime<Utc>,
}

/// Insert model for activity entries; `seq` is assigned by the database.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = activities)]
pub struct NewActivityRow {
    /// Entry identifier.
    pub id: Uuid,
    /// Project the entry belongs to.
    pub project_id: Uuid,
    /// Acting user.
    pub actor_id: Uuid,
    /// Action label.
    pub action: String,
    /// Human-readable details.
    pub details: String,
    /// When the change happened.
    pub occurred_at: DateTime<Utc>,
}
