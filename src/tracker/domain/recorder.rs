//! Derivation of activity entries from before/after snapshots.
//!
//! The recorder is pure: it never touches storage. Callers commit the
//! returned entries together with the mutation they describe.

use super::{Activity, ActivityAction, Comment, Project, ProjectId, Task, User, UserId, Username};
use mockable::Clock;
use std::collections::HashMap;

/// Borrowed view of an entity at one point in time.
#[derive(Debug, Clone, Copy)]
pub enum Snapshot<'a> {
    /// A project.
    Project(&'a Project),
    /// A task.
    Task(&'a Task),
    /// A comment together with the task it belongs to.
    Comment {
        /// The comment.
        comment: &'a Comment,
        /// The commented task.
        task: &'a Task,
    },
}

/// A mutation observed by the recorder.
#[derive(Debug, Clone, Copy)]
pub enum EntityChange<'a> {
    /// The entity was created.
    Created(Snapshot<'a>),
    /// The entity was modified.
    Updated {
        /// State before the mutation.
        before: Snapshot<'a>,
        /// State after the mutation.
        after: Snapshot<'a>,
    },
    /// The entity was deleted.
    Deleted(Snapshot<'a>),
}

/// Display names for users mentioned in activity details.
///
/// Unknown users are rendered by identifier.
#[derive(Debug, Clone, Default)]
pub struct UserNames(HashMap<UserId, Username>);

impl UserNames {
    /// Creates an empty name table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user's handle.
    pub fn insert(&mut self, user: &User) {
        self.0.insert(user.id(), user.username().clone());
    }

    /// Returns the display name for `user`.
    #[must_use]
    pub fn display(&self, user: UserId) -> String {
        self.0
            .get(&user)
            .map_or_else(|| user.to_string(), |name| name.as_str().to_owned())
    }

    fn display_optional(&self, user: Option<UserId>) -> String {
        user.map_or_else(|| "nobody".to_owned(), |id| self.display(id))
    }
}

impl<'a> FromIterator<&'a User> for UserNames {
    fn from_iter<I: IntoIterator<Item = &'a User>>(iter: I) -> Self {
        let mut names = Self::new();
        for user in iter {
            names.insert(user);
        }
        names
    }
}

/// Produces activity entries for one actor.
pub struct ActivityRecorder<'a, C: Clock> {
    actor: UserId,
    names: &'a UserNames,
    clock: &'a C,
}

impl<'a, C: Clock> ActivityRecorder<'a, C> {
    /// Creates a recorder attributing entries to `actor`.
    #[must_use]
    pub const fn new(actor: UserId, names: &'a UserNames, clock: &'a C) -> Self {
        Self {
            actor,
            names,
            clock,
        }
    }

    /// Returns the entries describing `change`.
    ///
    /// Updates emit one entry per tracked field that differs: task status,
    /// assignee and priority, and each project team member added or removed.
    /// Comment edits and untracked fields emit nothing, as do updates whose
    /// snapshots describe different kinds of entity.
    #[must_use]
    pub fn record(&self, change: EntityChange<'_>) -> Vec<Activity> {
        match change {
            EntityChange::Created(snapshot) => vec![self.lifecycle_entry(snapshot, true)],
            EntityChange::Deleted(snapshot) => vec![self.lifecycle_entry(snapshot, false)],
            EntityChange::Updated {
                before: Snapshot::Project(before),
                after: Snapshot::Project(after),
            } => self.membership_entries(before, after),
            EntityChange::Updated {
                before: Snapshot::Task(before),
                after: Snapshot::Task(after),
            } => self.task_field_entries(before, after),
            EntityChange::Updated { .. } => Vec::new(),
        }
    }

    fn lifecycle_entry(&self, snapshot: Snapshot<'_>, created: bool) -> Activity {
        let actor = self.names.display(self.actor);
        let (project_id, action, details) = match snapshot {
            Snapshot::Project(project) if created => (
                project.id(),
                ActivityAction::CreatedProject,
                format!("{actor} created project '{}'", project.name()),
            ),
            Snapshot::Project(project) => (
                project.id(),
                ActivityAction::DeletedProject,
                format!("{actor} deleted project '{}'", project.name()),
            ),
            Snapshot::Task(task) if created => (
                task.project_id(),
                ActivityAction::CreatedTask,
                format!("{actor} created task '{}'", task.title()),
            ),
            Snapshot::Task(task) => (
                task.project_id(),
                ActivityAction::DeletedTask,
                format!("{actor} deleted task '{}'", task.title()),
            ),
            Snapshot::Comment { task, .. } if created => (
                task.project_id(),
                ActivityAction::AddedComment,
                format!("{actor} commented on '{}'", task.title()),
            ),
            Snapshot::Comment { task, .. } => (
                task.project_id(),
                ActivityAction::DeletedComment,
                format!("{actor} deleted a comment on '{}'", task.title()),
            ),
        };
        self.entry(project_id, action, details)
    }

    fn membership_entries(&self, before: &Project, after: &Project) -> Vec<Activity> {
        let actor = self.names.display(self.actor);
        let added = after
            .team_members()
            .difference(before.team_members())
            .map(|member| {
                self.entry(
                    after.id(),
                    ActivityAction::AddedTeamMember,
                    format!(
                        "{actor} added {} to '{}'",
                        self.names.display(*member),
                        after.name()
                    ),
                )
            });
        let removed = before
            .team_members()
            .difference(after.team_members())
            .map(|member| {
                self.entry(
                    after.id(),
                    ActivityAction::RemovedTeamMember,
                    format!(
                        "{actor} removed {} from '{}'",
                        self.names.display(*member),
                        after.name()
                    ),
                )
            });
        added.chain(removed).collect()
    }

    fn task_field_entries(&self, before: &Task, after: &Task) -> Vec<Activity> {
        let actor = self.names.display(self.actor);
        let title = after.title();
        let mut entries = Vec::new();

        if before.status() != after.status() {
            entries.push(self.entry(
                after.project_id(),
                ActivityAction::ChangedTaskStatus,
                format!(
                    "{actor} moved '{title}' from {} to {}",
                    before.status(),
                    after.status()
                ),
            ));
        }

        if before.assigned_to() != after.assigned_to() {
            let previous = self.names.display_optional(before.assigned_to());
            let entry = match after.assigned_to() {
                Some(assignee) => self.entry(
                    after.project_id(),
                    ActivityAction::AssignedTask,
                    format!(
                        "{actor} assigned '{title}' to {} (previously {previous})",
                        self.names.display(assignee)
                    ),
                ),
                None => self.entry(
                    after.project_id(),
                    ActivityAction::UnassignedTask,
                    format!("{actor} unassigned {previous} from '{title}'"),
                ),
            };
            entries.push(entry);
        }

        if before.priority() != after.priority() {
            entries.push(self.entry(
                after.project_id(),
                ActivityAction::ChangedTaskPriority,
                format!(
                    "{actor} changed priority of '{title}' from {} to {}",
                    before.priority(),
                    after.priority()
                ),
            ));
        }

        entries
    }

    fn entry(&self, project_id: ProjectId, action: ActivityAction, details: String) -> Activity {
        Activity::new(project_id, self.actor, action, details, self.clock.utc())
    }
}
