//! Project aggregate root and team membership.

use super::{ProjectId, TrackerDomainError, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Maximum length for a project name, matching the `VARCHAR(200)` column.
const MAX_PROJECT_NAME_LENGTH: usize = 200;

/// Validated, trimmed project name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectName(String);

impl ProjectName {
    /// Creates a validated project name.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerDomainError::EmptyProjectName`] when the value is empty
    /// after trimming or [`TrackerDomainError::ProjectNameTooLong`] when it
    /// exceeds 200 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, TrackerDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(TrackerDomainError::EmptyProjectName);
        }
        if normalized.chars().count() > MAX_PROJECT_NAME_LENGTH {
            return Err(TrackerDomainError::ProjectNameTooLong(raw));
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A project groups tasks and owns the team that may see them.
///
/// The creator is inserted into the team on construction and the aggregate
/// refuses to remove them, so `created_by ∈ team_members` holds for every
/// value of this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    name: ProjectName,
    description: String,
    created_by: UserId,
    team_members: BTreeSet<UserId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedProjectData {
    /// Persisted project identifier.
    pub id: ProjectId,
    /// Persisted name.
    pub name: ProjectName,
    /// Persisted description.
    pub description: String,
    /// Persisted creator.
    pub created_by: UserId,
    /// Persisted team, with or without the creator.
    pub team_members: BTreeSet<UserId>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Creates a new project whose team initially holds only its creator.
    #[must_use]
    pub fn new(
        name: ProjectName,
        description: impl Into<String>,
        created_by: UserId,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: ProjectId::new(),
            name,
            description: description.into(),
            created_by,
            team_members: BTreeSet::from([created_by]),
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a project from persisted storage, restoring the creator
    /// into the team if storage lost it.
    #[must_use]
    pub fn from_persisted(data: PersistedProjectData) -> Self {
        let mut team_members = data.team_members;
        team_members.insert(data.created_by);
        Self {
            id: data.id,
            name: data.name,
            description: data.description,
            created_by: data.created_by,
            team_members,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn id(&self) -> ProjectId {
        self.id
    }

    /// Returns the project name.
    #[must_use]
    pub const fn name(&self) -> &ProjectName {
        &self.name
    }

    /// Returns the project description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the immutable creator.
    #[must_use]
    pub const fn created_by(&self) -> UserId {
        self.created_by
    }

    /// Returns the team, creator included.
    #[must_use]
    pub const fn team_members(&self) -> &BTreeSet<UserId> {
        &self.team_members
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns whether `user` belongs to the team.
    #[must_use]
    pub fn is_member(&self, user: UserId) -> bool {
        self.team_members.contains(&user)
    }

    /// Returns whether `user` created the project.
    #[must_use]
    pub fn is_creator(&self, user: UserId) -> bool {
        self.created_by == user
    }

    /// Renames the project.
    pub fn rename(&mut self, name: ProjectName, clock: &impl Clock) {
        self.name = name;
        self.touch(clock);
    }

    /// Replaces the project description.
    pub fn set_description(&mut self, description: impl Into<String>, clock: &impl Clock) {
        self.description = description.into();
        self.touch(clock);
    }

    /// Adds `user` to the team.
    ///
    /// Returns `false` without touching the project when the user already
    /// belongs to it.
    pub fn add_member(&mut self, user: UserId, clock: &impl Clock) -> bool {
        let inserted = self.team_members.insert(user);
        if inserted {
            self.touch(clock);
        }
        inserted
    }

    /// Removes `user` from the team.
    ///
    /// Returns `false` when the user was not a member.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerDomainError::CreatorRemoval`] when `user` is the
    /// project creator; the team is left unchanged.
    pub fn remove_member(
        &mut self,
        user: UserId,
        clock: &impl Clock,
    ) -> Result<bool, TrackerDomainError> {
        if self.is_creator(user) {
            return Err(TrackerDomainError::CreatorRemoval {
                project_id: self.id,
                user_id: user,
            });
        }
        let removed = self.team_members.remove(&user);
        if removed {
            self.touch(clock);
        }
        Ok(removed)
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
