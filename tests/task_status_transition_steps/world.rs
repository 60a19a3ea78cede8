//! Shared world state for task status transition BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use taskmaster::tracker::{
    adapters::memory::InMemoryTrackerStore,
    domain::{ParseTaskStatusError, Project, Task, User},
    services::{RegisterUserRequest, TrackerError, TrackerService},
};

/// Service type used by the BDD world.
pub type TestTrackerService = TrackerService<InMemoryTrackerStore, DefaultClock>;

/// Outcome of the most recent move attempt.
#[derive(Debug)]
pub enum MoveOutcome {
    /// The status name did not parse.
    UnknownStatus(ParseTaskStatusError),
    /// The service accepted or rejected the move.
    Applied(Result<Task, TrackerError>),
}

/// Scenario world for task status behaviour tests.
pub struct StatusTransitionWorld {
    pub service: TestTrackerService,
    pub users: HashMap<String, User>,
    pub project: Option<Project>,
    pub task: Option<Task>,
    pub last_move: Option<MoveOutcome>,
}

impl StatusTransitionWorld {
    /// Creates a world with no users or records.
    #[must_use]
    pub fn new() -> Self {
        let service =
            TrackerService::new(Arc::new(InMemoryTrackerStore::new()), Arc::new(DefaultClock));

        Self {
            service,
            users: HashMap::new(),
            project: None,
            task: None,
            last_move: None,
        }
    }

    /// Registers `handle` unless it is already known to the scenario.
    ///
    /// # Errors
    ///
    /// Returns an error if registration fails.
    pub fn ensure_user(&mut self, handle: &str) -> Result<User, eyre::Report> {
        if let Some(known) = self.users.get(handle) {
            return Ok(known.clone());
        }
        let registered = run_async(self.service.register_user(RegisterUserRequest::new(
            handle,
            format!("{handle}@example.com"),
        )))?;
        self.users.insert(handle.to_owned(), registered.clone());
        Ok(registered)
    }

    /// Returns the user registered as `handle`.
    ///
    /// # Errors
    ///
    /// Returns an error if no such user was registered by a previous step.
    pub fn user(&self, handle: &str) -> Result<&User, eyre::Report> {
        self.users
            .get(handle)
            .ok_or_else(|| eyre::eyre!("unknown user {handle} in scenario world"))
    }

    /// Returns the scenario task.
    ///
    /// # Errors
    ///
    /// Returns an error if no task was created by a previous step.
    pub fn task(&self) -> Result<&Task, eyre::Report> {
        self.task
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing task in scenario world"))
    }

    /// Returns the scenario project.
    ///
    /// # Errors
    ///
    /// Returns an error if no project was created by a previous step.
    pub fn project(&self) -> Result<&Project, eyre::Report> {
        self.project
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing project in scenario world"))
    }

    /// Returns the creator of the scenario project.
    ///
    /// # Errors
    ///
    /// Returns an error if no project was created by a previous step.
    pub fn owner(&self) -> Result<&User, eyre::Report> {
        let creator = self.project()?.created_by();
        self.users
            .values()
            .find(|user| user.id() == creator)
            .ok_or_else(|| eyre::eyre!("project creator missing from scenario world"))
    }
}

impl Default for StatusTransitionWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> StatusTransitionWorld {
    StatusTransitionWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
