//! User directory operations.

use super::{RegisterUserRequest, TrackerError, TrackerResult, TrackerService};
use crate::tracker::{
    domain::{EmailAddress, User, UserId, Username},
    ports::{Change, ChangeSet, TrackerStore},
};
use mockable::Clock;

impl<S, C> TrackerService<S, C>
where
    S: TrackerStore,
    C: Clock + Send + Sync,
{
    /// Registers a new user.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerError::Validation`] for a malformed handle or
    /// email, and [`super::TrackerError::Store`] wrapping
    /// [`crate::tracker::ports::TrackerStoreError::DuplicateUsername`] when
    /// the handle is taken.
    pub async fn register_user(&self, request: RegisterUserRequest) -> TrackerResult<User> {
        let username = Username::new(request.username)?;
        let email = EmailAddress::new(request.email)?;
        let user = User::new(
            username,
            email,
            request.first_name,
            request.last_name,
            &*self.clock,
        );

        self.commit(ChangeSet::new().with(Change::InsertUser(user.clone())))
            .await?;
        tracing::info!(user_id = %user.id(), username = %user.username(), "registered user");
        Ok(user)
    }

    /// Looks up a user by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerError::NotFound`] when no such user exists.
    pub async fn find_user(&self, id: UserId) -> TrackerResult<User> {
        tracing::debug!(user_id = %id, "finding user");
        self.require_user(id).await
    }

    /// Looks up a user by handle.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackerError::Validation`] when `username` is not a
    /// well-formed handle and [`super::TrackerError::UnknownUsername`] when
    /// nobody holds it.
    pub async fn find_user_by_username(&self, username: &str) -> TrackerResult<User> {
        let handle = Username::new(username)?;
        tracing::debug!(username = %handle, "finding user by username");
        self.store
            .find_user_by_username(&handle)
            .await?
            .ok_or(TrackerError::UnknownUsername(handle))
    }
}
