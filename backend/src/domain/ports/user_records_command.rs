//! Driving port for user record CRUD.

use async_trait::async_trait;

use crate::domain::{Error, PublicUser, UserDraft, UserId, UserPatch};

/// Use-case port consumed by the user HTTP handlers.
///
/// Every operation returns the outward [`PublicUser`] shape, which never
/// carries the password hash.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRecordsCommand: Send + Sync {
    /// Create a user from a complete draft.
    async fn create(&self, draft: UserDraft) -> Result<PublicUser, Error>;

    /// Fetch a user by id.
    async fn get(&self, id: &UserId) -> Result<PublicUser, Error>;

    /// Overwrite every field of an existing user.
    async fn replace(&self, id: &UserId, draft: UserDraft) -> Result<PublicUser, Error>;

    /// Apply only the supplied fields to an existing user.
    async fn patch(&self, id: &UserId, patch: UserPatch) -> Result<PublicUser, Error>;

    /// Permanently remove a user.
    async fn delete(&self, id: &UserId) -> Result<(), Error>;
}
