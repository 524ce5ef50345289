//! Port abstraction for user persistence adapters and their errors.
//!
//! The adapter owns the uniqueness guarantee on normalised email. The service
//! layer only pre-checks it for friendlier errors, so concurrent writers must
//! still be rejected here with [`UserPersistenceError::DuplicateKey`].

use async_trait::async_trait;

use crate::domain::{NormalizedEmail, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// A write would give two users the same email.
        DuplicateKey { email: String } => "email already stored: {email}",
        /// The record to update does not exist.
        NotFound => "user record not found",
    }
}

/// Storage contract for [`User`] records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by normalised email.
    async fn find_by_email(
        &self,
        email: &NormalizedEmail,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Store a new user.
    ///
    /// Fails with [`UserPersistenceError::DuplicateKey`] when the email is
    /// already held.
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Overwrite an existing user.
    ///
    /// Fails with [`UserPersistenceError::NotFound`] for unknown ids and
    /// [`UserPersistenceError::DuplicateKey`] when the new email belongs to
    /// someone else.
    async fn update(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Remove a user, returning the number of rows affected.
    async fn delete(&self, id: &UserId) -> Result<u64, UserPersistenceError>;
}
