//! User record CRUD.
//!
//! The email uniqueness pre-check here is only a fast path; the repository's
//! unique index is authoritative and its `DuplicateKey` is reported as
//! [`UserRecordError::EmailInUse`] as well.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::domain::ports::{UserPersistenceError, UserRecordsCommand, UserRepository};
use crate::domain::{
    EmailError, Error, NormalizedEmail, PasswordHashError, PasswordHasher, PublicUser, User,
    UserDraft, UserId, UserPatch, ValidationError, patch, require,
};

/// Failures raised by [`UserService`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserRecordError {
    /// A required field was blank.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The email could not be normalised.
    #[error(transparent)]
    InvalidEmail(#[from] EmailError),
    /// Another user already owns the normalised email.
    #[error("email already in use")]
    EmailInUse,
    /// No user has the requested id.
    #[error("user not found")]
    NotFound,
    /// bcrypt refused the password or its worker failed.
    #[error(transparent)]
    HashingFailed(#[from] PasswordHashError),
    /// The repository failed for an unexpected reason.
    #[error(transparent)]
    PersistFailed(UserPersistenceError),
}

impl From<UserPersistenceError> for UserRecordError {
    fn from(value: UserPersistenceError) -> Self {
        match value {
            UserPersistenceError::DuplicateKey { .. } => Self::EmailInUse,
            UserPersistenceError::NotFound => Self::NotFound,
            other => Self::PersistFailed(other),
        }
    }
}

impl From<UserRecordError> for Error {
    fn from(value: UserRecordError) -> Self {
        match value {
            UserRecordError::Validation(err) => err.into(),
            UserRecordError::InvalidEmail(err) => invalid_email_error(err),
            UserRecordError::EmailInUse => Error::conflict("email already in use"),
            UserRecordError::NotFound => Error::not_found("user not found"),
            UserRecordError::HashingFailed(err) => Error::internal(err.to_string()),
            UserRecordError::PersistFailed(err) => user_persistence_error(&err),
        }
    }
}

pub(crate) fn invalid_email_error(err: EmailError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({ "field": "email" }))
}

pub(crate) fn user_persistence_error(err: &UserPersistenceError) -> Error {
    match err {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateKey { .. } => Error::conflict("email already in use"),
        UserPersistenceError::NotFound => Error::not_found("user not found"),
    }
}

/// CRUD over [`User`] records.
#[derive(Clone)]
pub struct UserService<R> {
    repo: Arc<R>,
    hasher: PasswordHasher,
    clock: Arc<dyn Clock>,
}

impl<R> UserService<R> {
    /// Create a service over `repo`.
    pub fn new(repo: Arc<R>, hasher: PasswordHasher, clock: Arc<dyn Clock>) -> Self {
        Self {
            repo,
            hasher,
            clock,
        }
    }
}

impl<R> UserService<R>
where
    R: UserRepository,
{
    /// Validate, hash and store a new user.
    pub async fn create_user(&self, draft: UserDraft) -> Result<PublicUser, UserRecordError> {
        let (first_name, last_name, email, password) = Self::validated(draft)?;
        self.ensure_email_available(&email, None).await?;
        let password_hash = self.hasher.hash_blocking(password).await?;

        let user = User {
            id: UserId::random(),
            first_name,
            last_name,
            email,
            password_hash,
            created_at: self.clock.utc(),
        };
        self.repo.insert(&user).await?;
        info!(user_id = %user.id, "user created");
        Ok(user.into())
    }

    /// Look a user up by id.
    pub async fn get_by_id(&self, id: &UserId) -> Result<PublicUser, UserRecordError> {
        self.load(id).await.map(PublicUser::from)
    }

    /// Overwrite every mutable field; `id` and `created_at` are kept.
    pub async fn replace_user(
        &self,
        id: &UserId,
        draft: UserDraft,
    ) -> Result<PublicUser, UserRecordError> {
        let mut user = self.load(id).await?;
        let (first_name, last_name, email, password) = Self::validated(draft)?;
        if email != user.email {
            self.ensure_email_available(&email, Some(id)).await?;
        }

        user.first_name = first_name;
        user.last_name = last_name;
        user.email = email;
        user.password_hash = self.hasher.hash_blocking(password).await?;
        self.repo.update(&user).await?;
        debug!(user_id = %user.id, "user replaced");
        Ok(user.into())
    }

    /// Apply only the fields present in `changes`.
    ///
    /// A changed email is re-checked for uniqueness against everyone except
    /// this user; a present password must be non-blank and is re-hashed.
    pub async fn patch_user(
        &self,
        id: &UserId,
        changes: UserPatch,
    ) -> Result<PublicUser, UserRecordError> {
        let mut user = self.load(id).await?;
        let UserPatch {
            first_name,
            last_name,
            email,
            password,
        } = changes;
        let password = password.map(Zeroizing::new);

        if let Some(raw) = email {
            let email = NormalizedEmail::parse(&raw)?;
            if email != user.email {
                self.ensure_email_available(&email, Some(id)).await?;
                user.email = email;
            }
        }
        if let Some(password) = password {
            require(&[("password", &*password)])?;
            user.password_hash = self.hasher.hash_blocking(password).await?;
        }
        patch(&mut user.first_name, first_name);
        patch(&mut user.last_name, last_name);

        self.repo.update(&user).await?;
        debug!(user_id = %user.id, "user patched");
        Ok(user.into())
    }

    /// Remove a user permanently.
    pub async fn delete_user(&self, id: &UserId) -> Result<(), UserRecordError> {
        if self.repo.delete(id).await? == 0 {
            return Err(UserRecordError::NotFound);
        }
        info!(user_id = %id, "user deleted");
        Ok(())
    }

    async fn load(&self, id: &UserId) -> Result<User, UserRecordError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(UserRecordError::NotFound)
    }

    /// Fail when `email` belongs to anyone other than `exclude`.
    async fn ensure_email_available(
        &self,
        email: &NormalizedEmail,
        exclude: Option<&UserId>,
    ) -> Result<(), UserRecordError> {
        match self.repo.find_by_email(email).await? {
            Some(owner) if exclude != Some(&owner.id) => {
                debug!("email already held by another user");
                Err(UserRecordError::EmailInUse)
            }
            _ => Ok(()),
        }
    }

    fn validated(
        draft: UserDraft,
    ) -> Result<(String, String, NormalizedEmail, Zeroizing<String>), UserRecordError> {
        let UserDraft {
            first_name,
            last_name,
            email,
            password,
        } = draft;
        let password = Zeroizing::new(password);
        let first_name = first_name.trim().to_owned();
        let last_name = last_name.trim().to_owned();
        require(&[
            ("firstname", &first_name),
            ("lastname", &last_name),
            ("email", &email),
            ("password", &*password),
        ])?;
        let email = NormalizedEmail::parse(&email)?;
        Ok((first_name, last_name, email, password))
    }
}

#[async_trait]
impl<R> UserRecordsCommand for UserService<R>
where
    R: UserRepository,
{
    async fn create(&self, draft: UserDraft) -> Result<PublicUser, Error> {
        self.create_user(draft).await.map_err(Error::from)
    }

    async fn get(&self, id: &UserId) -> Result<PublicUser, Error> {
        self.get_by_id(id).await.map_err(Error::from)
    }

    async fn replace(&self, id: &UserId, draft: UserDraft) -> Result<PublicUser, Error> {
        self.replace_user(id, draft).await.map_err(Error::from)
    }

    async fn patch(&self, id: &UserId, patch: UserPatch) -> Result<PublicUser, Error> {
        self.patch_user(id, patch).await.map_err(Error::from)
    }

    async fn delete(&self, id: &UserId) -> Result<(), Error> {
        self.delete_user(id).await.map_err(Error::from)
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
