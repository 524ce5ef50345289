//! Registration and login.
//!
//! Registration runs normalise → uniqueness check → hash → persist → sign and
//! stops at the first failing step. Login collapses every failure (malformed
//! email, unknown account, wrong password) into
//! [`CredentialError::InvalidCredentials`] and always spends one bcrypt
//! verification, so unknown accounts cannot be told apart by timing.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::Value;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::domain::ports::{CredentialsCommand, UserPersistenceError, UserRepository};
use crate::domain::token::{EMAIL_CLAIM, SUBJECT_CLAIM};
use crate::domain::user_service::{invalid_email_error, user_persistence_error};
use crate::domain::{
    Claims, EmailError, Error, LoginCredentials, NormalizedEmail, PasswordHashError,
    PasswordHasher, SessionToken, TokenError, TokenIssuer, User, UserDraft, UserId,
    ValidationError, require,
};

/// Failures raised by [`CredentialService`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    /// A required field was blank.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The email could not be normalised.
    #[error(transparent)]
    InvalidEmail(#[from] EmailError),
    /// Another account already owns the normalised email.
    #[error("email already in use")]
    EmailInUse,
    /// Login failed; deliberately unspecific.
    #[error("invalid credentials")]
    InvalidCredentials,
    /// bcrypt refused the password or its worker failed.
    #[error(transparent)]
    HashingFailed(#[from] PasswordHashError),
    /// The repository failed for a reason other than a duplicate email.
    #[error(transparent)]
    PersistFailed(UserPersistenceError),
    /// The session token could not be signed.
    #[error(transparent)]
    TokenIssue(#[from] TokenError),
}

impl From<UserPersistenceError> for CredentialError {
    fn from(value: UserPersistenceError) -> Self {
        match value {
            UserPersistenceError::DuplicateKey { .. } => Self::EmailInUse,
            other => Self::PersistFailed(other),
        }
    }
}

impl From<CredentialError> for Error {
    fn from(value: CredentialError) -> Self {
        match value {
            CredentialError::Validation(err) => err.into(),
            CredentialError::InvalidEmail(err) => invalid_email_error(err),
            CredentialError::EmailInUse => Error::conflict("email already in use"),
            CredentialError::InvalidCredentials => Error::unauthorized("invalid credentials"),
            CredentialError::PersistFailed(err) => user_persistence_error(&err),
            CredentialError::HashingFailed(err) => Error::internal(err.to_string()),
            CredentialError::TokenIssue(err) => Error::internal(err.to_string()),
        }
    }
}

/// Account registration and login backed by a [`UserRepository`].
#[derive(Clone)]
pub struct CredentialService<R> {
    repo: Arc<R>,
    hasher: PasswordHasher,
    tokens: TokenIssuer,
    clock: Arc<dyn Clock>,
}

impl<R> CredentialService<R> {
    /// Create a service over `repo`.
    pub fn new(
        repo: Arc<R>,
        hasher: PasswordHasher,
        tokens: TokenIssuer,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repo,
            hasher,
            tokens,
            clock,
        }
    }
}

impl<R> CredentialService<R>
where
    R: UserRepository,
{
    /// Create an account and sign a token for it.
    ///
    /// Names are trimmed before the blank check. A duplicate reported by the
    /// repository at insert time is treated the same as one found by the
    /// pre-check.
    pub async fn register_user(&self, draft: UserDraft) -> Result<SessionToken, CredentialError> {
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
        if self.repo.find_by_email(&email).await?.is_some() {
            debug!("registration rejected: email in use");
            return Err(CredentialError::EmailInUse);
        }

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
        info!(user_id = %user.id, "user registered");

        self.issue_token(&user)
    }

    /// Check credentials and sign a token for the matching account.
    pub async fn login(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<SessionToken, CredentialError> {
        let password = Zeroizing::new(credentials.password().to_owned());
        let user = match NormalizedEmail::parse(credentials.email()) {
            Ok(email) => self.repo.find_by_email(&email).await?,
            Err(_) => None,
        };

        let stored_hash = user.as_ref().map(|user| user.password_hash.clone());
        let verified = self.hasher.verify_blocking(stored_hash, password.clone()).await;
        let Some(user) = user.filter(|_| verified) else {
            debug!("login rejected");
            return Err(CredentialError::InvalidCredentials);
        };

        let token = self.issue_token(&user)?;
        info!(user_id = %user.id, "user logged in");
        self.upgrade_hash(&user, password).await;
        Ok(token)
    }

    fn issue_token(&self, user: &User) -> Result<SessionToken, CredentialError> {
        let mut claims = Claims::new();
        claims.insert(SUBJECT_CLAIM.to_owned(), Value::from(user.id.to_string()));
        claims.insert(EMAIL_CLAIM.to_owned(), Value::from(user.email.as_ref()));
        Ok(SessionToken::new(self.tokens.sign(claims)?))
    }

    /// Re-hash with the current cost when the stored hash is weaker.
    ///
    /// The record is reloaded before writing and only `password_hash` is
    /// replaced, so edits made since the login lookup survive. The write is
    /// skipped when the stored hash is no longer the one just verified.
    /// Failures are logged and never reach the caller.
    async fn upgrade_hash(&self, verified: &User, password: Zeroizing<String>) {
        if !self.hasher.needs_rehash(&verified.password_hash) {
            return;
        }
        let hash = match self.hasher.hash_blocking(password).await {
            Ok(hash) => hash,
            Err(error) => {
                warn!(user_id = %verified.id, %error, "failed to re-hash password");
                return;
            }
        };
        let mut current = match self.repo.find_by_id(&verified.id).await {
            Ok(Some(current)) if current.password_hash == verified.password_hash => current,
            Ok(_) => {
                debug!(user_id = %verified.id, "password changed during login; upgrade skipped");
                return;
            }
            Err(error) => {
                warn!(user_id = %verified.id, %error, "failed to reload user for hash upgrade");
                return;
            }
        };
        current.password_hash = hash;
        match self.repo.update(&current).await {
            Ok(()) => debug!(user_id = %current.id, "password hash upgraded"),
            Err(error) => {
                warn!(user_id = %current.id, %error, "failed to store upgraded password hash");
            }
        }
    }
}

#[async_trait]
impl<R> CredentialsCommand for CredentialService<R>
where
    R: UserRepository,
{
    async fn register(&self, draft: UserDraft) -> Result<SessionToken, Error> {
        self.register_user(draft).await.map_err(Error::from)
    }

    async fn authenticate(&self, credentials: LoginCredentials) -> Result<SessionToken, Error> {
        self.login(&credentials).await.map_err(Error::from)
    }
}

#[cfg(test)]
#[path = "credential_service_tests.rs"]
mod tests;
