//! Driving ports for account registration, login and session checks.
//!
//! Inbound adapters depend on these traits rather than on the credential
//! service, so handler tests can swap in doubles without wiring persistence
//! or bcrypt.

use async_trait::async_trait;

use crate::domain::{
    AuthenticatedUser, Error, LoginCredentials, SessionToken, TokenIssuer, UserDraft,
};

/// Use-case port for creating accounts and exchanging credentials for
/// session tokens.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialsCommand: Send + Sync {
    /// Create an account and return a token for it.
    ///
    /// # Errors
    ///
    /// Returns an invalid-request error for blank fields or a malformed email
    /// and a conflict when the normalised email is already registered.
    async fn register(&self, draft: UserDraft) -> Result<SessionToken, Error>;

    /// Exchange email and password for a token.
    ///
    /// # Errors
    ///
    /// Every credential failure surfaces as the same unauthorised error.
    async fn authenticate(&self, credentials: LoginCredentials) -> Result<SessionToken, Error>;
}

/// Port used by inbound adapters to turn a bearer token into an identity.
#[cfg_attr(test, mockall::automock)]
pub trait SessionVerifier: Send + Sync {
    /// Verify `token` and return the caller it identifies.
    ///
    /// # Errors
    ///
    /// Returns an unauthorised error when the token is invalid, expired,
    /// issued by someone else or lacks a user subject.
    fn verify_session(&self, token: &str) -> Result<AuthenticatedUser, Error>;
}

impl SessionVerifier for TokenIssuer {
    fn verify_session(&self, token: &str) -> Result<AuthenticatedUser, Error> {
        let claims = self.verify(token).map_err(Error::from)?;
        AuthenticatedUser::from_claims(&claims)
            .ok_or_else(|| Error::unauthorized("token subject is not a user"))
    }
}
