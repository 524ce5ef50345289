//! Authentication primitives: login credentials, issued tokens and the
//! identity recovered from a verified token.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::token::{Claims, EMAIL_CLAIM, SUBJECT_CLAIM, claim_str};
use super::UserId;

/// Raw login input.
///
/// No shape validation happens here: a malformed email must fail exactly like
/// an unknown account, so the credential service decides.
///
/// # Examples
/// ```
/// use appliedto::domain::LoginCredentials;
///
/// let creds = LoginCredentials::new("ann@example.com", "correct-horse");
/// assert_eq!(creds.email(), "ann@example.com");
/// ```
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "LoginCredentialsDto")]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Wrap caller-provided email and password.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: Zeroizing::new(password.into()),
        }
    }

    /// Email exactly as supplied.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password exactly as supplied.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct LoginCredentialsDto {
    email: String,
    password: String,
}

impl From<LoginCredentialsDto> for LoginCredentials {
    fn from(value: LoginCredentialsDto) -> Self {
        Self::new(value.email, value.password)
    }
}

/// Signed session token handed to clients.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionToken {
    token: String,
}

impl SessionToken {
    /// Wrap an encoded token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Encoded token string.
    pub fn as_str(&self) -> &str {
        self.token.as_str()
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

/// Caller identity recovered from a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    user_id: UserId,
    email: Option<String>,
}

impl AuthenticatedUser {
    /// Build from verified claims; `None` when `sub` is missing or not a user id.
    pub fn from_claims(claims: &Claims) -> Option<Self> {
        let user_id = claim_str(claims, SUBJECT_CLAIM).and_then(|sub| UserId::new(sub).ok())?;
        Some(Self {
            user_id,
            email: claim_str(claims, EMAIL_CLAIM).map(str::to_owned),
        })
    }

    /// Authenticated user id.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Email claim carried by the token, if any.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}
