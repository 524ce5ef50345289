//! Stateless session tokens: HMAC-signed JWTs carrying subject and expiry.
//!
//! Validity is purely signature plus expiry plus (optionally) issuer. There is
//! no revocation list.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mockable::Clock;
use serde_json::{Map, Value};
use zeroize::Zeroizing;

use super::Error;

/// Claim carrying the user id.
pub const SUBJECT_CLAIM: &str = "sub";
/// Claim carrying the normalised email.
pub const EMAIL_CLAIM: &str = "eml";
/// Claim carrying the issuer.
pub const ISSUER_CLAIM: &str = "iss";
/// Claim carrying the issue time in Unix seconds.
pub const ISSUED_AT_CLAIM: &str = "iat";
/// Claim carrying the expiry time in Unix seconds.
pub const EXPIRES_AT_CLAIM: &str = "exp";

/// Lifetime applied when the configured one is not positive.
pub const FALLBACK_TTL_HOURS: i64 = 24;

/// Token claims as an open JSON object.
pub type Claims = Map<String, Value>;

/// Failures raised while signing or verifying tokens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// The token could not be encoded.
    #[error("token signing failed: {message}")]
    Signing { message: String },
    /// Signature mismatch or a non-HMAC algorithm.
    #[error("invalid token signature")]
    InvalidSignature,
    /// The issuer claim does not match the configured issuer.
    #[error("invalid token issuer")]
    InvalidIssuer,
    /// The token is not a well-formed JWT or lacks required claims.
    #[error("malformed token")]
    Malformed,
    /// The expiry has passed.
    #[error("token expired")]
    Expired,
}

/// Signing material and defaults for issued tokens.
#[derive(Clone)]
pub struct TokenSettings {
    secret: Zeroizing<Vec<u8>>,
    issuer: Option<String>,
    access_ttl: Duration,
}

impl std::fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSettings")
            .field("secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("access_ttl", &self.access_ttl)
            .finish()
    }
}

impl TokenSettings {
    /// Build settings; a blank `issuer` disables the issuer claim and check.
    pub fn new(secret: impl Into<Vec<u8>>, issuer: Option<String>, access_ttl: Duration) -> Self {
        Self {
            secret: Zeroizing::new(secret.into()),
            issuer: issuer.filter(|value| !value.trim().is_empty()),
            access_ttl,
        }
    }

    /// Configured issuer, if any.
    pub fn issuer(&self) -> Option<&str> {
        self.issuer.as_deref()
    }

    /// Lifetime of freshly signed tokens; non-positive values fall back to a day.
    pub fn effective_ttl(&self) -> Duration {
        if self.access_ttl <= Duration::zero() {
            Duration::hours(FALLBACK_TTL_HOURS)
        } else {
            self.access_ttl
        }
    }
}

/// Signs and verifies HS256 session tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    settings: TokenSettings,
    clock: Arc<dyn Clock>,
}

impl TokenIssuer {
    /// Create an issuer reading the current time from `clock`.
    pub fn new(settings: TokenSettings, clock: Arc<dyn Clock>) -> Self {
        Self { settings, clock }
    }

    /// Sign `claims`, filling in `iss`, `iat` and `exp` when absent.
    pub fn sign(&self, mut claims: Claims) -> Result<String, TokenError> {
        let now = self.clock.utc();
        if let Some(issuer) = self.settings.issuer() {
            claims
                .entry(ISSUER_CLAIM)
                .or_insert_with(|| Value::from(issuer));
        }
        claims
            .entry(ISSUED_AT_CLAIM)
            .or_insert_with(|| Value::from(now.timestamp()));
        if !claims.contains_key(EXPIRES_AT_CLAIM) {
            let expires_at = now
                .checked_add_signed(self.settings.effective_ttl())
                .ok_or_else(|| TokenError::Signing {
                    message: "token lifetime overflows the supported date range".to_owned(),
                })?;
            claims.insert(
                EXPIRES_AT_CLAIM.to_owned(),
                Value::from(expires_at.timestamp()),
            );
        }

        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&self.settings.secret),
        )
        .map_err(|err| TokenError::Signing {
            message: err.to_string(),
        })
    }

    /// Verify `token` and return its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let data = jsonwebtoken::decode::<Claims>(
            token,
            &DecodingKey::from_secret(&self.settings.secret),
            &hmac_validation(),
        )
        .map_err(|err| match err.kind() {
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                TokenError::InvalidSignature
            }
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Malformed,
        })?;
        let claims = data.claims;

        let expires_at = claims
            .get(EXPIRES_AT_CLAIM)
            .and_then(Value::as_i64)
            .ok_or(TokenError::Malformed)?;
        if self.clock.utc().timestamp() >= expires_at {
            return Err(TokenError::Expired);
        }

        if let Some(expected) = self.settings.issuer() {
            let issuer = claims.get(ISSUER_CLAIM).and_then(Value::as_str);
            if issuer != Some(expected) {
                return Err(TokenError::InvalidIssuer);
            }
        }

        Ok(claims)
    }
}

// Expiry and issuer are checked against the injected clock and settings after
// decoding, so the library only verifies structure, algorithm and signature.
fn hmac_validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
    validation.leeway = 0;
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims = HashSet::new();
    validation
}

impl From<TokenError> for Error {
    fn from(value: TokenError) -> Self {
        match value {
            TokenError::Signing { .. } => Error::internal(value.to_string()),
            TokenError::InvalidSignature
            | TokenError::InvalidIssuer
            | TokenError::Malformed
            | TokenError::Expired => Error::unauthorized(value.to_string()),
        }
    }
}

/// String-valued claim lookup.
pub fn claim_str<'a>(claims: &'a Claims, name: &str) -> Option<&'a str> {
    claims.get(name).and_then(Value::as_str)
}
