//! Password hashing policy built on bcrypt.
//!
//! bcrypt silently ignores input beyond 72 bytes, so longer passwords are
//! condensed to the lowercase hex SHA-256 digest first. The same rule applies
//! on verification.

use std::sync::{Arc, OnceLock};

use sha2::{Digest, Sha256};
use tracing::warn;
use zeroize::Zeroizing;

/// Lowest cost bcrypt accepts.
pub const MIN_COST: u32 = 4;
/// Highest cost bcrypt accepts.
pub const MAX_COST: u32 = 31;
/// Cost used when the configured value is out of range.
pub const DEFAULT_COST: u32 = 12;

/// Inputs longer than this are pre-hashed.
const BCRYPT_INPUT_LIMIT: usize = 72;

const DUMMY_PASSWORD: &str = "appliedto-timing-equaliser";

/// Failures raised while hashing a password.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordHashError {
    /// The supplied password was empty.
    #[error("empty password")]
    EmptyPassword,
    /// The bcrypt backend or its worker thread failed.
    #[error("password hashing failed: {message}")]
    Backend { message: String },
}

/// bcrypt hasher with a fixed work factor.
///
/// Cloning is cheap; clones share the hash used by
/// [`PasswordHasher::dummy_verify`], computed once on first use or by
/// [`PasswordHasher::prepare_timing_equaliser`].
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
    dummy_hash: Arc<OnceLock<Option<String>>>,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_COST)
    }
}

impl PasswordHasher {
    /// Build a hasher, replacing an out-of-range `cost` with [`DEFAULT_COST`].
    ///
    /// # Examples
    /// ```
    /// use appliedto::domain::{PasswordHasher, DEFAULT_COST};
    ///
    /// assert_eq!(PasswordHasher::new(3).cost(), DEFAULT_COST);
    /// assert_eq!(PasswordHasher::new(10).cost(), 10);
    /// ```
    #[must_use]
    pub fn new(cost: u32) -> Self {
        let cost = if (MIN_COST..=MAX_COST).contains(&cost) {
            cost
        } else {
            DEFAULT_COST
        };
        Self {
            cost,
            dummy_hash: Arc::new(OnceLock::new()),
        }
    }

    /// Effective work factor.
    #[must_use]
    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash `password` with the configured cost.
    pub fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        if password.is_empty() {
            return Err(PasswordHashError::EmptyPassword);
        }
        let input = bcrypt_input(password);
        bcrypt::hash(input.as_bytes(), self.cost).map_err(|err| PasswordHashError::Backend {
            message: err.to_string(),
        })
    }

    /// Check `password` against a stored bcrypt `hash`.
    ///
    /// Malformed hashes never verify.
    #[must_use]
    pub fn verify(&self, hash: &str, password: &str) -> bool {
        let input = bcrypt_input(password);
        bcrypt::verify(input.as_bytes(), hash).unwrap_or(false)
    }

    /// Whether `hash` was produced with a lower cost than the current one.
    #[must_use]
    pub fn needs_rehash(&self, hash: &str) -> bool {
        hash.parse::<bcrypt::HashParts>()
            .is_ok_and(|parts| parts.get_cost() < self.cost)
    }

    /// Compute the hash used by [`PasswordHasher::dummy_verify`] now rather
    /// than on the first unknown-account login. Clones share the result.
    pub fn prepare_timing_equaliser(&self) {
        let _ = self.timing_hash();
    }

    /// Spend the same effort as a real verification, always failing.
    ///
    /// Used when there is no stored hash so that unknown accounts take as
    /// long to reject as wrong passwords.
    pub fn dummy_verify(&self, password: &str) {
        if let Some(hash) = self.timing_hash() {
            let _ = self.verify(hash, password);
        }
    }

    fn timing_hash(&self) -> Option<&str> {
        self.dummy_hash
            .get_or_init(|| match self.hash(DUMMY_PASSWORD) {
                Ok(hash) => Some(hash),
                Err(error) => {
                    warn!(%error, "failed to prepare timing equaliser hash");
                    None
                }
            })
            .as_deref()
    }

    /// [`PasswordHasher::hash`] on the blocking thread pool.
    pub async fn hash_blocking(
        &self,
        password: Zeroizing<String>,
    ) -> Result<String, PasswordHashError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|err| PasswordHashError::Backend {
                message: err.to_string(),
            })?
    }

    /// [`PasswordHasher::verify`] on the blocking thread pool.
    ///
    /// With no stored hash a dummy verification runs instead and the result is
    /// always `false`.
    pub async fn verify_blocking(&self, hash: Option<String>, password: Zeroizing<String>) -> bool {
        let hasher = self.clone();
        let outcome = tokio::task::spawn_blocking(move || match hash {
            Some(hash) => hasher.verify(&hash, &password),
            None => {
                hasher.dummy_verify(&password);
                false
            }
        })
        .await;
        match outcome {
            Ok(valid) => valid,
            Err(error) => {
                warn!(%error, "password verification task failed");
                false
            }
        }
    }
}

fn bcrypt_input(password: &str) -> Zeroizing<String> {
    if password.len() > BCRYPT_INPUT_LIMIT {
        Zeroizing::new(hex::encode(Sha256::digest(password.as_bytes())))
    } else {
        Zeroizing::new(password.to_owned())
    }
}
