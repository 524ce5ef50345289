//! Process configuration loaded via OrthoConfig.
//!
//! Values layer as CLI flags over `APPLIEDTO_*` environment variables over an
//! optional config file. Accessors apply the defaults, so callers never see a
//! bare `None`.

use std::net::SocketAddr;
use std::sync::Arc;

use chrono::Duration;
use mockable::Clock;
use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::{DEFAULT_COST, PasswordHasher, TokenIssuer, TokenSettings};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_ISSUER: &str = "appliedTo";
const DEFAULT_ACCESS_TTL_SECS: i64 = 86_400;

/// Problems found while turning raw settings into collaborators.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// No signing secret was configured.
    #[error("APPLIEDTO_JWT_SECRET must be set to a non-empty value")]
    MissingJwtSecret,
    /// The bind address is not `host:port`.
    #[error("invalid bind address {value:?}: {message}")]
    InvalidBindAddr { value: String, message: String },
    /// The token lifetime does not fit a time span.
    #[error("APPLIEDTO_JWT_ACCESS_TTL_SECS is out of range: {value}")]
    InvalidTtl { value: i64 },
}

/// Runtime settings for the API server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "APPLIEDTO")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// bcrypt work factor.
    pub bcrypt_cost: Option<u32>,
    /// HMAC secret used to sign session tokens.
    pub jwt_secret: Option<String>,
    /// Expected `iss` claim; an empty string disables the check.
    pub jwt_issuer: Option<String>,
    /// Token lifetime in seconds; zero or less means 24 hours.
    pub jwt_access_ttl_secs: Option<i64>,
}

impl AppSettings {
    /// Parsed bind address, defaulting to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| {
            SettingsError::InvalidBindAddr {
                value: raw.to_owned(),
                message: err.to_string(),
            }
        })
    }

    /// Configured bcrypt cost; the hasher clamps out-of-range values.
    pub fn bcrypt_cost(&self) -> u32 {
        self.bcrypt_cost.unwrap_or(DEFAULT_COST)
    }

    /// Configured issuer, `None` when checking is disabled.
    pub fn jwt_issuer(&self) -> Option<&str> {
        let issuer = self.jwt_issuer.as_deref().unwrap_or(DEFAULT_ISSUER).trim();
        (!issuer.is_empty()).then_some(issuer)
    }

    /// Configured access token lifetime.
    pub fn jwt_access_ttl(&self) -> Result<Duration, SettingsError> {
        let value = self.jwt_access_ttl_secs.unwrap_or(DEFAULT_ACCESS_TTL_SECS);
        Duration::try_seconds(value).ok_or(SettingsError::InvalidTtl { value })
    }

    /// Signing material and defaults for session tokens.
    pub fn token_settings(&self) -> Result<TokenSettings, SettingsError> {
        let secret = self
            .jwt_secret
            .as_deref()
            .filter(|secret| !secret.trim().is_empty())
            .ok_or(SettingsError::MissingJwtSecret)?;
        Ok(TokenSettings::new(
            secret.as_bytes().to_vec(),
            self.jwt_issuer().map(str::to_owned),
            self.jwt_access_ttl()?,
        ))
    }

    /// Token issuer reading time from `clock`.
    pub fn token_issuer(&self, clock: Arc<dyn Clock>) -> Result<TokenIssuer, SettingsError> {
        Ok(TokenIssuer::new(self.token_settings()?, clock))
    }

    /// Password hasher using the configured cost.
    pub fn hasher(&self) -> PasswordHasher {
        PasswordHasher::new(self.bcrypt_cost())
    }
}
