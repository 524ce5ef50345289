//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use appliedto::domain::{PasswordHasher, TokenIssuer};
use appliedto::settings::{AppSettings, SettingsError};
use mockable::Clock;

/// Everything the server needs once settings have been validated.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) hasher: PasswordHasher,
    pub(crate) tokens: TokenIssuer,
    pub(crate) clock: Arc<dyn Clock>,
}

impl ServerConfig {
    /// Resolve settings into collaborators, failing on a missing secret or a
    /// malformed bind address.
    pub fn from_settings(
        settings: &AppSettings,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, SettingsError> {
        Ok(Self {
            bind_addr: settings.bind_addr()?,
            hasher: settings.hasher(),
            tokens: settings.token_issuer(Arc::clone(&clock))?,
            clock,
        })
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
