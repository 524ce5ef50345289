//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they depend only
//! on domain ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    CredentialsCommand, JobApplicationsCommand, SessionVerifier, UserRecordsCommand,
};

/// Parameter object bundling the port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub credentials: Arc<dyn CredentialsCommand>,
    pub sessions: Arc<dyn SessionVerifier>,
    pub users: Arc<dyn UserRecordsCommand>,
    pub job_applications: Arc<dyn JobApplicationsCommand>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub credentials: Arc<dyn CredentialsCommand>,
    pub sessions: Arc<dyn SessionVerifier>,
    pub users: Arc<dyn UserRecordsCommand>,
    pub job_applications: Arc<dyn JobApplicationsCommand>,
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use appliedto::domain::{
    ///     CredentialService, JobApplicationService, PasswordHasher, TokenIssuer, TokenSettings,
    ///     UserService,
    /// };
    /// use appliedto::inbound::http::state::{HttpState, HttpStatePorts};
    /// use appliedto::outbound::persistence::{
    ///     InMemoryJobApplicationRepository, InMemoryUserRepository,
    /// };
    /// use mockable::DefaultClock;
    ///
    /// let users = Arc::new(InMemoryUserRepository::new());
    /// let tokens = TokenIssuer::new(
    ///     TokenSettings::new(b"secret".to_vec(), None, chrono::Duration::hours(1)),
    ///     Arc::new(DefaultClock),
    /// );
    /// let hasher = PasswordHasher::new(4);
    /// let state = HttpState::new(HttpStatePorts {
    ///     credentials: Arc::new(CredentialService::new(
    ///         Arc::clone(&users),
    ///         hasher.clone(),
    ///         tokens.clone(),
    ///         Arc::new(DefaultClock),
    ///     )),
    ///     sessions: Arc::new(tokens),
    ///     users: Arc::new(UserService::new(users, hasher, Arc::new(DefaultClock))),
    ///     job_applications: Arc::new(JobApplicationService::new(
    ///         Arc::new(InMemoryJobApplicationRepository::new()),
    ///         Arc::new(DefaultClock),
    ///     )),
    /// });
    /// let _sessions = state.sessions.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            credentials,
            sessions,
            users,
            job_applications,
        } = ports;
        Self {
            credentials,
            sessions,
            users,
            job_applications,
        }
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}
