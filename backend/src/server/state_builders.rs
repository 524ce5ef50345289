//! Builders wiring domain services over the in-memory adapters.

use std::sync::Arc;

use actix_web::web;

use appliedto::domain::{CredentialService, JobApplicationService, UserService};
use appliedto::inbound::http::state::{HttpState, HttpStatePorts};
use appliedto::outbound::persistence::{
    InMemoryJobApplicationRepository, InMemoryUserRepository,
};

use super::ServerConfig;

/// Build handler state; the credential and user services share one user store
/// so registrations are visible to the record endpoints.
///
/// The timing-equaliser hash is computed here so the first unknown-account
/// login does not pay for it.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    config.hasher.prepare_timing_equaliser();
    let users = Arc::new(InMemoryUserRepository::new());
    let job_applications = Arc::new(InMemoryJobApplicationRepository::new());

    web::Data::new(HttpState::new(HttpStatePorts {
        credentials: Arc::new(CredentialService::new(
            Arc::clone(&users),
            config.hasher.clone(),
            config.tokens.clone(),
            Arc::clone(&config.clock),
        )),
        sessions: Arc::new(config.tokens.clone()),
        users: Arc::new(UserService::new(
            users,
            config.hasher.clone(),
            Arc::clone(&config.clock),
        )),
        job_applications: Arc::new(JobApplicationService::new(
            job_applications,
            Arc::clone(&config.clock),
        )),
    }))
}
