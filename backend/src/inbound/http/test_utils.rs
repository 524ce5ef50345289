//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::http::header::{AUTHORIZATION, HeaderName};
use actix_web::{App, dev::ServiceFactory, dev::ServiceRequest, dev::ServiceResponse, web};
use mockable::DefaultClock;
use serde_json::Value;

use crate::domain::token::{Claims, EMAIL_CLAIM, SUBJECT_CLAIM};
use crate::domain::ports::{
    MockCredentialsCommand, MockJobApplicationsCommand, MockUserRecordsCommand, UserRepository,
};
use crate::domain::{
    CredentialService, JobApplicationService, NormalizedEmail, TokenIssuer, User, UserId,
    UserService,
};
use crate::inbound::http::configure_api;
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::persistence::{InMemoryJobApplicationRepository, InMemoryUserRepository};
use crate::test_support::{fast_hasher, token_issuer};

/// Real services over fresh in-memory repositories.
pub struct TestApp {
    pub tokens: TokenIssuer,
    pub users: Arc<InMemoryUserRepository>,
    state: web::Data<HttpState>,
}

impl TestApp {
    pub fn new() -> Self {
        let users = Arc::new(InMemoryUserRepository::new());
        let tokens = token_issuer(Some("appliedTo"));
        let clock = Arc::new(DefaultClock);
        let state = HttpState::new(HttpStatePorts {
            credentials: Arc::new(CredentialService::new(
                Arc::clone(&users),
                fast_hasher(),
                tokens.clone(),
                clock.clone(),
            )),
            sessions: Arc::new(tokens.clone()),
            users: Arc::new(UserService::new(Arc::clone(&users), fast_hasher(), clock.clone())),
            job_applications: Arc::new(JobApplicationService::new(
                Arc::new(InMemoryJobApplicationRepository::new()),
                clock,
            )),
        });
        Self {
            tokens,
            users,
            state: web::Data::new(state),
        }
    }

    /// Shared handler state.
    pub fn state(&self) -> web::Data<HttpState> {
        self.state.clone()
    }

    /// Stored record for `email`; panics when absent.
    pub async fn stored_user(&self, email: &str) -> User {
        let email = NormalizedEmail::parse(email).expect("valid email");
        self.users
            .find_by_email(&email)
            .await
            .expect("lookup succeeds")
            .expect("user stored")
    }

    /// Application with every `/api/v1` route mounted.
    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        api_app(self.state())
    }
}

/// Mount the `/api/v1` routes over arbitrary (often mocked) ports.
pub fn api_app(
    state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(state)
        .service(web::scope("/api/v1").configure(configure_api))
}

/// State whose ports all panic when called; override the one under test.
pub fn mocked_ports(tokens: &TokenIssuer) -> HttpStatePorts {
    HttpStatePorts {
        credentials: Arc::new(MockCredentialsCommand::new()),
        sessions: Arc::new(tokens.clone()),
        users: Arc::new(MockUserRecordsCommand::new()),
        job_applications: Arc::new(MockJobApplicationsCommand::new()),
    }
}

/// `Authorization` header carrying a token whose subject is `id`.
pub fn bearer(tokens: &TokenIssuer, id: &UserId) -> (HeaderName, String) {
    let mut claims = Claims::new();
    claims.insert(SUBJECT_CLAIM.to_owned(), Value::from(id.to_string()));
    claims.insert(EMAIL_CLAIM.to_owned(), Value::from("test@example.com"));
    let token = tokens.sign(claims).expect("test token signs");
    (AUTHORIZATION, format!("Bearer {token}"))
}
