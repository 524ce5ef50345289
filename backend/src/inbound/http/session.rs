//! Bearer-token extraction so handlers only see an authenticated identity.
//!
//! Tokens are checked through the [`SessionVerifier`] port held in
//! [`HttpState`]; there is no role policy beyond a valid token.
//!
//! [`SessionVerifier`]: crate::domain::ports::SessionVerifier

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};
use tracing::debug;

use crate::domain::{AuthenticatedUser, Error, UserId};
use crate::inbound::http::state::HttpState;

const BEARER_PREFIX: &str = "bearer ";

/// Identity of the caller, taken from `Authorization: Bearer <token>`.
#[derive(Debug, Clone)]
pub struct BearerSession(AuthenticatedUser);

impl BearerSession {
    /// Authenticated user id.
    pub fn user_id(&self) -> &UserId {
        self.0.user_id()
    }

    fn extract(req: &HttpRequest) -> Result<Self, Error> {
        let state = req
            .app_data::<web::Data<HttpState>>()
            .ok_or_else(|| Error::internal("HTTP state is not configured"))?;
        let token = bearer_token(req).ok_or_else(|| Error::unauthorized("bearer token required"))?;
        let user = state.sessions.verify_session(token).inspect_err(|err| {
            debug!(reason = err.message(), "bearer token rejected");
        })?;
        Ok(Self(user))
    }
}

/// Token part of an `Authorization: Bearer` header; the scheme is matched
/// case-insensitively.
fn bearer_token(req: &HttpRequest) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let scheme = value.get(..BEARER_PREFIX.len())?;
    if !scheme.eq_ignore_ascii_case(BEARER_PREFIX) {
        return None;
    }
    value
        .get(BEARER_PREFIX.len()..)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

impl FromRequest for BearerSession {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::extract(req))
    }
}
