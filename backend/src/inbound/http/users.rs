//! User record endpoints.
//!
//! Creation is open; every `/users/{id}` route needs a bearer token.

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use tracing::debug;

use crate::domain::{PublicUser, UserDraft, UserPatch};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::BearerSession;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_user_id;

/// Create a user without issuing a token.
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<UserDraft>,
) -> ApiResult<HttpResponse> {
    let user = state.users.create(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(user))
}

/// Fetch a user by id.
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    session: BearerSession,
    path: web::Path<String>,
) -> ApiResult<web::Json<PublicUser>> {
    let id = parse_user_id(&path.into_inner())?;
    debug!(caller = %session.user_id(), user_id = %id, "user lookup");
    Ok(web::Json(state.users.get(&id).await?))
}

/// Overwrite every mutable field of a user.
#[put("/users/{id}")]
pub async fn replace_user(
    state: web::Data<HttpState>,
    _session: BearerSession,
    path: web::Path<String>,
    payload: web::Json<UserDraft>,
) -> ApiResult<web::Json<PublicUser>> {
    let id = parse_user_id(&path.into_inner())?;
    Ok(web::Json(state.users.replace(&id, payload.into_inner()).await?))
}

/// Apply a partial update.
#[patch("/users/{id}")]
pub async fn patch_user(
    state: web::Data<HttpState>,
    _session: BearerSession,
    path: web::Path<String>,
    payload: web::Json<UserPatch>,
) -> ApiResult<web::Json<PublicUser>> {
    let id = parse_user_id(&path.into_inner())?;
    Ok(web::Json(state.users.patch(&id, payload.into_inner()).await?))
}

#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    _session: BearerSession,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_user_id(&path.into_inner())?;
    state.users.delete(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
