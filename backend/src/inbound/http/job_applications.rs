//! Job application endpoints; all of them need a bearer token.

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use tracing::debug;

use crate::domain::{JobApplication, JobApplicationDraft, JobApplicationPatch};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::BearerSession;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_job_application_id;

#[post("/job-applications")]
pub async fn create_job_application(
    state: web::Data<HttpState>,
    session: BearerSession,
    payload: web::Json<JobApplicationDraft>,
) -> ApiResult<HttpResponse> {
    let application = state.job_applications.create(payload.into_inner()).await?;
    debug!(caller = %session.user_id(), application_id = %application.id, "job application stored");
    Ok(HttpResponse::Created().json(application))
}

#[get("/job-applications/{id}")]
pub async fn get_job_application(
    state: web::Data<HttpState>,
    _session: BearerSession,
    path: web::Path<String>,
) -> ApiResult<web::Json<JobApplication>> {
    let id = parse_job_application_id(&path.into_inner())?;
    Ok(web::Json(state.job_applications.get(&id).await?))
}

/// Full overwrite; identity and `createdAt` are kept.
#[put("/job-applications/{id}")]
pub async fn replace_job_application(
    state: web::Data<HttpState>,
    _session: BearerSession,
    path: web::Path<String>,
    payload: web::Json<JobApplicationDraft>,
) -> ApiResult<web::Json<JobApplication>> {
    let id = parse_job_application_id(&path.into_inner())?;
    let application = state
        .job_applications
        .replace(&id, payload.into_inner())
        .await?;
    Ok(web::Json(application))
}

/// Partial update with nested `employment` merging.
#[patch("/job-applications/{id}")]
pub async fn patch_job_application(
    state: web::Data<HttpState>,
    _session: BearerSession,
    path: web::Path<String>,
    payload: web::Json<JobApplicationPatch>,
) -> ApiResult<web::Json<JobApplication>> {
    let id = parse_job_application_id(&path.into_inner())?;
    let application = state
        .job_applications
        .patch(&id, payload.into_inner())
        .await?;
    Ok(web::Json(application))
}

#[delete("/job-applications/{id}")]
pub async fn delete_job_application(
    state: web::Data<HttpState>,
    _session: BearerSession,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_job_application_id(&path.into_inner())?;
    state.job_applications.delete(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}
