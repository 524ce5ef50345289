//! HTTP inbound adapter exposing REST endpoints.
//!
//! ```text
//! POST   /api/v1/auth/register
//! POST   /api/v1/auth/login
//! POST   /api/v1/users
//! GET    /api/v1/users/{id}           (bearer)
//! PUT    /api/v1/users/{id}           (bearer)
//! PATCH  /api/v1/users/{id}           (bearer)
//! DELETE /api/v1/users/{id}           (bearer)
//! POST   /api/v1/job-applications     (bearer)
//! GET    /api/v1/job-applications/{id} ... PUT, PATCH, DELETE (bearer)
//! ```

use actix_web::web;

pub mod auth;
pub mod error;
pub mod health;
pub mod job_applications;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;

/// Register every `/api/v1` endpoint plus the JSON body error handler.
///
/// Callers still provide [`state::HttpState`] as app data.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use appliedto::inbound::http::configure_api;
///
/// let _app = App::new().service(web::scope("/api/v1").configure(configure_api));
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(validation::json_config())
        .service(auth::register)
        .service(auth::login)
        .service(users::create_user)
        .service(users::get_user)
        .service(users::replace_user)
        .service(users::patch_user)
        .service(users::delete_user)
        .service(job_applications::create_job_application)
        .service(job_applications::get_job_application)
        .service(job_applications::replace_job_application)
        .service(job_applications::patch_job_application)
        .service(job_applications::delete_job_application);
}
