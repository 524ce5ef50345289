//! Domain primitives, services and ports.
//!
//! Purpose: hold the identity and credential rules (email normalisation,
//! password hashing, session tokens, partial updates) plus the user and job
//! application record services. Nothing here knows about HTTP or storage
//! engines; adapters reach the services through [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - CredentialService, UserService, JobApplicationService: use-case
//!   implementations of the driving ports.

pub mod auth;
pub mod credential_service;
pub mod email;
pub mod error;
pub mod job_application;
pub mod job_application_service;
pub mod password;
pub mod patch;
pub mod ports;
pub mod token;
pub mod trace_id;
pub mod user;
pub mod user_service;
pub mod validation;

pub use self::auth::{AuthenticatedUser, LoginCredentials, SessionToken};
pub use self::credential_service::{CredentialError, CredentialService};
pub use self::email::{EmailError, MAX_EMAIL_LEN, MAX_LOCAL_LEN, NormalizedEmail, normalize};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::job_application::{
    Employment, EmploymentDraft, EmploymentPatch, EmploymentType, JobApplication,
    JobApplicationDraft, JobApplicationId, JobApplicationIdValidationError, JobApplicationPatch,
    SalaryRange, SalaryRangePatch, WorkLocation,
};
pub use self::job_application_service::{JobApplicationError, JobApplicationService};
pub use self::password::{DEFAULT_COST, MAX_COST, MIN_COST, PasswordHashError, PasswordHasher};
pub use self::patch::{
    ApplyPatch, Nullable, patch, patch_nested, patch_nested_nullable, patch_nullable,
};
pub use self::token::{Claims, TokenError, TokenIssuer, TokenSettings};
pub use self::trace_id::TraceId;
pub use self::user::{PublicUser, User, UserDraft, UserId, UserIdValidationError, UserPatch};
pub use self::user_service::{UserRecordError, UserService};
pub use self::validation::{Presence, ValidationError, require};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use appliedto::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
