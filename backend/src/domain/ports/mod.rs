//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod credentials_command;
mod job_application_repository;
mod job_applications_command;
mod user_records_command;
mod user_repository;

#[cfg(test)]
pub use credentials_command::{MockCredentialsCommand, MockSessionVerifier};
pub use credentials_command::{CredentialsCommand, SessionVerifier};
#[cfg(test)]
pub use job_application_repository::MockJobApplicationRepository;
pub use job_application_repository::{JobApplicationPersistenceError, JobApplicationRepository};
#[cfg(test)]
pub use job_applications_command::MockJobApplicationsCommand;
pub use job_applications_command::JobApplicationsCommand;
#[cfg(test)]
pub use user_records_command::MockUserRecordsCommand;
pub use user_records_command::UserRecordsCommand;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
