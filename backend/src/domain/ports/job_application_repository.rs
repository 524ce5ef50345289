//! Port abstraction for job application persistence.

use async_trait::async_trait;

use crate::domain::{JobApplication, JobApplicationId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by job application repository adapters.
    pub enum JobApplicationPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "job application repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "job application repository query failed: {message}",
        /// The record to update does not exist.
        NotFound => "job application record not found",
    }
}

/// Storage contract for [`JobApplication`] records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobApplicationRepository: Send + Sync {
    /// Fetch an application by identifier.
    async fn find_by_id(
        &self,
        id: &JobApplicationId,
    ) -> Result<Option<JobApplication>, JobApplicationPersistenceError>;

    /// Store a new application.
    async fn insert(&self, application: &JobApplication)
    -> Result<(), JobApplicationPersistenceError>;

    /// Overwrite an existing application.
    async fn update(&self, application: &JobApplication)
    -> Result<(), JobApplicationPersistenceError>;

    /// Remove an application, returning the number of rows affected.
    async fn delete(&self, id: &JobApplicationId) -> Result<u64, JobApplicationPersistenceError>;
}
