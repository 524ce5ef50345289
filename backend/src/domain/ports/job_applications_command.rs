//! Driving port for job application CRUD.

use async_trait::async_trait;

use crate::domain::{
    Error, JobApplication, JobApplicationDraft, JobApplicationId, JobApplicationPatch,
};

/// Use-case port consumed by the job application HTTP handlers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobApplicationsCommand: Send + Sync {
    /// Validate and store a new application.
    async fn create(&self, draft: JobApplicationDraft) -> Result<JobApplication, Error>;

    /// Fetch an application by id.
    async fn get(&self, id: &JobApplicationId) -> Result<JobApplication, Error>;

    /// Overwrite an application with a complete draft.
    async fn replace(
        &self,
        id: &JobApplicationId,
        draft: JobApplicationDraft,
    ) -> Result<JobApplication, Error>;

    /// Merge a partial update into an application.
    async fn patch(
        &self,
        id: &JobApplicationId,
        patch: JobApplicationPatch,
    ) -> Result<JobApplication, Error>;

    /// Permanently remove an application.
    async fn delete(&self, id: &JobApplicationId) -> Result<(), Error>;
}
