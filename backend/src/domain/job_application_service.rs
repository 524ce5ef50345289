//! Job application CRUD.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info};

use crate::domain::ports::{
    JobApplicationPersistenceError, JobApplicationRepository, JobApplicationsCommand,
};
use crate::domain::{
    ApplyPatch, Error, JobApplication, JobApplicationDraft, JobApplicationId, JobApplicationPatch,
    ValidationError, require,
};

/// Failures raised by [`JobApplicationService`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JobApplicationError {
    /// A required field was blank or an enum value was unknown.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// No application has the requested id.
    #[error("job application not found")]
    NotFound,
    /// The repository failed for an unexpected reason.
    #[error(transparent)]
    PersistFailed(JobApplicationPersistenceError),
}

impl From<JobApplicationPersistenceError> for JobApplicationError {
    fn from(value: JobApplicationPersistenceError) -> Self {
        match value {
            JobApplicationPersistenceError::NotFound => Self::NotFound,
            other => Self::PersistFailed(other),
        }
    }
}

impl From<JobApplicationError> for Error {
    fn from(value: JobApplicationError) -> Self {
        match value {
            JobApplicationError::Validation(err) => err.into(),
            JobApplicationError::NotFound => Error::not_found("job application not found"),
            JobApplicationError::PersistFailed(JobApplicationPersistenceError::Connection {
                message,
            }) => Error::service_unavailable(format!(
                "job application repository unavailable: {message}"
            )),
            JobApplicationError::PersistFailed(err) => {
                Error::internal(format!("job application repository error: {err}"))
            }
        }
    }
}

/// CRUD over [`JobApplication`] records.
#[derive(Clone)]
pub struct JobApplicationService<R> {
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> JobApplicationService<R> {
    /// Create a service over `repo`.
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }
}

impl<R> JobApplicationService<R>
where
    R: JobApplicationRepository,
{
    /// Validate and store a new application.
    pub async fn create_application(
        &self,
        draft: JobApplicationDraft,
    ) -> Result<JobApplication, JobApplicationError> {
        let application = draft.into_record(JobApplicationId::random(), self.clock.utc())?;
        self.repo.insert(&application).await?;
        info!(application_id = %application.id, "job application created");
        Ok(application)
    }

    /// Look an application up by id.
    pub async fn get_by_id(
        &self,
        id: &JobApplicationId,
    ) -> Result<JobApplication, JobApplicationError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(JobApplicationError::NotFound)
    }

    /// Overwrite an application, keeping its id and creation time.
    pub async fn replace_application(
        &self,
        id: &JobApplicationId,
        draft: JobApplicationDraft,
    ) -> Result<JobApplication, JobApplicationError> {
        let existing = self.get_by_id(id).await?;
        let application = draft.into_record(existing.id, existing.created_at)?;
        self.repo.update(&application).await?;
        debug!(application_id = %application.id, "job application replaced");
        Ok(application)
    }

    /// Merge `changes` into the stored application.
    ///
    /// The merge itself never validates; the title is checked afterwards
    /// because a present empty string would otherwise blank it.
    pub async fn patch_application(
        &self,
        id: &JobApplicationId,
        changes: JobApplicationPatch,
    ) -> Result<JobApplication, JobApplicationError> {
        let mut application = self.get_by_id(id).await?;
        application.apply_patch(changes);
        require(&[("title", &application.title)])?;
        self.repo.update(&application).await?;
        debug!(application_id = %application.id, "job application patched");
        Ok(application)
    }

    /// Remove an application permanently.
    pub async fn delete_application(
        &self,
        id: &JobApplicationId,
    ) -> Result<(), JobApplicationError> {
        if self.repo.delete(id).await? == 0 {
            return Err(JobApplicationError::NotFound);
        }
        info!(application_id = %id, "job application deleted");
        Ok(())
    }
}

#[async_trait]
impl<R> JobApplicationsCommand for JobApplicationService<R>
where
    R: JobApplicationRepository,
{
    async fn create(&self, draft: JobApplicationDraft) -> Result<JobApplication, Error> {
        self.create_application(draft).await.map_err(Error::from)
    }

    async fn get(&self, id: &JobApplicationId) -> Result<JobApplication, Error> {
        self.get_by_id(id).await.map_err(Error::from)
    }

    async fn replace(
        &self,
        id: &JobApplicationId,
        draft: JobApplicationDraft,
    ) -> Result<JobApplication, Error> {
        self.replace_application(id, draft)
            .await
            .map_err(Error::from)
    }

    async fn patch(
        &self,
        id: &JobApplicationId,
        patch: JobApplicationPatch,
    ) -> Result<JobApplication, Error> {
        self.patch_application(id, patch).await.map_err(Error::from)
    }

    async fn delete(&self, id: &JobApplicationId) -> Result<(), Error> {
        self.delete_application(id).await.map_err(Error::from)
    }
}

#[cfg(test)]
#[path = "job_application_service_tests.rs"]
mod tests;
