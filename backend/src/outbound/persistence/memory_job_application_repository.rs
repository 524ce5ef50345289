//! In-memory `JobApplicationRepository`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{JobApplicationPersistenceError, JobApplicationRepository};
use crate::domain::{JobApplication, JobApplicationId};

/// Shared in-process job application store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryJobApplicationRepository {
    rows: Arc<RwLock<HashMap<JobApplicationId, JobApplication>>>,
}

impl InMemoryJobApplicationRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobApplicationRepository for InMemoryJobApplicationRepository {
    async fn find_by_id(
        &self,
        id: &JobApplicationId,
    ) -> Result<Option<JobApplication>, JobApplicationPersistenceError> {
        Ok(self.rows.read().await.get(id).cloned())
    }

    async fn insert(
        &self,
        application: &JobApplication,
    ) -> Result<(), JobApplicationPersistenceError> {
        let mut rows = self.rows.write().await;
        if rows.contains_key(&application.id) {
            return Err(JobApplicationPersistenceError::query(format!(
                "job application {} already exists",
                application.id
            )));
        }
        rows.insert(application.id, application.clone());
        Ok(())
    }

    async fn update(
        &self,
        application: &JobApplication,
    ) -> Result<(), JobApplicationPersistenceError> {
        match self.rows.write().await.get_mut(&application.id) {
            Some(row) => {
                *row = application.clone();
                Ok(())
            }
            None => Err(JobApplicationPersistenceError::not_found()),
        }
    }

    async fn delete(&self, id: &JobApplicationId) -> Result<u64, JobApplicationPersistenceError> {
        Ok(u64::from(self.rows.write().await.remove(id).is_some()))
    }
}
