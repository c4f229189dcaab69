use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::application::ports::{JobRepository, RepositoryError};
use crate::domain::{DocumentId, Job, JobState};

/// Job registry held entirely in process memory. One instance is constructed
/// at startup and shared by handle; job state does not survive a restart.
///
/// The map lock covers each read/modify/write of an individual record, which
/// is all the coordination the design needs: a given id is written by at most
/// one in-flight pipeline run, because `create` refuses to replace a
/// non-terminal record.
pub struct InMemoryJobRepository {
    jobs: RwLock<HashMap<DocumentId, Job>>,
}

impl InMemoryJobRepository {
    pub fn new() -> Self {
        Self {
            jobs: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryJobRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    async fn create(&self, job: &Job) -> Result<(), RepositoryError> {
        let mut jobs = self.jobs.write().await;

        if let Some(existing) = jobs.get(&job.id) {
            if !existing.is_terminal() {
                return Err(RepositoryError::ConstraintViolation(format!(
                    "job {} is still {}",
                    job.id,
                    existing.state.status_str()
                )));
            }
        }

        jobs.insert(job.id, job.clone());
        Ok(())
    }

    async fn get(&self, id: DocumentId) -> Result<Option<Job>, RepositoryError> {
        let jobs = self.jobs.read().await;
        Ok(jobs.get(&id).cloned())
    }

    async fn update_state(&self, id: DocumentId, state: JobState) -> Result<(), RepositoryError> {
        let mut jobs = self.jobs.write().await;

        let job = jobs
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::NotFound(format!("job {}", id)))?;

        if job.is_terminal() {
            return Err(RepositoryError::ConstraintViolation(format!(
                "job {} is already {}",
                id,
                job.state.status_str()
            )));
        }

        job.state = state;
        job.updated_at = Utc::now();
        Ok(())
    }

    async fn remove_terminal_older_than(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<DocumentId>, RepositoryError> {
        let mut jobs = self.jobs.write().await;

        let expired: Vec<DocumentId> = jobs
            .values()
            .filter(|job| job.is_terminal() && job.updated_at < cutoff)
            .map(|job| job.id)
            .collect();

        for id in &expired {
            jobs.remove(id);
        }

        Ok(expired)
    }
}
