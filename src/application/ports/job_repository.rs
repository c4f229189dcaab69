use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{DocumentId, Job, JobState};

use super::RepositoryError;

/// Registry of analysis jobs, keyed by document id. Holds at most one job
/// per id; writes to a terminal record are refused, except that `create`
/// may replace a terminal record with a fresh pending one (re-analysis).
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Insert a new job. Fails with `ConstraintViolation` if a non-terminal
    /// job already holds the same id.
    async fn create(&self, job: &Job) -> Result<(), RepositoryError>;

    async fn get(&self, id: DocumentId) -> Result<Option<Job>, RepositoryError>;

    /// Replace the job's state wholesale and bump its `updated_at`. Fails
    /// with `NotFound` for unknown ids and with `ConstraintViolation` if the
    /// current state is already terminal.
    async fn update_state(&self, id: DocumentId, state: JobState) -> Result<(), RepositoryError>;

    /// Remove terminal jobs last updated before `cutoff`, returning the ids
    /// that were evicted.
    async fn remove_terminal_older_than(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<DocumentId>, RepositoryError>;
}
