use chrono::{DateTime, Utc};

use super::{DocType, DocumentId, JobState};

/// One analysis job. The id is the uploaded file's id; it is assigned once
/// and never changes across the job's lifetime.
#[derive(Debug, Clone)]
pub struct Job {
    pub id: DocumentId,
    pub doc_type: DocType,
    pub state: JobState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn new(id: DocumentId, doc_type: DocType) -> Self {
        let now = Utc::now();
        Self {
            id,
            doc_type,
            state: JobState::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }
}
