mod doc_type;
mod document;
mod job;
mod job_state;
mod report;
mod storage_path;

pub use doc_type::DocType;
pub use document::DocumentId;
pub use job::Job;
pub use job_state::{AnalysisStep, JobState};
pub use report::{AnalysisReport, Risk, RiskSeverity};
pub use storage_path::StoragePath;
