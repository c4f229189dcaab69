use std::fmt;

use super::AnalysisReport;

/// Pipeline position within a processing job. Reported to pollers for
/// observability; never used to drive control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisStep {
    ExtractingText,
    GeneratingSummary,
}

impl AnalysisStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisStep::ExtractingText => "extracting_text",
            AnalysisStep::GeneratingSummary => "generating_summary",
        }
    }
}

impl fmt::Display for AnalysisStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full job state. A report exists only in `Complete` and an error message
/// only in `Failed`, so the terminal-state invariants hold by construction.
#[derive(Debug, Clone, PartialEq)]
pub enum JobState {
    Pending,
    Processing { step: AnalysisStep },
    Complete { report: AnalysisReport },
    Failed { error: String },
}

impl JobState {
    pub fn status_str(&self) -> &'static str {
        match self {
            JobState::Pending => "pending",
            JobState::Processing { .. } => "processing",
            JobState::Complete { .. } => "complete",
            JobState::Failed { .. } => "failed",
        }
    }

    pub fn step(&self) -> Option<AnalysisStep> {
        match self {
            JobState::Processing { step } => Some(*step),
            _ => None,
        }
    }

    /// Terminal states accept no further writes.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Complete { .. } | JobState::Failed { .. })
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.status_str())
    }
}
