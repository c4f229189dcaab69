mod analysis_worker;
mod retention;

pub use analysis_worker::{
    compose_prompt, AnalysisError, AnalysisMessage, AnalysisPipeline, AnalysisWorker,
};
pub use retention::{RetentionConfig, RetentionSweeper};
