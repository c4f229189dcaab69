use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::Instrument;

use crate::application::ports::{
    JobRepository, PromptStore, Summarizer, TextExtractor, UploadStore,
};
use crate::domain::{AnalysisReport, AnalysisStep, DocType, DocumentId, JobState, StoragePath};

/// Section delimiter between the prompt template and the document text.
const DOCUMENT_DELIMITER: &str = "\n\n--- DOCUMENT TEXT ---\n\n";

pub struct AnalysisMessage {
    pub job_id: DocumentId,
    pub storage_path: StoragePath,
    pub doc_type: DocType,
}

/// Compose the final prompt: template, delimiter, then the extracted text
/// verbatim. No escaping and no truncation; large documents are passed
/// through in full.
pub fn compose_prompt(template: &str, document_text: &str) -> String {
    format!("{template}{DOCUMENT_DELIMITER}{document_text}")
}

/// Drains the analysis channel. Each accepted message is processed on its
/// own task so one slow upstream call never stalls other jobs.
pub struct AnalysisWorker {
    receiver: mpsc::Receiver<AnalysisMessage>,
    pipeline: Arc<AnalysisPipeline>,
}

impl AnalysisWorker {
    pub fn new(receiver: mpsc::Receiver<AnalysisMessage>, pipeline: Arc<AnalysisPipeline>) -> Self {
        Self { receiver, pipeline }
    }

    pub async fn run(mut self) {
        tracing::info!("Analysis worker started");
        while let Some(msg) = self.receiver.recv().await {
            let pipeline = Arc::clone(&self.pipeline);
            let span = tracing::info_span!(
                "analysis_job",
                job_id = %msg.job_id,
                doc_type = %msg.doc_type,
            );
            tokio::spawn(async move { pipeline.process_job(msg).await }.instrument(span));
        }
        tracing::info!("Analysis worker stopped: channel closed");
    }
}

/// Drives one job through its state machine to a terminal state. Every
/// failure between extraction and generation ends up in the job record;
/// nothing propagates back to the caller that scheduled the run.
pub struct AnalysisPipeline {
    upload_store: Arc<dyn UploadStore>,
    text_extractor: Arc<dyn TextExtractor>,
    prompt_store: Arc<dyn PromptStore>,
    summarizer: Arc<dyn Summarizer>,
    job_repository: Arc<dyn JobRepository>,
}

impl AnalysisPipeline {
    pub fn new(
        upload_store: Arc<dyn UploadStore>,
        text_extractor: Arc<dyn TextExtractor>,
        prompt_store: Arc<dyn PromptStore>,
        summarizer: Arc<dyn Summarizer>,
        job_repository: Arc<dyn JobRepository>,
    ) -> Self {
        Self {
            upload_store,
            text_extractor,
            prompt_store,
            summarizer,
            job_repository,
        }
    }

    pub async fn process_job(&self, msg: AnalysisMessage) {
        let job_id = msg.job_id;

        let result = self.run_pipeline(&msg).await;

        let terminal = match result {
            Ok(report) => {
                tracing::info!("Analysis completed");
                JobState::Complete { report }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Analysis failed");
                JobState::Failed {
                    error: e.to_string(),
                }
            }
        };

        if let Err(e) = self.job_repository.update_state(job_id, terminal).await {
            tracing::error!(error = %e, "Failed to record terminal job state");
        }
    }

    async fn run_pipeline(&self, msg: &AnalysisMessage) -> Result<AnalysisReport, AnalysisError> {
        self.mark_step(msg.job_id, AnalysisStep::ExtractingText)
            .await?;

        let data = self
            .upload_store
            .fetch(&msg.storage_path)
            .await
            .map_err(AnalysisError::Staging)?;

        let text = self
            .text_extractor
            .extract_text(&data)
            .await
            .map_err(AnalysisError::Extraction)?;
        tracing::debug!(chars = text.len(), "Text extraction complete");

        let template = self
            .prompt_store
            .load(&msg.doc_type)
            .await
            .map_err(AnalysisError::Prompt)?;

        self.mark_step(msg.job_id, AnalysisStep::GeneratingSummary)
            .await?;

        let prompt = compose_prompt(&template, &text);
        let summary = self
            .summarizer
            .generate(&prompt)
            .await
            .map_err(AnalysisError::Generation)?;

        Ok(AnalysisReport::summary_only(summary))
    }

    async fn mark_step(
        &self,
        job_id: DocumentId,
        step: AnalysisStep,
    ) -> Result<(), AnalysisError> {
        tracing::debug!(step = %step, "Job step transition");
        self.job_repository
            .update_state(job_id, JobState::Processing { step })
            .await
            .map_err(AnalysisError::Repository)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("{0}")]
    Staging(crate::application::ports::UploadStoreError),
    #[error("{0}")]
    Extraction(crate::application::ports::TextExtractorError),
    #[error("{0}")]
    Prompt(crate::application::ports::PromptStoreError),
    #[error("{0}")]
    Generation(crate::application::ports::SummarizerError),
    #[error("repository: {0}")]
    Repository(crate::application::ports::RepositoryError),
}
