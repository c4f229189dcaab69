use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::ports::{JobRepository, UploadStore};
use crate::application::services::AnalysisMessage;
use crate::presentation::config::Settings;

/// Shared handles for the HTTP layer. The job registry and upload store are
/// constructed once at startup; the sender feeds the analysis worker.
#[derive(Clone)]
pub struct AppState {
    pub job_repository: Arc<dyn JobRepository>,
    pub upload_store: Arc<dyn UploadStore>,
    pub analysis_sender: mpsc::Sender<AnalysisMessage>,
    pub settings: Settings,
}
