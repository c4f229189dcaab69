use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::mpsc;

use docdigest::application::ports::{
    JobRepository, PromptStore, Summarizer, TextExtractor, UploadStore,
};
use docdigest::application::services::{
    AnalysisPipeline, AnalysisWorker, RetentionConfig, RetentionSweeper,
};
use docdigest::infrastructure::extraction::PdfTextExtractor;
use docdigest::infrastructure::llm::ChatCompletionsClient;
use docdigest::infrastructure::observability::{init_tracing, TracingConfig};
use docdigest::infrastructure::persistence::InMemoryJobRepository;
use docdigest::infrastructure::prompts::FsPromptStore;
use docdigest::infrastructure::storage::LocalUploadStore;
use docdigest::presentation::{create_router, AppState, Settings};

const ANALYSIS_QUEUE_CAPACITY: usize = 64;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env();
    init_tracing(TracingConfig::default(), settings.server.port);

    let job_repository: Arc<dyn JobRepository> = Arc::new(InMemoryJobRepository::new());
    let upload_store: Arc<dyn UploadStore> =
        Arc::new(LocalUploadStore::new(settings.storage.upload_dir.clone())?);
    let text_extractor: Arc<dyn TextExtractor> = Arc::new(PdfTextExtractor::new());
    let prompt_store: Arc<dyn PromptStore> =
        Arc::new(FsPromptStore::new(settings.storage.prompts_dir.clone()));
    let summarizer: Arc<dyn Summarizer> = Arc::new(ChatCompletionsClient::new(&settings.ai));

    let pipeline = Arc::new(AnalysisPipeline::new(
        Arc::clone(&upload_store),
        text_extractor,
        prompt_store,
        summarizer,
        Arc::clone(&job_repository),
    ));

    let (analysis_sender, analysis_receiver) = mpsc::channel(ANALYSIS_QUEUE_CAPACITY);
    let worker = AnalysisWorker::new(analysis_receiver, pipeline);
    tokio::spawn(worker.run());

    let sweeper = RetentionSweeper::new(
        Arc::clone(&job_repository),
        RetentionConfig {
            ttl: settings.retention.job_ttl,
            sweep_interval: settings.retention.sweep_interval,
        },
    );
    tokio::spawn(sweeper.run());

    let state = AppState {
        job_repository,
        upload_store,
        analysis_sender,
        settings: settings.clone(),
    };

    let router = create_router(state);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
