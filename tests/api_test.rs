use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use tower::ServiceExt;

use docdigest::application::ports::{
    JobRepository, PromptStore, Summarizer, SummarizerError, TextExtractor, TextExtractorError,
    UploadStore,
};
use docdigest::application::services::{AnalysisPipeline, AnalysisWorker};
use docdigest::infrastructure::persistence::InMemoryJobRepository;
use docdigest::infrastructure::prompts::FsPromptStore;
use docdigest::infrastructure::storage::LocalUploadStore;
use docdigest::presentation::config::{
    AiSettings, RetentionSettings, ServerSettings, Settings, StorageSettings,
};
use docdigest::presentation::{create_router, AppState};

const MOCK_SUMMARY: &str = "## Summary\n\nAll accounts are in order.";

/// Extractor used by the API tests: treats the uploaded bytes as UTF-8 so
/// plain text stands in for PDF content.
struct Utf8Extractor;

#[async_trait::async_trait]
impl TextExtractor for Utf8Extractor {
    async fn extract_text(&self, data: &[u8]) -> Result<String, TextExtractorError> {
        String::from_utf8(data.to_vec())
            .map_err(|e| TextExtractorError::ExtractionFailed(e.to_string()))
    }
}

struct EmptyDocumentExtractor;

#[async_trait::async_trait]
impl TextExtractor for EmptyDocumentExtractor {
    async fn extract_text(&self, _data: &[u8]) -> Result<String, TextExtractorError> {
        Err(TextExtractorError::NoTextFound)
    }
}

/// Returns a fixed summary and counts invocations.
struct CountingSummarizer {
    calls: Arc<AtomicUsize>,
}

#[async_trait::async_trait]
impl Summarizer for CountingSummarizer {
    async fn generate(&self, _prompt: &str) -> Result<String, SummarizerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(MOCK_SUMMARY.to_string())
    }
}

/// Echoes the prompt back so tests can check which document reached the
/// upstream call.
struct EchoSummarizer;

#[async_trait::async_trait]
impl Summarizer for EchoSummarizer {
    async fn generate(&self, prompt: &str) -> Result<String, SummarizerError> {
        Ok(prompt.to_string())
    }
}

/// Blocks until released, to hold a job in `processing`.
struct GatedSummarizer {
    gate: Arc<tokio::sync::Notify>,
}

#[async_trait::async_trait]
impl Summarizer for GatedSummarizer {
    async fn generate(&self, _prompt: &str) -> Result<String, SummarizerError> {
        self.gate.notified().await;
        Ok(MOCK_SUMMARY.to_string())
    }
}

struct TestApp {
    router: axum::Router,
    _upload_dir: tempfile::TempDir,
    _prompts_dir: tempfile::TempDir,
}

fn test_settings(upload_dir: &std::path::Path, prompts_dir: &std::path::Path) -> Settings {
    Settings {
        server: ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        ai: AiSettings {
            endpoint: None,
            api_token: None,
            model: "n/a".to_string(),
            request_timeout: Duration::from_secs(5),
        },
        storage: StorageSettings {
            upload_dir: upload_dir.to_path_buf(),
            prompts_dir: prompts_dir.to_path_buf(),
            static_dir: upload_dir.join("web"),
        },
        retention: RetentionSettings {
            job_ttl: Duration::from_secs(86_400),
            sweep_interval: Duration::from_secs(600),
        },
    }
}

fn create_test_app(
    text_extractor: Arc<dyn TextExtractor>,
    summarizer: Arc<dyn Summarizer>,
) -> TestApp {
    let upload_dir = tempfile::TempDir::new().unwrap();
    let prompts_dir = tempfile::TempDir::new().unwrap();
    std::fs::write(
        prompts_dir.path().join("account_summary.md"),
        "Summarize this account statement.",
    )
    .unwrap();

    let settings = test_settings(upload_dir.path(), prompts_dir.path());

    let job_repository: Arc<dyn JobRepository> = Arc::new(InMemoryJobRepository::new());
    let upload_store: Arc<dyn UploadStore> =
        Arc::new(LocalUploadStore::new(upload_dir.path().to_path_buf()).unwrap());
    let prompt_store: Arc<dyn PromptStore> =
        Arc::new(FsPromptStore::new(prompts_dir.path().to_path_buf()));

    let pipeline = Arc::new(AnalysisPipeline::new(
        Arc::clone(&upload_store),
        text_extractor,
        prompt_store,
        summarizer,
        Arc::clone(&job_repository),
    ));

    let (analysis_sender, analysis_receiver) = tokio::sync::mpsc::channel(16);
    tokio::spawn(AnalysisWorker::new(analysis_receiver, pipeline).run());

    let state = AppState {
        job_repository,
        upload_store,
        analysis_sender,
        settings,
    };

    TestApp {
        router: create_router(state),
        _upload_dir: upload_dir,
        _prompts_dir: prompts_dir,
    }
}

const BOUNDARY: &str = "test-boundary-4a1f";

fn multipart_body(content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; \
             filename=\"statement.pdf\"\r\nContent-Type: application/pdf\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn upload(app: &TestApp, content: &[u8]) -> String {
    let request = Request::builder()
        .method("POST")
        .uri("/api/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(content)))
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    response_json(response).await["file_id"]
        .as_str()
        .unwrap()
        .to_string()
}

async fn analyze(app: &TestApp, file_id: &str, doc_type: &str) -> axum::response::Response {
    let request = Request::builder()
        .method("POST")
        .uri("/api/analyze")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::json!({ "file_id": file_id, "doc_type": doc_type }).to_string(),
        ))
        .unwrap();

    app.router.clone().oneshot(request).await.unwrap()
}

async fn poll(app: &TestApp, job_id: &str) -> axum::response::Response {
    let request = Request::builder()
        .uri(format!("/api/result/{job_id}"))
        .body(Body::empty())
        .unwrap();

    app.router.clone().oneshot(request).await.unwrap()
}

async fn poll_until_terminal(app: &TestApp, job_id: &str) -> serde_json::Value {
    for _ in 0..200 {
        let response = poll(app, job_id).await;
        assert_eq!(response.status(), StatusCode::OK);
        let record = response_json(response).await;
        match record["status"].as_str().unwrap() {
            "complete" | "failed" => return record,
            _ => tokio::time::sleep(Duration::from_millis(10)).await,
        }
    }
    panic!("job {job_id} never reached a terminal state");
}

#[tokio::test]
async fn given_unknown_job_id_when_polling_then_returns_not_found() {
    let app = create_test_app(
        Arc::new(Utf8Extractor),
        Arc::new(CountingSummarizer {
            calls: Arc::new(AtomicUsize::new(0)),
        }),
    );

    let response = poll(&app, &uuid::Uuid::new_v4().to_string()).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn given_uploaded_file_when_polling_before_analyze_then_returns_not_found() {
    let app = create_test_app(Arc::new(Utf8Extractor), Arc::new(EchoSummarizer));

    let file_id = upload(&app, b"some document text").await;

    // Upload alone creates no job.
    let response = poll(&app, &file_id).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn given_unknown_file_id_when_analyzing_then_returns_not_found_and_creates_no_job() {
    let app = create_test_app(Arc::new(Utf8Extractor), Arc::new(EchoSummarizer));
    let bogus_id = uuid::Uuid::new_v4().to_string();

    let response = analyze(&app, &bogus_id, "account").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = poll(&app, &bogus_id).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn given_malformed_file_id_when_analyzing_then_returns_bad_request() {
    let app = create_test_app(Arc::new(Utf8Extractor), Arc::new(EchoSummarizer));

    let response = analyze(&app, "not-a-uuid", "account").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn given_valid_upload_when_analyzing_then_job_completes_with_summary() {
    let calls = Arc::new(AtomicUsize::new(0));
    let app = create_test_app(
        Arc::new(Utf8Extractor),
        Arc::new(CountingSummarizer {
            calls: Arc::clone(&calls),
        }),
    );

    let file_id = upload(&app, b"quarterly account statement").await;

    let response = analyze(&app, &file_id, "account").await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let job_id = response_json(response).await["job_id"]
        .as_str()
        .unwrap()
        .to_string();
    assert_eq!(job_id, file_id);

    let record = poll_until_terminal(&app, &job_id).await;

    assert_eq!(record["status"], "complete");
    assert_eq!(record["result"]["summary_md"], MOCK_SUMMARY);
    assert_eq!(record["result"]["risks"], serde_json::json!([]));
    assert!(record.get("step").is_none());
    assert!(record.get("error").is_none());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn given_missing_template_when_analyzing_then_job_fails_mentioning_template() {
    let app = create_test_app(Arc::new(Utf8Extractor), Arc::new(EchoSummarizer));

    let file_id = upload(&app, b"a contract nobody wrote a template for").await;
    let response = analyze(&app, &file_id, "contract").await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let record = poll_until_terminal(&app, &file_id).await;

    assert_eq!(record["status"], "failed");
    let error = record["error"].as_str().unwrap();
    assert!(error.contains("contract"), "unexpected error: {error}");
    assert!(record.get("result").is_none());
}

#[tokio::test]
async fn given_document_with_no_text_when_analyzing_then_upstream_is_never_called() {
    let calls = Arc::new(AtomicUsize::new(0));
    let app = create_test_app(
        Arc::new(EmptyDocumentExtractor),
        Arc::new(CountingSummarizer {
            calls: Arc::clone(&calls),
        }),
    );

    let file_id = upload(&app, b"scanned image, no text layer").await;
    analyze(&app, &file_id, "account").await;

    let record = poll_until_terminal(&app, &file_id).await;

    assert_eq!(record["status"], "failed");
    let error = record["error"].as_str().unwrap();
    assert!(error.contains("text"), "unexpected error: {error}");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn given_active_job_when_reanalyzing_then_returns_conflict() {
    let gate = Arc::new(tokio::sync::Notify::new());
    let app = create_test_app(
        Arc::new(Utf8Extractor),
        Arc::new(GatedSummarizer {
            gate: Arc::clone(&gate),
        }),
    );

    let file_id = upload(&app, b"slow to summarize").await;

    let first = analyze(&app, &file_id, "account").await;
    assert_eq!(first.status(), StatusCode::ACCEPTED);

    let second = analyze(&app, &file_id, "account").await;
    assert_eq!(second.status(), StatusCode::CONFLICT);

    gate.notify_one();
    let record = poll_until_terminal(&app, &file_id).await;
    assert_eq!(record["status"], "complete");
}

#[tokio::test]
async fn given_terminal_job_when_reanalyzing_then_job_runs_again() {
    let app = create_test_app(Arc::new(Utf8Extractor), Arc::new(EchoSummarizer));

    let file_id = upload(&app, b"analyze me twice").await;

    analyze(&app, &file_id, "account").await;
    let first = poll_until_terminal(&app, &file_id).await;
    assert_eq!(first["status"], "complete");

    let response = analyze(&app, &file_id, "account").await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let second = poll_until_terminal(&app, &file_id).await;
    assert_eq!(second["status"], "complete");
}

#[tokio::test]
async fn given_terminal_job_when_polling_repeatedly_then_record_is_identical() {
    let app = create_test_app(Arc::new(Utf8Extractor), Arc::new(EchoSummarizer));

    let file_id = upload(&app, b"stable result").await;
    analyze(&app, &file_id, "account").await;

    let first = poll_until_terminal(&app, &file_id).await;
    let second = response_json(poll(&app, &file_id).await).await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn given_two_files_when_analyzed_concurrently_then_jobs_are_independent() {
    let app = create_test_app(Arc::new(Utf8Extractor), Arc::new(EchoSummarizer));

    let first_id = upload(&app, b"document one").await;
    let second_id = upload(&app, b"document two").await;

    analyze(&app, &first_id, "account").await;
    analyze(&app, &second_id, "account").await;

    let first = poll_until_terminal(&app, &first_id).await;
    let second = poll_until_terminal(&app, &second_id).await;

    assert_eq!(first["status"], "complete");
    assert_eq!(second["status"], "complete");
    assert!(first["result"]["summary_md"]
        .as_str()
        .unwrap()
        .contains("document one"));
    assert!(second["result"]["summary_md"]
        .as_str()
        .unwrap()
        .contains("document two"));
}

#[tokio::test]
async fn given_running_service_when_checking_health_then_returns_ok() {
    let app = create_test_app(Arc::new(Utf8Extractor), Arc::new(EchoSummarizer));

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
