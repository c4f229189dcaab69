use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::ports::{RepositoryError, UploadStoreError};
use crate::application::services::AnalysisMessage;
use crate::domain::{DocType, DocumentId, Job, JobState, StoragePath};
use crate::presentation::state::AppState;

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    pub file_id: String,
    pub doc_type: String,
}

#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub job_id: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Creates a pending job for a previously uploaded file and schedules the
/// analysis pipeline. The job id is the file id; re-submitting while a job
/// for that id is still running is rejected rather than racing the old run.
#[tracing::instrument(skip(state, request), fields(file_id = %request.file_id, doc_type = %request.doc_type))]
pub async fn analyze_handler(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> impl IntoResponse {
    let uuid = match Uuid::parse_str(&request.file_id) {
        Ok(u) => u,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Invalid file ID: {}", request.file_id),
                }),
            )
                .into_response();
        }
    };
    let file_id = DocumentId::from_uuid(uuid);
    let storage_path = StoragePath::for_upload(&file_id);

    match state.upload_store.head(&storage_path).await {
        Ok(_) => {}
        Err(UploadStoreError::NotFound(_)) => {
            tracing::warn!("Analyze request for unknown file");
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "File not found.".to_string(),
                }),
            )
                .into_response();
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to check uploaded file");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to check file: {}", e),
                }),
            )
                .into_response();
        }
    }

    let doc_type = DocType::new(request.doc_type);
    let job = Job::new(file_id, doc_type.clone());

    match state.job_repository.create(&job).await {
        Ok(()) => {}
        Err(RepositoryError::ConstraintViolation(_)) => {
            tracing::warn!("Analyze request while job is still active");
            return (
                StatusCode::CONFLICT,
                Json(ErrorResponse {
                    error: format!("Analysis already in progress for {}", file_id),
                }),
            )
                .into_response();
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to create job record");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to create job: {}", e),
                }),
            )
                .into_response();
        }
    }

    let msg = AnalysisMessage {
        job_id: file_id,
        storage_path,
        doc_type,
    };

    if let Err(e) = state.analysis_sender.send(msg).await {
        tracing::error!(error = %e, "Failed to enqueue analysis job");
        // Leave a terminal record behind so the id is not stuck pending.
        let _ = state
            .job_repository
            .update_state(
                file_id,
                JobState::Failed {
                    error: "Analysis worker unavailable".to_string(),
                },
            )
            .await;
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse {
                error: "Analysis queue unavailable".to_string(),
            }),
        )
            .into_response();
    }

    tracing::info!(job_id = %file_id, "Analysis job enqueued");

    (
        StatusCode::ACCEPTED,
        Json(AnalyzeResponse {
            job_id: file_id.to_string(),
        }),
    )
        .into_response()
}
