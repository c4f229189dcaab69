use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use futures::stream;
use serde::Serialize;

use crate::domain::{DocumentId, StoragePath};
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct UploadResponse {
    pub file_id: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Accepts a multipart PDF upload, persists it under a fresh id, and returns
/// that id. No file-type or size validation happens here; an unreadable
/// upload surfaces later as a failed analysis job.
#[tracing::instrument(skip(state, multipart))]
pub async fn upload_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let field = match multipart.next_field().await {
        Ok(Some(f)) => f,
        Ok(None) => {
            tracing::warn!("Upload request with no file");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "No file uploaded".to_string(),
                }),
            )
                .into_response();
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to read multipart");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Failed to read multipart: {}", e),
                }),
            )
                .into_response();
        }
    };

    let filename = field.file_name().unwrap_or("unknown").to_string();

    let data = match field.bytes().await {
        Ok(d) => d,
        Err(e) => {
            tracing::error!(error = %e, "Failed to read file bytes");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Failed to read file: {}", e),
                }),
            )
                .into_response();
        }
    };

    let file_id = DocumentId::new();
    let storage_path = StoragePath::for_upload(&file_id);

    tracing::debug!(filename = %filename, bytes = data.len(), "Storing upload");

    let byte_stream = Box::pin(stream::iter(vec![Ok(data)]));
    if let Err(e) = state.upload_store.store(&storage_path, byte_stream).await {
        tracing::error!(error = %e, "Failed to persist upload");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("Failed to store file: {}", e),
            }),
        )
            .into_response();
    }

    tracing::info!(file_id = %file_id, filename = %filename, "Upload stored");

    (
        StatusCode::OK,
        Json(UploadResponse {
            file_id: file_id.to_string(),
        }),
    )
        .into_response()
}
