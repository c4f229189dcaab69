use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{DocumentId, Job, JobState, Risk};
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct JobRecordResponse {
    pub job_id: String,
    pub doc_type: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ReportBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Serialize)]
pub struct ReportBody {
    pub summary_md: String,
    pub risks: Vec<RiskBody>,
}

#[derive(Serialize)]
pub struct RiskBody {
    pub title: String,
    pub severity: String,
    pub reason: String,
    pub page: u32,
    pub mitigation: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<&Risk> for RiskBody {
    fn from(risk: &Risk) -> Self {
        Self {
            title: risk.title.clone(),
            severity: risk.severity.as_str().to_string(),
            reason: risk.reason.clone(),
            page: risk.page,
            mitigation: risk.mitigation.clone(),
        }
    }
}

fn to_response(job: &Job) -> JobRecordResponse {
    let (result, error) = match &job.state {
        JobState::Complete { report } => (
            Some(ReportBody {
                summary_md: report.summary_md.clone(),
                risks: report.risks.iter().map(RiskBody::from).collect(),
            }),
            None,
        ),
        JobState::Failed { error } => (None, Some(error.clone())),
        _ => (None, None),
    };

    JobRecordResponse {
        job_id: job.id.to_string(),
        doc_type: job.doc_type.to_string(),
        status: job.state.status_str().to_string(),
        step: job.state.step().map(|s| s.as_str().to_string()),
        result,
        error,
        created_at: job.created_at.to_rfc3339(),
        updated_at: job.updated_at.to_rfc3339(),
    }
}

/// Polling endpoint: returns the full current job record. Terminal records
/// never change, so repeated polls after completion return identical bodies.
#[tracing::instrument(skip(state))]
pub async fn job_result_handler(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> impl IntoResponse {
    let uuid = match Uuid::parse_str(&job_id) {
        Ok(u) => u,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Invalid job ID: {}", job_id),
                }),
            )
                .into_response();
        }
    };

    match state.job_repository.get(DocumentId::from_uuid(uuid)).await {
        Ok(Some(job)) => (StatusCode::OK, Json(to_response(&job))).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Job not found.".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch job record");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to fetch job: {}", e),
                }),
            )
                .into_response()
        }
    }
}
