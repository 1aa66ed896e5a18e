use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use scout_core::{FilterSpec, JobRecord, JobStatus};
use serde::Serialize;

use super::{map_store_error, ApiError, ApiResponse, AppState, ResponseMeta};
use crate::middleware::RequestId;

#[derive(Debug, Serialize)]
pub(super) struct JobAccepted {
    job_id: String,
    status: JobStatus,
}

/// `POST /api/v1/discovery`: validates the filters and queues a job.
pub(super) async fn create_discovery(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<FilterSpec>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(filters) =
        body.map_err(|e| ApiError::new(req_id.0.clone(), "validation_error", e.body_text()))?;

    filters
        .validate()
        .map_err(|e| ApiError::new(req_id.0.clone(), "validation_error", e.to_string()))?;

    let job_id = state.queue.enqueue(filters).await.map_err(|e| {
        tracing::error!(error = %e, "failed to queue discovery job");
        ApiError::new(req_id.0.clone(), "internal_error", "failed to queue discovery job")
    })?;

    Ok((
        StatusCode::ACCEPTED,
        Json(ApiResponse {
            data: JobAccepted {
                job_id,
                status: JobStatus::Queued,
            },
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

/// `GET /api/v1/discovery/{job_id}`: current job record.
pub(super) async fn get_discovery(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(job_id): Path<String>,
) -> Result<Json<ApiResponse<JobRecord>>, ApiError> {
    let record = state
        .store
        .get(&job_id)
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?
        .ok_or_else(|| {
            ApiError::new(
                req_id.0.clone(),
                "not_found",
                format!("discovery job {job_id} not found or expired"),
            )
        })?;

    Ok(Json(ApiResponse {
        data: record,
        meta: ResponseMeta::new(req_id.0),
    }))
}
