use axum::{Json, body::Bytes, extract::State};
use common::ImportJob;
use tracing::{info, instrument, warn};

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::TaskCaller;
use crate::models::import::ImportTaskResponse;
use crate::state::AppState;

/// Run one import job to completion.
///
/// Every failure is terminal: it is reported to operators and the task is
/// acknowledged with 200 so the caller never redelivers it. This includes
/// payloads that do not decode. Only the task runner may call this, and the
/// job may only write the fingerprinted object of its source.
#[utoipa::path(
    post,
    path = "/import",
    tag = "Tasks",
    operation_id = "runImport",
    summary = "Run an asset import",
    request_body(content = String, content_type = "application/json", description = "Import job `{ source, dest }`"),
    responses(
        (status = 200, description = "Import finished, committed or failed", body = ImportTaskResponse),
        (status = 401, description = "Task token missing or wrong (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Task routes are disabled (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("task_token" = [])),
)]
#[instrument(skip(_caller, state, body), fields(bytes = body.len()))]
pub async fn run_import(
    _caller: TaskCaller,
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ImportTaskResponse>, AppError> {
    let job: ImportJob = match serde_json::from_slice(&body) {
        Ok(job) => job,
        Err(e) => {
            warn!(error = %e, "Discarding malformed import task");
            state.notifier.report("import", &e);
            return Ok(Json(ImportTaskResponse {
                job_id: String::new(),
                state: "failed".into(),
            }));
        }
    };

    let outcome = state.importer.run(&job).await;
    info!(job_id = %job.job_id, state = %outcome, "Import task processed");
    Ok(Json(ImportTaskResponse {
        job_id: job.job_id,
        state: outcome.to_string(),
    }))
}
