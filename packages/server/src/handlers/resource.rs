use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use common::resource::{ParsedResource, document_path};
use common::{ImportJob, Resource, ResourceKind};
use tracing::{info, instrument, warn};

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthClient;
use crate::extractors::body::ResourceDocument;
use crate::handlers::production::owned_production;
use crate::models::resource::{ResourceWriteResponse, WriteParams};
use crate::resources::import_jobs;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/{guid}/{kind}/{id}",
    tag = "Resources",
    operation_id = "createResource",
    summary = "Create a resource document",
    description = "Validates and stores a show, episode or asset document. Fails with CONFLICT if the document exists, unless `force` is set. References marked `rel: import` are queued for import.",
    params(
        ("guid" = String, Path, description = "Production GUID"),
        ("kind" = String, Path, description = "show, episode or asset"),
        ("id" = String, Path, description = "Resource GUID"),
        WriteParams,
    ),
    request_body(content = String, content_type = "application/x-yaml", description = "YAML or JSON resource document"),
    responses(
        (status = 201, description = "Document written", body = ResourceWriteResponse),
        (status = 400, description = "Invalid document (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Owned by another client (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Production not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Document exists (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth, document))]
pub async fn create_resource(
    auth: AuthClient,
    State(state): State<AppState>,
    Path((guid, kind, id)): Path<(String, String, String)>,
    Query(params): Query<WriteParams>,
    ResourceDocument(document): ResourceDocument,
) -> Result<impl IntoResponse, AppError> {
    let path = prepare_write(&state, &auth, &guid, &kind, &id, &document).await?;
    state
        .resources
        .create(&path, params.force, &document.resource)
        .await?;

    let imports = dispatch_imports(&state, &guid, &document.resource).await;
    Ok((
        StatusCode::CREATED,
        Json(ResourceWriteResponse {
            path,
            kind: document.kind,
            guid: document.guid,
            imports,
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/{guid}/{kind}/{id}",
    tag = "Resources",
    operation_id = "updateResource",
    summary = "Update a resource document",
    description = "Validates and replaces a document. Fails with NOT_FOUND if it does not exist, unless `force` is set.",
    params(
        ("guid" = String, Path, description = "Production GUID"),
        ("kind" = String, Path, description = "show, episode or asset"),
        ("id" = String, Path, description = "Resource GUID"),
        WriteParams,
    ),
    request_body(content = String, content_type = "application/x-yaml", description = "YAML or JSON resource document"),
    responses(
        (status = 200, description = "Document written", body = ResourceWriteResponse),
        (status = 400, description = "Invalid document (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Owned by another client (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Production or document not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth, document))]
pub async fn update_resource(
    auth: AuthClient,
    State(state): State<AppState>,
    Path((guid, kind, id)): Path<(String, String, String)>,
    Query(params): Query<WriteParams>,
    ResourceDocument(document): ResourceDocument,
) -> Result<Json<ResourceWriteResponse>, AppError> {
    let path = prepare_write(&state, &auth, &guid, &kind, &id, &document).await?;
    state
        .resources
        .update(&path, params.force, &document.resource)
        .await?;

    let imports = dispatch_imports(&state, &guid, &document.resource).await;
    Ok(Json(ResourceWriteResponse {
        path,
        kind: document.kind,
        guid: document.guid,
        imports,
    }))
}

#[utoipa::path(
    get,
    path = "/{guid}/{kind}/{id}",
    tag = "Resources",
    operation_id = "getResource",
    summary = "Read a resource document",
    params(
        ("guid" = String, Path, description = "Production GUID"),
        ("kind" = String, Path, description = "show, episode or asset"),
        ("id" = String, Path, description = "Resource GUID"),
    ),
    responses(
        (status = 200, description = "The stored document", body = serde_json::Value),
        (status = 400, description = "Unknown kind (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Owned by another client (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Production or document not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth))]
pub async fn get_resource(
    auth: AuthClient,
    State(state): State<AppState>,
    Path((guid, kind, id)): Path<(String, String, String)>,
) -> Result<Json<Resource>, AppError> {
    let kind: ResourceKind = kind.parse()?;
    owned_production(&state, &auth, &guid).await?;
    let parsed = state.resources.get(&document_path(&guid, kind, &id)).await?;
    Ok(Json(parsed.resource))
}

/// Check ownership and that the document's identity matches its path.
/// Returns the object path to write.
async fn prepare_write(
    state: &AppState,
    auth: &AuthClient,
    guid: &str,
    kind: &str,
    id: &str,
    document: &ParsedResource,
) -> Result<String, AppError> {
    let kind: ResourceKind = kind.parse()?;
    owned_production(state, auth, guid).await?;

    if document.kind != kind {
        return Err(AppError::Validation(format!(
            "document kind '{}' does not match path kind '{kind}'",
            document.kind
        )));
    }
    if document.guid != id {
        return Err(AppError::Validation(format!(
            "document guid '{}' does not match path guid '{id}'",
            document.guid
        )));
    }
    if document.resource.parent_guid() != Some(guid) {
        return Err(AppError::Validation(format!(
            "document does not belong to production '{guid}'"
        )));
    }

    Ok(document_path(guid, kind, id))
}

/// Queue the imports a document asks for. Returns the destinations handed off.
///
/// Without a queue the import runs in a background task. A queue failure is
/// reported and does not undo the document write.
async fn dispatch_imports(state: &AppState, parent: &str, resource: &Resource) -> Vec<String> {
    let mut dispatched = Vec::new();
    for job in import_jobs(parent, resource) {
        match &state.publisher {
            Some(publisher) => {
                if let Err(e) = publisher.publish_import(&job).await {
                    warn!(job_id = %job.job_id, error = %e, "Failed to queue import");
                    state.notifier.report("queue_import", &e);
                    continue;
                }
            }
            None => spawn_import(state, job.clone()),
        }
        info!(job_id = %job.job_id, dest = %job.dest, "Import dispatched");
        dispatched.push(job.dest);
    }
    dispatched
}

fn spawn_import(state: &AppState, job: ImportJob) {
    let importer = Arc::clone(&state.importer);
    tokio::spawn(async move {
        importer.run(&job).await;
    });
}
