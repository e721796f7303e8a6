use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use common::Production;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthClient;
use crate::extractors::body::AppJson;
use crate::models::production::{CreateProductionRequest, ProductionListResponse};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/",
    tag = "Productions",
    operation_id = "createProduction",
    summary = "Create a production",
    description = "Registers a new production owned by the caller and seeds its show and first episode documents. Either every step lands or none does.",
    request_body = CreateProductionRequest,
    responses(
        (status = 201, description = "Production created", body = Production),
        (status = 400, description = "Invalid name (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 409, description = "Name already taken (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth, payload), fields(name = %payload.name))]
pub async fn create_production(
    auth: AuthClient,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateProductionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let title = payload.title.unwrap_or_else(|| payload.name.clone());
    let summary = payload.summary.unwrap_or_default();

    let production = state
        .productions
        .create_production(&payload.name, &title, &summary, &auth.client_id)
        .await?;

    Ok((StatusCode::CREATED, Json(production)))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Productions",
    operation_id = "listProductions",
    summary = "List the caller's productions",
    responses(
        (status = 200, description = "Productions ordered by name", body = ProductionListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth))]
pub async fn list_productions(
    auth: AuthClient,
    State(state): State<AppState>,
) -> Result<Json<ProductionListResponse>, AppError> {
    let data = state.productions.list_productions(&auth.client_id).await?;
    Ok(Json(ProductionListResponse { data }))
}

#[utoipa::path(
    get,
    path = "/{guid}",
    tag = "Productions",
    operation_id = "getProduction",
    summary = "Get a production",
    params(("guid" = String, Path, description = "Production GUID")),
    responses(
        (status = 200, description = "Production", body = Production),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Owned by another client (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth))]
pub async fn get_production(
    auth: AuthClient,
    State(state): State<AppState>,
    Path(guid): Path<String>,
) -> Result<Json<Production>, AppError> {
    let production = owned_production(&state, &auth, &guid).await?;
    Ok(Json(production))
}

/// Load a production and check the caller owns it.
pub(crate) async fn owned_production(
    state: &AppState,
    auth: &AuthClient,
    guid: &str,
) -> Result<Production, AppError> {
    let production = state.productions.get_production(guid).await?;
    auth.require_owner(&production)?;
    Ok(production)
}
