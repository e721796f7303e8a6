use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthClient;
use crate::feed::BuildResult;
use crate::handlers::production::owned_production;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/{guid}/build",
    tag = "Productions",
    operation_id = "buildFeed",
    summary = "Build and publish the feed",
    description = "Reads the show and every episode document, validates them, and publishes the feed to the CDN bucket. The production's build date only advances on success.",
    params(("guid" = String, Path, description = "Production GUID")),
    responses(
        (status = 200, description = "Feed published", body = BuildResult),
        (status = 400, description = "A document is invalid (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Owned by another client (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Production or show not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth))]
pub async fn build_feed(
    auth: AuthClient,
    State(state): State<AppState>,
    Path(guid): Path<String>,
) -> Result<Json<BuildResult>, AppError> {
    owned_production(&state, &auth, &guid).await?;
    let result = state.feeds.build(&guid).await?;
    Ok(Json(result))
}
