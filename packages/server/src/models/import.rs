use serde::Serialize;

/// Outcome of an import task. Always returned with 200.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ImportTaskResponse {
    /// Empty when the payload could not be decoded.
    pub job_id: String,
    #[schema(example = "committed")]
    pub state: String,
}
