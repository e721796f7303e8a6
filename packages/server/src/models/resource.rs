use common::ResourceKind;
use serde::{Deserialize, Serialize};

/// Query parameters for resource writes.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
pub struct WriteParams {
    /// Create: overwrite an existing document. Update: create a missing one.
    #[param(example = false)]
    #[serde(default)]
    pub force: bool,
}

/// Result of a resource write.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ResourceWriteResponse {
    /// Object path of the document inside the production bucket.
    #[schema(example = "x7k2m9q4p1ab/episode-e1.yaml")]
    pub path: String,
    pub kind: ResourceKind,
    pub guid: String,
    /// Destination paths of the imports queued by this write.
    pub imports: Vec<String>,
}
