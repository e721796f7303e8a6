use common::Production;
use serde::{Deserialize, Serialize};

/// Request body for creating a production.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateProductionRequest {
    /// Unique slug, normalized to lowercase.
    #[schema(example = "mypodcast")]
    pub name: String,
    /// Defaults to the name.
    #[schema(example = "My Podcast")]
    pub title: Option<String>,
    #[schema(example = "A show about shows")]
    pub summary: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ProductionListResponse {
    pub data: Vec<Production>,
}
