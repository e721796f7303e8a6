//! Metadata Store contract: production records and the asset inventory.

#[cfg(feature = "sea-orm")]
mod database;
#[cfg(feature = "sea-orm")]
mod sea;

use async_trait::async_trait;
use thiserror::Error;

use crate::production::{AssetRecord, Production};

#[cfg(feature = "sea-orm")]
pub use database::init_db;
#[cfg(feature = "sea-orm")]
pub use sea::SeaOrmMetadataStore;

#[derive(Debug, Error)]
pub enum MetadataError {
    /// A record with the same GUID or name already exists.
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("metadata store error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Insert a production only if neither its GUID nor its name is taken.
    async fn create_production(&self, production: &Production) -> Result<(), MetadataError>;

    async fn get_production(&self, guid: &str) -> Result<Option<Production>, MetadataError>;

    async fn find_production_by_name(&self, name: &str)
    -> Result<Option<Production>, MetadataError>;

    async fn list_productions(&self, owner: &str) -> Result<Vec<Production>, MetadataError>;

    /// Returns `true` if a record was removed.
    async fn delete_production(&self, guid: &str) -> Result<bool, MetadataError>;

    /// Record a successful build and the published feed location.
    async fn record_build(
        &self,
        guid: &str,
        feed: &str,
        build_date: i64,
    ) -> Result<(), MetadataError>;

    /// Insert or replace the inventory entry keyed by (parent, name).
    async fn upsert_asset(&self, asset: &AssetRecord) -> Result<(), MetadataError>;

    async fn get_asset(&self, parent: &str, name: &str)
    -> Result<Option<AssetRecord>, MetadataError>;

    async fn list_assets(&self, parent: &str) -> Result<Vec<AssetRecord>, MetadataError>;
}
