use std::cmp::Reverse;
use std::sync::Arc;

use chrono::Utc;
use common::config::EndpointConfig;
use common::fingerprint::asset_name;
use common::metadata::{MetadataError, MetadataStore};
use common::resource::{
    AssetRef, AssetRel, Episode, LABEL_EPISODE, LABEL_SEASON, Resource, ResourceKind, Show,
    ValidationError, document_path,
};
use common::storage::{ObjectStore, StorageError};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, instrument};

use super::rss;
use crate::resources::{RepositoryError, ResourceRepository};

const FEED_CONTENT_TYPE: &str = "application/rss+xml";

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("production '{0}' not found")]
    NotFound(String),

    #[error("production '{0}' has no show document")]
    MissingShow(String),

    #[error("'{path}' is invalid: {err}")]
    Invalid { path: String, err: ValidationError },

    #[error("'{path}' references '{uri}', which has not been imported yet")]
    NotImported { path: String, uri: String },

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Store(#[from] StorageError),

    #[error(transparent)]
    Metadata(#[from] MetadataError),
}

/// Outcome of a successful build.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct BuildResult {
    pub guid: String,
    /// Public alias of the feed, stable across CDN changes.
    #[schema(example = "https://podops.dev/s/mypodcast/feed.xml")]
    pub feed_alias_url: String,
    /// Direct CDN location the feed was published to.
    pub feed_url: String,
    pub episodes: usize,
    pub build_date: i64,
}

/// Reads a production's documents and publishes its feed to the CDN bucket.
pub struct FeedBuilder {
    metadata: Arc<dyn MetadataStore>,
    resources: Arc<ResourceRepository>,
    store: Arc<dyn ObjectStore>,
    cdn_bucket: String,
    endpoints: EndpointConfig,
}

fn season_and_episode(episode: &Episode) -> (u32, u32) {
    let number = |key| {
        episode
            .metadata
            .label(key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0)
    };
    (number(LABEL_SEASON), number(LABEL_EPISODE))
}

impl FeedBuilder {
    pub fn new(
        metadata: Arc<dyn MetadataStore>,
        resources: Arc<ResourceRepository>,
        store: Arc<dyn ObjectStore>,
        cdn_bucket: impl Into<String>,
        endpoints: EndpointConfig,
    ) -> Self {
        Self {
            metadata,
            resources,
            store,
            cdn_bucket: cdn_bucket.into(),
            endpoints,
        }
    }

    /// Build and publish the feed. The build date only moves once the feed is written.
    #[instrument(skip(self))]
    pub async fn build(&self, guid: &str) -> Result<BuildResult, BuildError> {
        let production = self
            .metadata
            .get_production(guid)
            .await?
            .ok_or_else(|| BuildError::NotFound(guid.to_string()))?;

        let mut show = self.read_show(guid).await?;
        let show_path = document_path(guid, ResourceKind::Show, guid);
        self.resolve(guid, &show_path, &mut show.image).await?;

        let mut episodes = Vec::new();
        for parsed in self.resources.list(guid, ResourceKind::Episode).await? {
            let path = document_path(guid, ResourceKind::Episode, &parsed.guid);
            check(&path, &parsed.resource)?;
            if let Resource::Episode(mut episode) = parsed.resource {
                self.resolve(guid, &path, &mut episode.enclosure).await?;
                self.resolve(guid, &path, &mut episode.image).await?;
                episodes.push(episode);
            }
        }
        episodes.sort_by_key(|e| Reverse(season_and_episode(e)));

        let link = format!("{}/s/{}", self.endpoints.portal, production.name);
        let build_date = Utc::now().timestamp();
        let xml = rss::render(&show, &episodes, &link, build_date);

        let feed_path = format!("{guid}/feed.xml");
        self.store
            .put(&self.cdn_bucket, &feed_path, xml.as_bytes(), FEED_CONTENT_TYPE)
            .await?;

        let feed_url = format!("{}/{}", self.endpoints.cdn, feed_path);
        self.metadata
            .record_build(guid, &feed_url, build_date)
            .await?;

        info!(episodes = episodes.len(), feed = %feed_url, "Feed published");
        Ok(BuildResult {
            guid: guid.to_string(),
            feed_alias_url: format!("{link}/feed.xml"),
            feed_url,
            episodes: episodes.len(),
            build_date,
        })
    }

    /// Point an imported reference at its committed CDN object, with the
    /// verified size and content type. Other references are published as written.
    async fn resolve(
        &self,
        guid: &str,
        path: &str,
        asset: &mut AssetRef,
    ) -> Result<(), BuildError> {
        if asset.rel != AssetRel::Import || asset.uri.is_empty() {
            return Ok(());
        }
        let record = self
            .metadata
            .get_asset(guid, &asset_name(guid, &asset.uri))
            .await?
            .ok_or_else(|| BuildError::NotImported {
                path: path.to_string(),
                uri: asset.uri.clone(),
            })?;

        asset.uri = format!("{}/{}", self.endpoints.cdn, record.location);
        asset.size = record.size;
        asset.content_type = record.content_type;
        Ok(())
    }

    async fn read_show(&self, guid: &str) -> Result<Show, BuildError> {
        let path = document_path(guid, ResourceKind::Show, guid);
        let parsed = match self.resources.get(&path).await {
            Ok(parsed) => parsed,
            Err(RepositoryError::NotFound(_)) => {
                return Err(BuildError::MissingShow(guid.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        check(&path, &parsed.resource)?;
        match parsed.resource {
            Resource::Show(show) => Ok(show),
            _ => Err(BuildError::MissingShow(guid.to_string())),
        }
    }
}

fn check(path: &str, resource: &Resource) -> Result<(), BuildError> {
    resource
        .validate()
        .into_result()
        .map_err(|err| BuildError::Invalid {
            path: path.to_string(),
            err,
        })
}
