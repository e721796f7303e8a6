use std::sync::Arc;

use common::metadata::MetadataStore;
use common::notify::Notifier;
use common::storage::ObjectStore;
use mq::ImportPublisher;
use worker::ImportPipeline;

use crate::config::AppConfig;
use crate::feed::FeedBuilder;
use crate::production::ProductionManager;
use crate::resources::ResourceRepository;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub metadata: Arc<dyn MetadataStore>,
    pub resources: Arc<ResourceRepository>,
    pub productions: Arc<ProductionManager>,
    pub feeds: Arc<FeedBuilder>,
    pub importer: Arc<ImportPipeline>,
    /// `None` when MQ is disabled; imports then run in-process.
    pub publisher: Option<Arc<dyn ImportPublisher>>,
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        store: Arc<dyn ObjectStore>,
        metadata: Arc<dyn MetadataStore>,
        notifier: Arc<dyn Notifier>,
        publisher: Option<Arc<dyn ImportPublisher>>,
        http: reqwest::Client,
    ) -> Self {
        let storage = &config.storage;
        let resources = Arc::new(ResourceRepository::new(
            store.clone(),
            storage.production_bucket.clone(),
        ));
        let productions = Arc::new(ProductionManager::new(
            metadata.clone(),
            resources.clone(),
            notifier.clone(),
            config.endpoints.clone(),
        ));
        let feeds = Arc::new(FeedBuilder::new(
            metadata.clone(),
            resources.clone(),
            store.clone(),
            storage.cdn_bucket.clone(),
            config.endpoints.clone(),
        ));
        let importer = Arc::new(ImportPipeline::new(
            http,
            store,
            metadata.clone(),
            notifier.clone(),
            storage.cdn_bucket.clone(),
        ));

        Self {
            config: Arc::new(config),
            metadata,
            resources,
            productions,
            feeds,
            importer,
            publisher,
            notifier,
        }
    }
}
