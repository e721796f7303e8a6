use std::path::PathBuf;

use serde::Deserialize;

/// App-level MQ configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct MqAppConfig {
    /// Whether MQ is enabled. Default: true.
    /// Note: Worker ignores this field (always requires MQ).
    #[serde(default = "default_mq_enabled")]
    pub enabled: bool,
    /// Redis connection URL. Default: "redis://localhost:6379".
    #[serde(default = "default_mq_url")]
    pub url: String,
    /// Connection pool size. Default: 5.
    #[serde(default = "default_mq_pool_size")]
    pub pool_size: u8,
    /// Queue for asset import jobs (server publishes, worker consumes). Default: "import_jobs".
    #[serde(default = "default_mq_queue_name")]
    pub queue_name: String,
}

fn default_mq_enabled() -> bool {
    true
}
fn default_mq_url() -> String {
    "redis://localhost:6379".into()
}
fn default_mq_pool_size() -> u8 {
    5
}
fn default_mq_queue_name() -> String {
    "import_jobs".into()
}

impl Default for MqAppConfig {
    fn default() -> Self {
        Self {
            enabled: default_mq_enabled(),
            url: default_mq_url(),
            pool_size: default_mq_pool_size(),
            queue_name: default_mq_queue_name(),
        }
    }
}

/// Public endpoints used to build links inside resource documents and feeds.
#[derive(Debug, Deserialize, Clone)]
pub struct EndpointConfig {
    #[serde(default = "default_portal_endpoint")]
    pub portal: String,
    #[serde(default = "default_api_endpoint")]
    pub api: String,
    #[serde(default = "default_cdn_endpoint")]
    pub cdn: String,
    /// Direct link to objects in the CDN bucket.
    #[serde(default = "default_storage_endpoint")]
    pub storage: String,
}

fn default_portal_endpoint() -> String {
    "https://podops.dev".into()
}
fn default_api_endpoint() -> String {
    "https://api.podops.dev".into()
}
fn default_cdn_endpoint() -> String {
    "https://cdn.podops.dev".into()
}
fn default_storage_endpoint() -> String {
    "https://storage.googleapis.com/cdn.podops.dev".into()
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            portal: default_portal_endpoint(),
            api: default_api_endpoint(),
            cdn: default_cdn_endpoint(),
            storage: default_storage_endpoint(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Filesystem,
    S3,
}

/// Connection settings for an S3-compatible object store.
#[derive(Debug, Deserialize, Clone)]
pub struct S3Config {
    pub endpoint: String,
    #[serde(default = "default_s3_region")]
    pub region: String,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    /// Use path-style addressing (required by most self-hosted S3 servers).
    #[serde(default)]
    pub path_style: bool,
}

fn default_s3_region() -> String {
    "us-east-1".into()
}

/// Object storage configuration shared by server and worker.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageAppConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// Root directory for the filesystem backend. Each bucket is a subdirectory.
    #[serde(default = "default_storage_root")]
    pub root: PathBuf,
    /// Bucket holding resource documents and media of every production.
    #[serde(default = "default_production_bucket")]
    pub production_bucket: String,
    /// Bucket mirrored by the CDN (imported media, built feeds).
    #[serde(default = "default_cdn_bucket")]
    pub cdn_bucket: String,
    #[serde(default)]
    pub s3: Option<S3Config>,
}

fn default_storage_root() -> PathBuf {
    PathBuf::from("./data/buckets")
}
fn default_production_bucket() -> String {
    "production.podops.dev".into()
}
fn default_cdn_bucket() -> String {
    "cdn.podops.dev".into()
}

impl Default for StorageAppConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            root: default_storage_root(),
            production_bucket: default_production_bucket(),
            cdn_bucket: default_cdn_bucket(),
            s3: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}
