use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;

pub use common::config::{DatabaseConfig, MqAppConfig, StorageAppConfig};

use crate::error::Result;

/// Worker-specific configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct WorkerConfig {
    /// Unique identifier for this worker instance. Default: "worker-1".
    #[serde(default = "default_worker_id")]
    pub id: String,
    /// Number of import jobs processed concurrently. Default: 4.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// TCP connect timeout for source fetches, in seconds. Default: 30.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_worker_id() -> String {
    "worker-1".into()
}
fn default_concurrency() -> usize {
    4
}
fn default_connect_timeout_secs() -> u64 {
    30
}

impl WorkerConfig {
    /// HTTP client used to fetch import sources.
    pub fn http_client(&self) -> Result<reqwest::Client> {
        Ok(reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .build()?)
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            id: default_worker_id(),
            concurrency: default_concurrency(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

/// Worker application configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct WorkerAppConfig {
    #[serde(default)]
    pub worker: WorkerConfig,
    #[serde(default)]
    pub mq: MqAppConfig,
    #[serde(default)]
    pub storage: StorageAppConfig,
    pub database: DatabaseConfig,
}

impl WorkerAppConfig {
    pub fn load() -> Result<Self> {
        let config_path =
            std::env::var("PODOPS_CONFIG").unwrap_or_else(|_| "config/config".to_string());

        let s = Config::builder()
            .set_default("worker.id", "worker-1")?
            .set_default("worker.concurrency", 4_i64)?
            .set_default("mq.url", "redis://localhost:6379")?
            .set_default("mq.pool_size", 5_i64)?
            .set_default("mq.queue_name", "import_jobs")?
            .set_default("database.url", "sqlite://data/podops.db?mode=rwc")?
            .add_source(File::with_name(&config_path).required(false))
            .add_source(Environment::with_prefix("PODOPS").separator("__"))
            .build()?;

        Ok(s.try_deserialize()?)
    }
}
