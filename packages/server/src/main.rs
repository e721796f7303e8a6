use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use common::metadata::{SeaOrmMetadataStore, init_db};
use common::notify::{ChannelNotifier, spawn_reporter};
use mq::{ImportPublisher, MqConfig, QueuePublisher, init_mq};
use server::config::AppConfig;
use server::state::AppState;
use tracing::{Level, info, warn};

const IMPORT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load().context("Failed to load config")?;

    let db = init_db(&config.database.url)
        .await
        .context("Failed to connect to database")?;
    let store = common::storage::from_config(&config.storage)
        .await
        .context("Failed to initialize object store")?;

    let publisher: Option<Arc<dyn ImportPublisher>> = if config.mq.enabled {
        let mq = init_mq(MqConfig::from(&config.mq))
            .await
            .context("Failed to initialize MQ")?;
        info!(queue_name = %config.mq.queue_name, "MQ connected");
        Some(Arc::new(QueuePublisher::new(
            Arc::new(mq),
            config.mq.queue_name.clone(),
        )))
    } else {
        warn!("MQ disabled, imports run in-process");
        None
    };

    if config.auth.task_secret.is_none() {
        warn!("No task secret configured, task routes will refuse every request");
    }

    let (notifier, reports) = ChannelNotifier::new();
    spawn_reporter(reports);

    let http = reqwest::Client::builder()
        .connect_timeout(IMPORT_CONNECT_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let state = AppState::new(
        config,
        store,
        Arc::new(SeaOrmMetadataStore::new(db)),
        Arc::new(notifier),
        publisher,
        http,
    );
    let app = server::build_router(state);

    info!("Server running at http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
