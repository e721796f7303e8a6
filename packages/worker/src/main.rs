use std::sync::Arc;

use anyhow::Context;
use common::ImportJob;
use common::metadata::{SeaOrmMetadataStore, init_db};
use common::notify::TracingNotifier;
use mq::{BroccoliError, BrokerMessage, MqConfig, init_mq};
use tracing::{error, info};
use worker::ImportPipeline;
use worker::config::WorkerAppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let config = WorkerAppConfig::load().context("Failed to load config")?;
    info!("Worker starting: {}", config.worker.id);

    let db = init_db(&config.database.url)
        .await
        .context("Failed to connect to database")?;
    let store = common::storage::from_config(&config.storage)
        .await
        .context("Failed to initialize object store")?;
    let http = config
        .worker
        .http_client()
        .context("Failed to build HTTP client")?;

    let pipeline = Arc::new(ImportPipeline::new(
        http,
        store,
        Arc::new(SeaOrmMetadataStore::new(db)),
        Arc::new(TracingNotifier),
        config.storage.cdn_bucket.clone(),
    ));

    let mq = init_mq(MqConfig::from(&config.mq))
        .await
        .context("Failed to initialize MQ")?;

    info!(
        queue_name = %config.mq.queue_name,
        concurrency = config.worker.concurrency,
        "MQ connected"
    );

    let result = mq
        .process_messages(
            &config.mq.queue_name,
            Some(config.worker.concurrency),
            None,
            move |message: BrokerMessage<ImportJob>| {
                let pipeline = Arc::clone(&pipeline);
                async move { process_message(message, &pipeline).await }
            },
        )
        .await;

    if let Err(e) = result {
        error!(error = %e, "Worker stopped unexpectedly");
    }

    Ok(())
}

/// Every message is acknowledged: import failures are terminal and already reported.
async fn process_message(
    message: BrokerMessage<ImportJob>,
    pipeline: &ImportPipeline,
) -> Result<(), BroccoliError> {
    let job = message.payload;
    let state = pipeline.run(&job).await;
    info!(job_id = %job.job_id, state = %state, "Import job processed");
    Ok(())
}
