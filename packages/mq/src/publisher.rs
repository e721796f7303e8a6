use std::sync::Arc;

use async_trait::async_trait;
use common::ImportJob;
use tracing::info;

use crate::error::MqError;
use crate::models::MqQueue;

/// Hands import jobs to whatever executes them.
#[async_trait]
pub trait ImportPublisher: Send + Sync {
    async fn publish_import(&self, job: &ImportJob) -> Result<(), MqError>;
}

/// Publishes import jobs onto a broccoli queue consumed by the worker.
pub struct QueuePublisher {
    mq: Arc<MqQueue>,
    queue_name: String,
}

impl QueuePublisher {
    pub fn new(mq: Arc<MqQueue>, queue_name: impl Into<String>) -> Self {
        Self {
            mq,
            queue_name: queue_name.into(),
        }
    }
}

#[async_trait]
impl ImportPublisher for QueuePublisher {
    async fn publish_import(&self, job: &ImportJob) -> Result<(), MqError> {
        self.mq
            .publish(&self.queue_name, None, job, None)
            .await
            .map_err(|e| MqError::Unavailable(e.to_string()))?;
        info!(
            job_id = %job.job_id,
            source = %job.source,
            dest = %job.dest,
            queue = %self.queue_name,
            "Import job published"
        );
        Ok(())
    }
}
