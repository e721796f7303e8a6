//! Asset import: fetch a remote source and stream it into the object store.
//!
//! A job moves through `Queued -> Fetching -> Transferring -> Verifying ->
//! Committed`, or stops in `Failed`. There is no retry here; every failure is
//! terminal and goes to the operator channel.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::fingerprint::{asset_name, asset_path, checksum};
use common::metadata::{MetadataError, MetadataStore};
use common::notify::Notifier;
use common::storage::{BoxReader, ObjectStore, StorageError, validate_object_path};
use common::{AssetRecord, ImportJob, ResourceKind};
use futures::TryStreamExt;
use reqwest::StatusCode;
use reqwest::header::{CONTENT_TYPE, DATE};
use thiserror::Error;
use tokio_util::io::StreamReader;
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportState {
    Queued,
    Fetching,
    Transferring,
    Verifying,
    Committed,
    Failed,
}

impl fmt::Display for ImportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Queued => "queued",
            Self::Fetching => "fetching",
            Self::Transferring => "transferring",
            Self::Verifying => "verifying",
            Self::Committed => "committed",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("invalid destination '{0}', expected '{{parent}}/{{object}}'")]
    InvalidDestination(String),

    #[error("destination '{dest}' is not the fingerprinted path '{expected}'")]
    UnexpectedDestination { dest: String, expected: String },

    #[error("can not retrieve '{uri}': {err}")]
    Fetch { uri: String, err: reqwest::Error },

    #[error("can not retrieve '{uri}': status {status}")]
    Status { uri: String, status: StatusCode },

    #[error("'{0}' did not declare a Content-Length")]
    MissingContentLength(String),

    #[error("can not transfer '{dest}': {err}")]
    Transfer { dest: String, err: StorageError },

    #[error("size mismatch: expected {expected} bytes, received {received}")]
    SizeMismatch { expected: u64, received: u64 },

    #[error("error updating inventory: {0}")]
    Inventory(#[from] MetadataError),
}

/// An import that stopped before committing, with the stage it reached.
#[derive(Debug, Error)]
#[error("import {job_id} failed while {stage}: {error}")]
pub struct ImportFailure {
    pub job_id: String,
    pub stage: ImportState,
    #[source]
    pub error: ImportError,
}

/// Response metadata captured before the body is consumed.
struct SourceMetadata {
    size: u64,
    content_type: String,
    timestamp: i64,
}

impl SourceMetadata {
    fn from_response(response: &reqwest::Response, job: &ImportJob) -> Result<Self, ImportError> {
        let size = response
            .content_length()
            .ok_or_else(|| ImportError::MissingContentLength(job.source.clone()))?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .unwrap_or_else(|| {
                mime_guess::from_path(&job.dest)
                    .first_or_octet_stream()
                    .to_string()
            });

        let timestamp = response
            .headers()
            .get(DATE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| DateTime::parse_from_rfc2822(v).ok())
            .map(|d| d.timestamp())
            .unwrap_or_else(|| Utc::now().timestamp());

        Ok(Self {
            size,
            content_type,
            timestamp,
        })
    }
}

/// The transfer only counts if every declared byte arrived.
pub fn verify_size(expected: u64, received: u64) -> Result<(), ImportError> {
    if expected == received {
        Ok(())
    } else {
        Err(ImportError::SizeMismatch { expected, received })
    }
}

pub struct ImportPipeline {
    http: reqwest::Client,
    store: Arc<dyn ObjectStore>,
    metadata: Arc<dyn MetadataStore>,
    notifier: Arc<dyn Notifier>,
    bucket: String,
}

impl ImportPipeline {
    pub fn new(
        http: reqwest::Client,
        store: Arc<dyn ObjectStore>,
        metadata: Arc<dyn MetadataStore>,
        notifier: Arc<dyn Notifier>,
        bucket: impl Into<String>,
    ) -> Self {
        Self {
            http,
            store,
            metadata,
            notifier,
            bucket: bucket.into(),
        }
    }

    /// Run a job to completion and return its final state.
    ///
    /// Failures are reported to the operator channel, never returned.
    pub async fn run(&self, job: &ImportJob) -> ImportState {
        match self.execute(job).await {
            Ok(_) => ImportState::Committed,
            Err(failure) => {
                self.notifier.report("import", &failure);
                ImportState::Failed
            }
        }
    }

    /// Run a job and return the committed inventory entry.
    #[instrument(skip(self, job), fields(job_id = %job.job_id, source = %job.source, dest = %job.dest))]
    pub async fn execute(&self, job: &ImportJob) -> Result<AssetRecord, ImportFailure> {
        let mut stage = ImportState::Queued;
        self.steps(job, &mut stage)
            .await
            .map_err(|error| ImportFailure {
                job_id: job.job_id.clone(),
                stage,
                error,
            })
    }

    async fn steps(
        &self,
        job: &ImportJob,
        stage: &mut ImportState,
    ) -> Result<AssetRecord, ImportError> {
        let parent = job
            .parent()
            .filter(|_| validate_object_path(&job.dest).is_ok())
            .ok_or_else(|| ImportError::InvalidDestination(job.dest.clone()))?;
        // Only the fingerprinted object of the source may be written, never a
        // document or a published artifact such as the feed.
        let expected = asset_path(parent, &job.source);
        if job.dest != expected {
            return Err(ImportError::UnexpectedDestination {
                dest: job.dest.clone(),
                expected,
            });
        }

        advance(stage, ImportState::Fetching);
        let response = self
            .http
            .get(&job.source)
            .send()
            .await
            .map_err(|err| ImportError::Fetch {
                uri: job.source.clone(),
                err,
            })?;
        if response.status() != StatusCode::OK {
            return Err(ImportError::Status {
                uri: job.source.clone(),
                status: response.status(),
            });
        }
        let meta = SourceMetadata::from_response(&response, job)?;

        advance(stage, ImportState::Transferring);
        let body = response.bytes_stream().map_err(std::io::Error::other);
        let reader: BoxReader = Box::new(StreamReader::new(Box::pin(body)));
        let written = self
            .store
            .put_stream(&self.bucket, &job.dest, reader, &meta.content_type)
            .await
            .map_err(|err| ImportError::Transfer {
                dest: job.dest.clone(),
                err,
            })?;

        advance(stage, ImportState::Verifying);
        verify_size(meta.size, written)?;

        let record = AssetRecord {
            name: asset_name(parent, &job.source),
            parent: parent.to_string(),
            checksum: checksum(&job.source),
            kind: ResourceKind::Asset.to_string(),
            source: job.source.clone(),
            location: job.dest.clone(),
            content_type: meta.content_type,
            size: written as i64,
            duration: 0,
            updated: meta.timestamp,
        };
        self.metadata.upsert_asset(&record).await?;
        advance(stage, ImportState::Committed);

        info!(name = %record.name, size = record.size, "Asset imported");
        Ok(record)
    }
}

fn advance(stage: &mut ImportState, next: ImportState) {
    debug!(from = %stage, to = %next, "Import state changed");
    *stage = next;
}
