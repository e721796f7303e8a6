use async_trait::async_trait;
use s3::creds::Credentials;
use s3::error::S3Error;
use s3::{Bucket, Region};
use tokio_util::io::InspectReader;

use super::error::StorageError;
use super::traits::{BoxReader, ObjectStore};
use super::validate_object_path;
use crate::config::S3Config;

/// Object store backed by an S3-compatible service.
///
/// S3 PUTs are atomic per object, which gives the overwrite-on-put semantics
/// resource documents rely on.
pub struct S3ObjectStore {
    config: S3Config,
}

impl S3ObjectStore {
    pub fn new(config: S3Config) -> Self {
        Self { config }
    }

    fn bucket(&self, name: &str) -> Result<Box<Bucket>, StorageError> {
        let region = Region::Custom {
            region: self.config.region.clone(),
            endpoint: self.config.endpoint.clone(),
        };
        let credentials = Credentials::new(
            self.config.access_key.as_deref(),
            self.config.secret_key.as_deref(),
            None,
            None,
            None,
        )
        .map_err(|e| StorageError::Backend(format!("invalid S3 credentials: {e}")))?;

        let bucket = Bucket::new(name, region, credentials).map_err(backend)?;
        Ok(if self.config.path_style {
            bucket.with_path_style()
        } else {
            bucket
        })
    }
}

fn backend(err: S3Error) -> StorageError {
    StorageError::Backend(err.to_string())
}

fn is_not_found(err: &S3Error) -> bool {
    matches!(err, S3Error::HttpFailWithBody(404, _))
}

fn check_status(status: u16, bucket: &str, path: &str) -> Result<(), StorageError> {
    match status {
        200..=299 => Ok(()),
        404 => Err(StorageError::NotFound(format!("{bucket}/{path}"))),
        other => Err(StorageError::Backend(format!(
            "unexpected status {other} for {bucket}/{path}"
        ))),
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_stream(
        &self,
        bucket: &str,
        path: &str,
        reader: BoxReader,
        content_type: &str,
    ) -> Result<u64, StorageError> {
        validate_object_path(path)?;
        let handle = self.bucket(bucket)?;

        let mut written: u64 = 0;
        let mut counting = InspectReader::new(reader, |chunk: &[u8]| {
            written += chunk.len() as u64;
        });
        let response = handle
            .put_object_stream_with_content_type(&mut counting, path, content_type)
            .await
            .map_err(backend)?;
        drop(counting);

        check_status(response.status_code(), bucket, path)?;
        Ok(written)
    }

    async fn get(&self, bucket: &str, path: &str) -> Result<Vec<u8>, StorageError> {
        validate_object_path(path)?;
        match self.bucket(bucket)?.get_object(path).await {
            Ok(response) => {
                check_status(response.status_code(), bucket, path)?;
                Ok(response.bytes().to_vec())
            }
            Err(e) if is_not_found(&e) => Err(StorageError::NotFound(format!("{bucket}/{path}"))),
            Err(e) => Err(backend(e)),
        }
    }

    async fn exists(&self, bucket: &str, path: &str) -> Result<bool, StorageError> {
        validate_object_path(path)?;
        match self.bucket(bucket)?.head_object(path).await {
            Ok((_, 404)) => Ok(false),
            Ok((_, status)) => check_status(status, bucket, path).map(|_| true),
            Err(e) if is_not_found(&e) => Ok(false),
            Err(e) => Err(backend(e)),
        }
    }

    async fn delete(&self, bucket: &str, path: &str) -> Result<bool, StorageError> {
        if !self.exists(bucket, path).await? {
            return Ok(false);
        }
        let response = self
            .bucket(bucket)?
            .delete_object(path)
            .await
            .map_err(backend)?;
        check_status(response.status_code(), bucket, path)?;
        Ok(true)
    }

    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, StorageError> {
        let pages = self
            .bucket(bucket)?
            .list(prefix.to_string(), None)
            .await
            .map_err(backend)?;
        let mut keys: Vec<String> = pages
            .into_iter()
            .flat_map(|page| page.contents.into_iter().map(|object| object.key))
            .collect();
        keys.sort();
        Ok(keys)
    }
}
