use std::io::Cursor;

use async_trait::async_trait;
use tokio::io::AsyncRead;

use super::error::StorageError;

/// Type alias for a boxed async reader.
pub type BoxReader = Box<dyn AsyncRead + Unpin + Send>;

/// Bucket-organized object storage with last-writer-wins semantics.
///
/// Every write replaces the whole object at once; readers never observe a
/// partially written object.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store bytes at `path`, replacing any existing object.
    async fn put(
        &self,
        bucket: &str,
        path: &str,
        data: &[u8],
        content_type: &str,
    ) -> Result<(), StorageError> {
        let reader: BoxReader = Box::new(Cursor::new(data.to_vec()));
        self.put_stream(bucket, path, reader, content_type)
            .await
            .map(|_| ())
    }

    /// Stream data from an async reader into `path` and return the number of
    /// bytes written. The object is only published once the reader is exhausted.
    async fn put_stream(
        &self,
        bucket: &str,
        path: &str,
        reader: BoxReader,
        content_type: &str,
    ) -> Result<u64, StorageError>;

    /// Retrieve all bytes of an object.
    async fn get(&self, bucket: &str, path: &str) -> Result<Vec<u8>, StorageError>;

    /// Check whether an object exists.
    async fn exists(&self, bucket: &str, path: &str) -> Result<bool, StorageError>;

    /// Delete an object.
    ///
    /// Returns `true` if the object was deleted, `false` if it did not exist.
    async fn delete(&self, bucket: &str, path: &str) -> Result<bool, StorageError>;

    /// List object paths starting with `prefix`, sorted.
    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, StorageError>;
}
