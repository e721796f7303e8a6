mod error;
mod traits;

pub mod filesystem;
#[cfg(feature = "object-storage")]
pub mod s3;

use std::sync::Arc;

pub use error::StorageError;
pub use filesystem::FilesystemObjectStore;
pub use traits::{BoxReader, ObjectStore};

use crate::config::{StorageAppConfig, StorageBackend};

/// Buffer size used when streaming media into the store.
pub const TRANSFER_BUFFER_SIZE: usize = 64 * 1024;

/// Reject empty, absolute, or parent-escaping object paths.
pub fn validate_object_path(path: &str) -> Result<(), StorageError> {
    if path.is_empty()
        || path.starts_with('/')
        || path
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        return Err(StorageError::InvalidPath(path.to_string()));
    }
    Ok(())
}

/// Build the object store selected by configuration.
pub async fn from_config(config: &StorageAppConfig) -> Result<Arc<dyn ObjectStore>, StorageError> {
    match config.backend {
        StorageBackend::Filesystem => {
            let store = FilesystemObjectStore::new(config.root.clone()).await?;
            Ok(Arc::new(store))
        }
        #[cfg(feature = "object-storage")]
        StorageBackend::S3 => {
            let s3 = config.s3.as_ref().ok_or_else(|| {
                StorageError::Backend("storage.backend is 's3' but [storage.s3] is missing".into())
            })?;
            Ok(Arc::new(s3::S3ObjectStore::new(s3.clone())))
        }
        #[cfg(not(feature = "object-storage"))]
        StorageBackend::S3 => Err(StorageError::Backend(
            "built without the 'object-storage' feature".into(),
        )),
    }
}
