use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use super::error::StorageError;
use super::traits::{BoxReader, ObjectStore};
use super::{TRANSFER_BUFFER_SIZE, validate_object_path};

const TEMP_DIR: &str = ".tmp";

/// Filesystem-backed object store.
///
/// Each bucket is a directory below `base_path` and object paths map onto
/// nested files: `{base_path}/{bucket}/{path}`. Writes land in a per-bucket
/// temp directory first and are renamed into place once complete.
pub struct FilesystemObjectStore {
    base_path: PathBuf,
}

impl FilesystemObjectStore {
    /// Create a new filesystem object store.
    pub async fn new(base_path: PathBuf) -> Result<Self, StorageError> {
        fs::create_dir_all(&base_path).await?;
        Ok(Self { base_path })
    }

    fn bucket_path(&self, bucket: &str) -> Result<PathBuf, StorageError> {
        if bucket.is_empty() || bucket.contains('/') || bucket.starts_with('.') {
            return Err(StorageError::InvalidPath(bucket.to_string()));
        }
        Ok(self.base_path.join(bucket))
    }

    /// Compute the filesystem path for an object.
    fn object_path(&self, bucket: &str, path: &str) -> Result<PathBuf, StorageError> {
        validate_object_path(path)?;
        Ok(self.bucket_path(bucket)?.join(path))
    }

    /// Path for a temporary file during writes.
    async fn temp_path(&self, bucket: &str) -> Result<PathBuf, StorageError> {
        let dir = self.bucket_path(bucket)?.join(TEMP_DIR);
        fs::create_dir_all(&dir).await?;
        Ok(dir.join(uuid::Uuid::new_v4().to_string()))
    }
}

#[async_trait]
impl ObjectStore for FilesystemObjectStore {
    async fn put_stream(
        &self,
        bucket: &str,
        path: &str,
        mut reader: BoxReader,
        _content_type: &str,
    ) -> Result<u64, StorageError> {
        let object_path = self.object_path(bucket, path)?;
        let temp_path = self.temp_path(bucket).await?;

        let result = async {
            let mut total_bytes: u64 = 0;
            let mut buf = vec![0u8; TRANSFER_BUFFER_SIZE];
            let mut temp_file = fs::File::create(&temp_path).await?;

            loop {
                let n = reader.read(&mut buf).await?;
                if n == 0 {
                    break;
                }
                total_bytes += n as u64;
                temp_file.write_all(&buf[..n]).await?;
            }

            temp_file.flush().await?;
            drop(temp_file);

            if let Some(parent) = object_path.parent() {
                fs::create_dir_all(parent).await?;
            }
            fs::rename(&temp_path, &object_path).await?;
            Ok::<u64, std::io::Error>(total_bytes)
        }
        .await;

        if result.is_err() {
            let _ = fs::remove_file(&temp_path).await;
        }
        Ok(result?)
    }

    async fn get(&self, bucket: &str, path: &str) -> Result<Vec<u8>, StorageError> {
        let object_path = self.object_path(bucket, path)?;
        match fs::read(&object_path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(format!("{bucket}/{path}")))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, bucket: &str, path: &str) -> Result<bool, StorageError> {
        let object_path = self.object_path(bucket, path)?;
        match fs::metadata(&object_path).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, bucket: &str, path: &str) -> Result<bool, StorageError> {
        let object_path = self.object_path(bucket, path)?;
        match fs::remove_file(&object_path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, StorageError> {
        let root = self.bucket_path(bucket)?;
        let mut found = Vec::new();
        let mut pending = vec![root.clone()];

        while let Some(dir) = pending.pop() {
            let mut entries = match fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };
            while let Some(entry) = entries.next_entry().await? {
                let entry_path = entry.path();
                if entry.file_type().await?.is_dir() {
                    if dir != root || entry.file_name() != TEMP_DIR {
                        pending.push(entry_path);
                    }
                    continue;
                }
                let key = relative_key(&root, &entry_path);
                if key.starts_with(prefix) {
                    found.push(key);
                }
            }
        }

        found.sort();
        Ok(found)
    }
}

fn relative_key(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
