use std::sync::Arc;

use common::resource::{
    self, ParsedResource, Resource, ResourceError, ResourceKind, ValidationError,
};
use common::storage::{ObjectStore, StorageError};
use thiserror::Error;
use tracing::{info, instrument};

const DOCUMENT_CONTENT_TYPE: &str = "application/x-yaml";

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("resource '{0}' already exists")]
    AlreadyExists(String),

    #[error("resource '{0}' not found")]
    NotFound(String),

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Document(#[from] ResourceError),

    #[error(transparent)]
    Store(#[from] StorageError),
}

/// Resource documents of every production, one object per document.
///
/// Writes never touch the metadata store; callers record index changes themselves.
pub struct ResourceRepository {
    store: Arc<dyn ObjectStore>,
    bucket: String,
}

impl ResourceRepository {
    pub fn new(store: Arc<dyn ObjectStore>, bucket: impl Into<String>) -> Self {
        Self {
            store,
            bucket: bucket.into(),
        }
    }

    /// Write a new document. Fails with `AlreadyExists` unless `force` is set.
    #[instrument(skip(self, resource), fields(kind = %resource.kind()))]
    pub async fn create(
        &self,
        path: &str,
        force: bool,
        resource: &Resource,
    ) -> Result<(), RepositoryError> {
        if !force && self.store.exists(&self.bucket, path).await? {
            return Err(RepositoryError::AlreadyExists(path.to_string()));
        }
        self.write(path, resource).await
    }

    /// Replace an existing document. Fails with `NotFound` unless `force` is set.
    #[instrument(skip(self, resource), fields(kind = %resource.kind()))]
    pub async fn update(
        &self,
        path: &str,
        force: bool,
        resource: &Resource,
    ) -> Result<(), RepositoryError> {
        if !force && !self.store.exists(&self.bucket, path).await? {
            return Err(RepositoryError::NotFound(path.to_string()));
        }
        self.write(path, resource).await
    }

    async fn write(&self, path: &str, resource: &Resource) -> Result<(), RepositoryError> {
        resource.validate().into_result()?;
        let data = resource.to_yaml()?;
        self.store
            .put(&self.bucket, path, &data, DOCUMENT_CONTENT_TYPE)
            .await?;
        info!(path, bytes = data.len(), "Resource written");
        Ok(())
    }

    pub async fn get(&self, path: &str) -> Result<ParsedResource, RepositoryError> {
        let data = match self.store.get(&self.bucket, path).await {
            Ok(data) => data,
            Err(StorageError::NotFound(_)) => {
                return Err(RepositoryError::NotFound(path.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        Ok(resource::parse(&data)?)
    }

    /// All documents of one kind under a production, in path order.
    pub async fn list(
        &self,
        parent: &str,
        kind: ResourceKind,
    ) -> Result<Vec<ParsedResource>, RepositoryError> {
        let prefix = format!("{parent}/{kind}-");
        let mut documents = Vec::new();
        for path in self.store.list(&self.bucket, &prefix).await? {
            documents.push(self.get(&path).await?);
        }
        Ok(documents)
    }

    /// Returns `true` if a document was removed.
    pub async fn delete(&self, path: &str) -> Result<bool, RepositoryError> {
        Ok(self.store.delete(&self.bucket, path).await?)
    }
}
