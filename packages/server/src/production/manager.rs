use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use common::config::EndpointConfig;
use common::metadata::{MetadataError, MetadataStore};
use common::notify::Notifier;
use common::resource::{Resource, ResourceKind, document_path, scaffold};
use common::Production;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::resources::{RepositoryError, ResourceRepository};

const MAX_NAME_LEN: usize = 63;
const SEED_EPISODE_NAME: &str = "episode1";

#[derive(Debug, Error)]
pub enum ProductionError {
    #[error(
        "invalid production name '{0}': use 1-63 lowercase letters, digits or dashes, not starting or ending with a dash"
    )]
    InvalidName(String),

    #[error("production '{0}' already exists")]
    Conflict(String),

    #[error("production '{0}' not found")]
    NotFound(String),

    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Undo action for a committed saga step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Compensation {
    DeleteRecord(String),
    DeleteDocument(String),
}

impl fmt::Display for Compensation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeleteRecord(guid) => write!(f, "delete production record '{guid}'"),
            Self::DeleteDocument(path) => write!(f, "delete document '{path}'"),
        }
    }
}

/// Trim and lowercase a production name, then check it is a DNS-label style slug.
pub fn normalize_name(name: &str) -> Result<String, ProductionError> {
    let name = name.trim().to_lowercase();
    let valid = !name.is_empty()
        && name.len() <= MAX_NAME_LEN
        && !name.starts_with('-')
        && !name.ends_with('-')
        && name
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-');
    if valid {
        Ok(name)
    } else {
        Err(ProductionError::InvalidName(name))
    }
}

/// Creates productions across the metadata store and the resource documents.
///
/// Creation is a saga: each committed step pushes its compensation, and the
/// first failure unwinds them in reverse order before the error is returned.
pub struct ProductionManager {
    metadata: Arc<dyn MetadataStore>,
    resources: Arc<ResourceRepository>,
    notifier: Arc<dyn Notifier>,
    endpoints: EndpointConfig,
}

impl ProductionManager {
    pub fn new(
        metadata: Arc<dyn MetadataStore>,
        resources: Arc<ResourceRepository>,
        notifier: Arc<dyn Notifier>,
        endpoints: EndpointConfig,
    ) -> Self {
        Self {
            metadata,
            resources,
            notifier,
            endpoints,
        }
    }

    #[instrument(skip(self, title, summary), fields(guid))]
    pub async fn create_production(
        &self,
        name: &str,
        title: &str,
        summary: &str,
        owner: &str,
    ) -> Result<Production, ProductionError> {
        let name = normalize_name(name)?;

        if self.metadata.find_production_by_name(&name).await?.is_some() {
            return Err(ProductionError::Conflict(name));
        }

        let guid = Production::allocate_guid();
        tracing::Span::current().record("guid", guid.as_str());
        let production = Production::new(
            guid.clone(),
            name.clone(),
            title.to_string(),
            summary.to_string(),
            owner.to_string(),
            Utc::now().timestamp(),
        );

        // The insert is conditional; a concurrent creation of the same name loses here.
        self.metadata
            .create_production(&production)
            .await
            .map_err(|e| match e {
                MetadataError::Conflict(_) => ProductionError::Conflict(name.clone()),
                other => other.into(),
            })?;
        let mut compensations = vec![Compensation::DeleteRecord(guid.clone())];

        for (path, seed) in self.seed_documents(&name, title, summary, &guid) {
            if let Err(e) = self.resources.create(&path, false, &seed).await {
                warn!(path = %path, error = %e, "Seeding failed, rolling back");
                self.compensate(compensations).await;
                return Err(e.into());
            }
            compensations.push(Compensation::DeleteDocument(path));
        }

        info!(name = %production.name, "Production created");
        Ok(production)
    }

    /// Default Show and Episode documents, in the order they are written.
    fn seed_documents(
        &self,
        name: &str,
        title: &str,
        summary: &str,
        guid: &str,
    ) -> Vec<(String, Resource)> {
        let show = scaffold::default_show(name, title, summary, guid, &self.endpoints);
        let episode =
            scaffold::default_episode(name, SEED_EPISODE_NAME, guid, guid, &self.endpoints);
        vec![
            (document_path(guid, ResourceKind::Show, guid), show.into()),
            (
                document_path(guid, ResourceKind::Episode, guid),
                episode.into(),
            ),
        ]
    }

    /// Undo committed steps, newest first. Failures are reported, never returned.
    async fn compensate(&self, compensations: Vec<Compensation>) {
        for step in compensations.into_iter().rev() {
            let result = match &step {
                Compensation::DeleteRecord(guid) => self
                    .metadata
                    .delete_production(guid)
                    .await
                    .map(|_| ())
                    .map_err(ProductionError::from),
                Compensation::DeleteDocument(path) => self
                    .resources
                    .delete(path)
                    .await
                    .map(|_| ())
                    .map_err(ProductionError::from),
            };
            match result {
                Ok(()) => info!(step = %step, "Compensation applied"),
                Err(e) => {
                    warn!(step = %step, error = %e, "Compensation failed");
                    self.notifier.report("create_production", &e);
                }
            }
        }
    }

    pub async fn get_production(&self, guid: &str) -> Result<Production, ProductionError> {
        self.metadata
            .get_production(guid)
            .await?
            .ok_or_else(|| ProductionError::NotFound(guid.to_string()))
    }

    pub async fn find_production_by_name(
        &self,
        name: &str,
    ) -> Result<Option<Production>, ProductionError> {
        Ok(self.metadata.find_production_by_name(name).await?)
    }

    pub async fn list_productions(&self, owner: &str) -> Result<Vec<Production>, ProductionError> {
        Ok(self.metadata.list_productions(owner).await?)
    }
}
