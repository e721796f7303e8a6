pub mod config;
#[cfg(feature = "sea-orm")]
pub mod entity;
pub mod fingerprint;
pub mod import_job;
pub mod metadata;
pub mod notify;
pub mod production;
pub mod resource;
pub mod storage;

pub use fingerprint::Fingerprint;
pub use import_job::ImportJob;
pub use production::{AssetRecord, Production};
pub use resource::{Resource, ResourceKind};
