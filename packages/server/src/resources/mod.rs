mod imports;
mod repository;

pub use imports::import_jobs;
pub use repository::{RepositoryError, ResourceRepository};
