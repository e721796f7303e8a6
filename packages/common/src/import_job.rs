use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An asset import request sent to the worker queue.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportJob {
    /// Job identifier (UUID), only used for log correlation.
    #[serde(default = "new_job_id")]
    pub job_id: String,
    /// Remote URI to fetch.
    pub source: String,
    /// Destination object path, `{parent_guid}/{object}`.
    pub dest: String,
}

fn new_job_id() -> String {
    Uuid::new_v4().to_string()
}

impl ImportJob {
    /// Create a new import job with a generated UUID.
    pub fn new(source: impl Into<String>, dest: impl Into<String>) -> Self {
        Self {
            job_id: new_job_id(),
            source: source.into(),
            dest: dest.into(),
        }
    }

    /// Production namespace the destination lives in.
    pub fn parent(&self) -> Option<&str> {
        match self.dest.split_once('/') {
            Some((parent, object)) if !parent.is_empty() && !object.is_empty() => Some(parent),
            _ => None,
        }
    }
}
