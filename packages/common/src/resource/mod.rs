//! Declarative resource documents (show, episode, asset).
//!
//! Documents use a Kubernetes-style envelope:
//!
//! ```yaml
//! apiVersion: v1
//! kind: episode
//! metadata:
//!   name: episode1
//!   labels:
//!     guid: e1
//!     parent: g1
//! description: ...
//! ```

mod error;
mod model;
pub mod scaffold;
mod validate;

use serde::Deserialize;

pub use error::{ResourceError, ValidationError, Violation};
pub use model::*;
pub use validate::{Validate, ValidationResult, Validator};

/// A decoded document together with its identity.
#[derive(Debug, Clone)]
pub struct ParsedResource {
    pub resource: Resource,
    pub kind: ResourceKind,
    pub guid: String,
}

#[derive(Deserialize)]
struct Envelope {
    kind: String,
}

/// Decode a YAML (or JSON) document into its typed resource.
///
/// The kind is checked before the payload so an unknown kind is reported as
/// [`ResourceError::KindUnsupported`] rather than a decode failure.
pub fn parse(data: &[u8]) -> Result<ParsedResource, ResourceError> {
    let envelope: Envelope =
        serde_yaml::from_slice(data).map_err(|e| ResourceError::Malformed(e.to_string()))?;
    let kind: ResourceKind = envelope.kind.parse()?;

    let resource = match kind {
        ResourceKind::Show => Resource::Show(decode(data)?),
        ResourceKind::Episode => Resource::Episode(decode(data)?),
        ResourceKind::Asset => Resource::Asset(decode(data)?),
    };

    let guid = resource
        .guid()
        .filter(|guid| !guid.trim().is_empty())
        .ok_or_else(|| ResourceError::Malformed("missing 'guid' label".into()))?
        .to_string();

    Ok(ParsedResource {
        resource,
        kind,
        guid,
    })
}

fn decode<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T, ResourceError> {
    serde_yaml::from_slice(data).map_err(|e| ResourceError::Malformed(e.to_string()))
}
