use std::fmt;

use sha2::{Digest, Sha256};

/// Longest file extension carried over from a source URI onto the derived name.
const MAX_EXTENSION_LEN: usize = 5;

/// A SHA-256 digest naming an asset inside a production namespace.
///
/// Fingerprints are pure functions of their inputs: importing the same source
/// into the same production always resolves to the same object.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Derive the fingerprint of `source` within the `parent` namespace.
    pub fn derive(parent: &str, source: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(parent.as_bytes());
        // NUL cannot appear in either a GUID or a URI, so the split point is unambiguous.
        hasher.update([0u8]);
        hasher.update(source.as_bytes());
        Self(hasher.finalize().into())
    }

    /// Fingerprint of a single identifier, used as an identity checksum.
    pub fn of(data: &[u8]) -> Self {
        Self(Sha256::digest(data).into())
    }

    /// Return the digest as a 64-character lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Object name for `source`: the hex digest plus the source's file extension.
    pub fn object_name(&self, source: &str) -> String {
        match extension(source) {
            Some(ext) => format!("{}.{}", self.to_hex(), ext),
            None => self.to_hex(),
        }
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.to_hex())
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Derived object name of `source` inside `parent`.
pub fn asset_name(parent: &str, source: &str) -> String {
    Fingerprint::derive(parent, source).object_name(source)
}

/// Full object path (`{parent}/{name}`) of `source` inside `parent`.
pub fn asset_path(parent: &str, source: &str) -> String {
    format!("{}/{}", parent, asset_name(parent, source))
}

/// Identity checksum of a source URI, used to detect re-imports.
pub fn checksum(source: &str) -> String {
    Fingerprint::of(source.as_bytes()).to_hex()
}

/// Lowercased extension of the last path segment of a URI, if it has a short one.
fn extension(source: &str) -> Option<String> {
    let without_query = source.split(['?', '#']).next().unwrap_or_default();
    let path = match without_query.split_once("://") {
        Some((_, rest)) => rest.split_once('/').map(|(_, path)| path)?,
        None => without_query,
    };
    let segment = path.rsplit('/').next()?;
    let (stem, ext) = segment.rsplit_once('.')?;
    if stem.is_empty()
        || ext.is_empty()
        || ext.len() > MAX_EXTENSION_LEN
        || !ext.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
