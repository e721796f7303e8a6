use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ResourceError;

/// The only document API version currently understood.
pub const API_VERSION: &str = "v1";

pub const LABEL_GUID: &str = "guid";
pub const LABEL_PARENT_GUID: &str = "parent";
pub const LABEL_LANGUAGE: &str = "language";
pub const LABEL_EXPLICIT: &str = "explicit";
pub const LABEL_TYPE: &str = "type";
pub const LABEL_BLOCK: &str = "block";
pub const LABEL_COMPLETE: &str = "complete";
pub const LABEL_DATE: &str = "date";
pub const LABEL_SEASON: &str = "season";
pub const LABEL_EPISODE: &str = "episode";

pub const SHOW_TYPE_EPISODIC: &str = "Episodic";
pub const SHOW_TYPE_SERIAL: &str = "Serial";
pub const EPISODE_TYPE_FULL: &str = "Full";
pub const EPISODE_TYPE_TRAILER: &str = "Trailer";
pub const EPISODE_TYPE_BONUS: &str = "Bonus";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Show,
    Episode,
    Asset,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Show => "show",
            Self::Episode => "episode",
            Self::Asset => "asset",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = ResourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "show" => Ok(Self::Show),
            "episode" => Ok(Self::Episode),
            "asset" => Ok(Self::Asset),
            other => Err(ResourceError::KindUnsupported(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub name: String,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

impl Metadata {
    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }
}

/// How an asset's bytes are reached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetRel {
    /// Served from a third-party location, linked as-is.
    #[default]
    External,
    /// Already stored in the production's namespace.
    Internal,
    /// Fetched from a remote location into the production's namespace.
    Import,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub uri: String,
}

/// Reference to a media object from inside a Show or Episode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRef {
    pub uri: String,
    #[serde(default)]
    pub rel: AssetRel,
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub content_type: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub size: i64,
}

fn is_zero(v: &i64) -> bool {
    *v == 0
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    #[serde(default)]
    pub subcategory: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowDescription {
    pub title: String,
    pub summary: String,
    #[serde(default)]
    pub link: Link,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub owner: Owner,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub copyright: String,
}

/// Root resource of a production.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Show {
    pub api_version: String,
    pub kind: ResourceKind,
    pub metadata: Metadata,
    pub description: ShowDescription,
    #[serde(default)]
    pub image: AssetRef,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeDescription {
    pub title: String,
    pub summary: String,
    #[serde(default)]
    pub episode_text: String,
    #[serde(default)]
    pub link: Link,
    /// Seconds.
    #[serde(default)]
    pub duration: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    pub api_version: String,
    pub kind: ResourceKind,
    pub metadata: Metadata,
    pub description: EpisodeDescription,
    #[serde(default)]
    pub image: AssetRef,
    #[serde(default)]
    pub enclosure: AssetRef,
}

/// Standalone media asset document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub api_version: String,
    pub kind: ResourceKind,
    pub metadata: Metadata,
    pub uri: String,
    #[serde(default)]
    pub rel: AssetRel,
    /// Fingerprinted object name, filled in once the asset is stored.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub content_type: String,
    #[serde(default)]
    pub size: i64,
    #[serde(default)]
    pub duration: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub checksum: String,
}

/// Any resource document, dispatched on its kind once at parse time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Resource {
    Show(Show),
    Episode(Episode),
    Asset(Asset),
}

impl Resource {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Show(_) => ResourceKind::Show,
            Self::Episode(_) => ResourceKind::Episode,
            Self::Asset(_) => ResourceKind::Asset,
        }
    }

    pub fn metadata(&self) -> &Metadata {
        match self {
            Self::Show(show) => &show.metadata,
            Self::Episode(episode) => &episode.metadata,
            Self::Asset(asset) => &asset.metadata,
        }
    }

    pub fn name(&self) -> &str {
        &self.metadata().name
    }

    pub fn guid(&self) -> Option<&str> {
        self.metadata().label(LABEL_GUID)
    }

    /// Namespace the resource belongs to. A show is its own parent.
    pub fn parent_guid(&self) -> Option<&str> {
        match self {
            Self::Show(_) => self.guid(),
            _ => self.metadata().label(LABEL_PARENT_GUID),
        }
    }

    /// Serialize to the YAML document format.
    pub fn to_yaml(&self) -> Result<Vec<u8>, ResourceError> {
        Ok(serde_yaml::to_string(self)?.into_bytes())
    }
}

impl From<Show> for Resource {
    fn from(show: Show) -> Self {
        Self::Show(show)
    }
}

impl From<Episode> for Resource {
    fn from(episode: Episode) -> Self {
        Self::Episode(episode)
    }
}

impl From<Asset> for Resource {
    fn from(asset: Asset) -> Self {
        Self::Asset(asset)
    }
}

/// Object path of a resource document: `{parent}/{kind}-{guid}.yaml`.
pub fn document_path(parent: &str, kind: ResourceKind, guid: &str) -> String {
    format!("{parent}/{kind}-{guid}.yaml")
}
