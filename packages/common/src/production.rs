use rand::Rng;
use serde::{Deserialize, Serialize};

const GUID_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const GUID_LEN: usize = 12;

/// A podcast show and its feed bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Production {
    /// Stable lowercase identifier, never changes after creation.
    #[schema(example = "x7k2m9q4p1ab")]
    pub guid: String,
    /// Unique slug.
    #[schema(example = "mypodcast")]
    pub name: String,
    pub title: String,
    pub summary: String,
    /// Client ID of the owner.
    pub owner: String,
    pub feed: String,
    pub new_feed: String,
    /// Unix timestamps (seconds).
    pub pub_date: i64,
    pub build_date: i64,
    pub created: i64,
    pub updated: i64,
}

impl Production {
    /// Build a fresh production record. All dates start at `now`, build date at zero.
    pub fn new(
        guid: String,
        name: String,
        title: String,
        summary: String,
        owner: String,
        now: i64,
    ) -> Self {
        Self {
            guid,
            name,
            title,
            summary,
            owner,
            feed: String::new(),
            new_feed: String::new(),
            pub_date: now,
            build_date: 0,
            created: now,
            updated: now,
        }
    }

    /// Allocate a short, URL-safe, lowercase GUID.
    pub fn allocate_guid() -> String {
        let mut rng = rand::rng();
        (0..GUID_LEN)
            .map(|_| GUID_ALPHABET[rng.random_range(0..GUID_ALPHABET.len())] as char)
            .collect()
    }
}

/// Inventory entry of an asset stored under a production.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AssetRecord {
    /// Fingerprinted object name, unique within the parent.
    pub name: String,
    pub parent: String,
    /// Identity checksum of the source URI.
    pub checksum: String,
    pub kind: String,
    pub source: String,
    /// Object path the bytes were written to.
    pub location: String,
    pub content_type: String,
    pub size: i64,
    pub duration: i64,
    pub updated: i64,
}
