//! Default documents seeded into new productions and handed out as templates.
//!
//! Show labels:
//!   language  ISO-639 code, required
//!   explicit  yes | no, required
//!   type      Episodic | Serial, required
//!   block     yes | no, optional
//!   complete  yes | no, optional
//!
//! Episode labels:
//!   date      RFC 2822 publish date, required
//!   season    number >= 1, required
//!   episode   number >= 1, required
//!   explicit  yes | no, required
//!   type      Full | Trailer | Bonus, required
//!   block     yes | no, optional

use std::collections::BTreeMap;

use chrono::Utc;

use super::model::*;
use crate::config::EndpointConfig;

pub fn default_show_labels(guid: &str) -> BTreeMap<String, String> {
    BTreeMap::from([
        (LABEL_GUID.to_string(), guid.to_string()),
        (LABEL_LANGUAGE.to_string(), "en".to_string()),
        (LABEL_EXPLICIT.to_string(), "no".to_string()),
        (LABEL_TYPE.to_string(), SHOW_TYPE_EPISODIC.to_string()),
        (LABEL_BLOCK.to_string(), "no".to_string()),
        (LABEL_COMPLETE.to_string(), "no".to_string()),
    ])
}

pub fn default_episode_labels(guid: &str, parent_guid: &str) -> BTreeMap<String, String> {
    BTreeMap::from([
        (LABEL_GUID.to_string(), guid.to_string()),
        (LABEL_PARENT_GUID.to_string(), parent_guid.to_string()),
        (LABEL_DATE.to_string(), Utc::now().to_rfc2822()),
        (LABEL_SEASON.to_string(), "1".to_string()),
        (LABEL_EPISODE.to_string(), "1".to_string()),
        (LABEL_EXPLICIT.to_string(), "no".to_string()),
        (LABEL_TYPE.to_string(), EPISODE_TYPE_FULL.to_string()),
        (LABEL_BLOCK.to_string(), "no".to_string()),
    ])
}

pub fn default_show(
    name: &str,
    title: &str,
    summary: &str,
    guid: &str,
    endpoints: &EndpointConfig,
) -> Show {
    Show {
        api_version: API_VERSION.to_string(),
        kind: ResourceKind::Show,
        metadata: Metadata {
            name: name.to_string(),
            labels: default_show_labels(guid),
        },
        description: ShowDescription {
            title: title.to_string(),
            summary: summary.to_string(),
            link: Link {
                uri: format!("{}/s/{}", endpoints.portal, name),
            },
            category: Category {
                name: "Technology".to_string(),
                subcategory: vec!["Podcasting".to_string()],
            },
            owner: Owner {
                name: format!("{name} Owner Name"),
                email: format!("hello@{name}.me"),
            },
            author: format!("{name} author"),
            copyright: format!("{name} copyright"),
        },
        image: AssetRef {
            uri: format!("{}/{}/coverart.png", endpoints.cdn, name),
            rel: AssetRel::External,
            ..Default::default()
        },
    }
}

pub fn default_episode(
    name: &str,
    episode_name: &str,
    guid: &str,
    parent_guid: &str,
    endpoints: &EndpointConfig,
) -> Episode {
    Episode {
        api_version: API_VERSION.to_string(),
        kind: ResourceKind::Episode,
        metadata: Metadata {
            name: episode_name.to_string(),
            labels: default_episode_labels(guid, parent_guid),
        },
        description: EpisodeDescription {
            title: format!("{episode_name} - Episode Title"),
            summary: format!("{episode_name} - Episode Subtitle or short summary"),
            episode_text: "A long-form description of the episode with notes etc.".to_string(),
            link: Link {
                uri: format!("{}/s/{}/{}", endpoints.portal, name, episode_name),
            },
            duration: 0,
        },
        image: AssetRef {
            uri: format!("{}/{}/{}/coverart.png", endpoints.cdn, name, guid),
            rel: AssetRel::External,
            ..Default::default()
        },
        enclosure: AssetRef {
            uri: format!("{}/{}/{}/{}.mp3", endpoints.cdn, name, guid, episode_name),
            rel: AssetRel::External,
            content_type: "audio/mpeg".to_string(),
            size: 0,
        },
    }
}
