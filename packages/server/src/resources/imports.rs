use common::fingerprint::asset_path;
use common::resource::{AssetRel, Resource};
use common::ImportJob;

/// Import jobs implied by a resource: every reference with `rel: import`,
/// fetched into the fingerprinted object under `parent`.
pub fn import_jobs(parent: &str, resource: &Resource) -> Vec<ImportJob> {
    let sources: Vec<&str> = match resource {
        Resource::Show(show) => imported(&[(&show.image.uri, show.image.rel)]),
        Resource::Episode(episode) => imported(&[
            (&episode.enclosure.uri, episode.enclosure.rel),
            (&episode.image.uri, episode.image.rel),
        ]),
        Resource::Asset(asset) => imported(&[(&asset.uri, asset.rel)]),
    };
    sources
        .into_iter()
        .map(|source| ImportJob::new(source, asset_path(parent, source)))
        .collect()
}

fn imported<'a>(refs: &[(&'a String, AssetRel)]) -> Vec<&'a str> {
    refs.iter()
        .filter(|(uri, rel)| *rel == AssetRel::Import && !uri.is_empty())
        .map(|(uri, _)| uri.as_str())
        .collect()
}
