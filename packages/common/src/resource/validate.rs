use chrono::DateTime;

use super::error::{ValidationError, Violation};
use super::model::*;

const EXPLICIT_VALUES: &[&str] = &["yes", "no", "true", "false"];
const FLAG_VALUES: &[&str] = &["yes", "no"];
const SHOW_TYPES: &[&str] = &[SHOW_TYPE_EPISODIC, SHOW_TYPE_SERIAL];
const EPISODE_TYPES: &[&str] = &[EPISODE_TYPE_FULL, EPISODE_TYPE_TRAILER, EPISODE_TYPE_BONUS];

/// Outcome of validating one resource. Holds every violation, not just the first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub kind: ResourceKind,
    violations: Vec<Violation>,
}

impl ValidationResult {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                violations: self.violations,
            })
        }
    }
}

/// Collects field violations for one resource kind.
pub struct Validator {
    kind: ResourceKind,
    violations: Vec<Violation>,
}

impl Validator {
    pub fn new(kind: ResourceKind) -> Self {
        Self {
            kind,
            violations: Vec::new(),
        }
    }

    pub fn finish(self) -> ValidationResult {
        ValidationResult {
            kind: self.kind,
            violations: self.violations,
        }
    }

    fn violation(&mut self, field: &str, message: impl Into<String>) {
        self.violations.push(Violation {
            field: field.to_string(),
            message: message.into(),
        });
    }

    fn require(&mut self, field: &str, value: &str) -> bool {
        if value.trim().is_empty() {
            self.violation(field, "is required");
            return false;
        }
        true
    }

    fn require_label<'a>(&mut self, metadata: &'a Metadata, key: &str) -> Option<&'a str> {
        match metadata.label(key) {
            Some(v) if !v.trim().is_empty() => Some(v),
            _ => {
                self.violation(&label_field(key), "is required");
                None
            }
        }
    }

    fn one_of(&mut self, field: &str, value: &str, allowed: &[&str]) {
        if !allowed.iter().any(|a| a.eq_ignore_ascii_case(value.trim())) {
            self.violation(
                field,
                format!("'{}' is not one of {}", value, allowed.join(", ")),
            );
        }
    }

    fn required_one_of(&mut self, metadata: &Metadata, key: &str, allowed: &[&str]) {
        if let Some(value) = self.require_label(metadata, key) {
            self.one_of(&label_field(key), value, allowed);
        }
    }

    fn optional_one_of(&mut self, metadata: &Metadata, key: &str, allowed: &[&str]) {
        if let Some(value) = metadata.label(key) {
            self.one_of(&label_field(key), value, allowed);
        }
    }

    fn positive_number(&mut self, metadata: &Metadata, key: &str) {
        if let Some(value) = self.require_label(metadata, key) {
            match value.trim().parse::<u32>() {
                Ok(n) if n >= 1 => {}
                _ => self.violation(
                    &label_field(key),
                    format!("'{value}' must be a whole number >= 1"),
                ),
            }
        }
    }

    fn envelope(&mut self, api_version: &str, metadata: &Metadata) {
        if api_version != API_VERSION {
            self.violation(
                "apiVersion",
                format!("unsupported version '{api_version}', expected '{API_VERSION}'"),
            );
        }
        self.require("metadata.name", &metadata.name);
        self.require_label(metadata, LABEL_GUID);
    }

    fn asset_ref(&mut self, field: &str, asset: &AssetRef, require_type: bool) {
        if self.require(&format!("{field}.uri"), &asset.uri) && asset.rel == AssetRel::Import {
            self.remote_uri(&format!("{field}.uri"), &asset.uri);
        }
        if require_type {
            self.require(&format!("{field}.type"), &asset.content_type);
        }
        if asset.size < 0 {
            self.violation(&format!("{field}.size"), "must not be negative");
        }
    }

    fn remote_uri(&mut self, field: &str, uri: &str) {
        if !(uri.starts_with("http://") || uri.starts_with("https://")) {
            self.violation(field, format!("'{uri}' must be an http(s) URI to be imported"));
        }
    }
}

fn label_field(key: &str) -> String {
    format!("metadata.labels.{key}")
}

/// ISO-639 two-letter code with an optional region, e.g. `en`, `de_DE`, `pt-BR`.
fn is_language_code(value: &str) -> bool {
    let bytes = value.as_bytes();
    let lang_ok = |b: &[u8]| b.len() == 2 && b.iter().all(u8::is_ascii_lowercase);
    match bytes.len() {
        2 => lang_ok(bytes),
        5 => {
            lang_ok(&bytes[..2])
                && matches!(bytes[2], b'-' | b'_')
                && bytes[3..].iter().all(u8::is_ascii_alphabetic)
        }
        _ => false,
    }
}

pub trait Validate {
    fn validate(&self, v: &mut Validator);
}

impl Validate for Show {
    fn validate(&self, v: &mut Validator) {
        v.envelope(&self.api_version, &self.metadata);

        if let Some(language) = v.require_label(&self.metadata, LABEL_LANGUAGE)
            && !is_language_code(language)
        {
            v.violation(
                &label_field(LABEL_LANGUAGE),
                format!("'{language}' is not an ISO-639 language code"),
            );
        }
        v.required_one_of(&self.metadata, LABEL_EXPLICIT, EXPLICIT_VALUES);
        v.required_one_of(&self.metadata, LABEL_TYPE, SHOW_TYPES);
        v.optional_one_of(&self.metadata, LABEL_BLOCK, FLAG_VALUES);
        v.optional_one_of(&self.metadata, LABEL_COMPLETE, FLAG_VALUES);

        v.require("description.title", &self.description.title);
        v.require("description.summary", &self.description.summary);
        v.require("description.category.name", &self.description.category.name);
        v.asset_ref("image", &self.image, false);
    }
}

impl Validate for Episode {
    fn validate(&self, v: &mut Validator) {
        v.envelope(&self.api_version, &self.metadata);

        v.require_label(&self.metadata, LABEL_PARENT_GUID);
        if let Some(date) = v.require_label(&self.metadata, LABEL_DATE)
            && DateTime::parse_from_rfc2822(date).is_err()
        {
            v.violation(
                &label_field(LABEL_DATE),
                format!("'{date}' is not an RFC 2822 date"),
            );
        }
        v.positive_number(&self.metadata, LABEL_SEASON);
        v.positive_number(&self.metadata, LABEL_EPISODE);
        v.required_one_of(&self.metadata, LABEL_EXPLICIT, EXPLICIT_VALUES);
        v.required_one_of(&self.metadata, LABEL_TYPE, EPISODE_TYPES);
        v.optional_one_of(&self.metadata, LABEL_BLOCK, FLAG_VALUES);

        v.require("description.title", &self.description.title);
        v.require("description.summary", &self.description.summary);
        if self.description.duration < 0 {
            v.violation("description.duration", "must not be negative");
        }
        v.asset_ref("enclosure", &self.enclosure, true);
    }
}

impl Validate for Asset {
    fn validate(&self, v: &mut Validator) {
        v.envelope(&self.api_version, &self.metadata);

        if v.require("uri", &self.uri) && self.rel == AssetRel::Import {
            v.remote_uri("uri", &self.uri);
        }
        if self.size < 0 {
            v.violation("size", "must not be negative");
        }
    }
}

impl Resource {
    /// Check every field constraint of this resource's kind.
    pub fn validate(&self) -> ValidationResult {
        let mut v = Validator::new(self.kind());
        match self {
            Self::Show(show) => show.validate(&mut v),
            Self::Episode(episode) => episode.validate(&mut v),
            Self::Asset(asset) => asset.validate(&mut v),
        }
        v.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EndpointConfig;
    use crate::resource::scaffold::{default_episode, default_show};

    fn show() -> Show {
        default_show("NAME", "TITLE", "SUMMARY", "GUID", &EndpointConfig::default())
    }

    fn episode() -> Episode {
        default_episode("NAME", "PARENT_NAME", "GUID", "PARENT_GUID", &EndpointConfig::default())
    }

    fn fields(result: &ValidationResult) -> Vec<&str> {
        result.violations().iter().map(|v| v.field.as_str()).collect()
    }

    #[test]
    fn default_show_is_clean() {
        let result = Resource::from(show()).validate();
        assert!(result.is_clean(), "{:?}", result.violations());
    }

    #[test]
    fn default_episode_is_clean() {
        let result = Resource::from(episode()).validate();
        assert!(result.is_clean(), "{:?}", result.violations());
    }

    #[test]
    fn show_violations_are_aggregated() {
        let mut s = show();
        s.metadata.labels.remove(LABEL_LANGUAGE);
        s.metadata
            .labels
            .insert(LABEL_EXPLICIT.into(), "maybe".into());
        s.metadata.labels.insert(LABEL_TYPE.into(), "daily".into());
        s.description.title.clear();

        let result = Resource::from(s).validate();
        assert_eq!(result.kind, ResourceKind::Show);
        assert_eq!(
            fields(&result),
            vec![
                "metadata.labels.language",
                "metadata.labels.explicit",
                "metadata.labels.type",
                "description.title",
            ]
        );
    }

    #[test]
    fn show_rejects_bad_language() {
        let mut s = show();
        s.metadata
            .labels
            .insert(LABEL_LANGUAGE.into(), "english".into());
        let result = Resource::from(s).validate();
        assert_eq!(fields(&result), vec!["metadata.labels.language"]);
    }

    #[test]
    fn language_codes() {
        assert!(is_language_code("en"));
        assert!(is_language_code("de_DE"));
        assert!(is_language_code("pt-BR"));
        assert!(!is_language_code("EN"));
        assert!(!is_language_code("eng"));
        assert!(!is_language_code("en/US"));
    }

    #[test]
    fn enumerations_ignore_case() {
        let mut s = show();
        s.metadata.labels.insert(LABEL_TYPE.into(), "serial".into());
        s.metadata.labels.insert(LABEL_EXPLICIT.into(), "YES".into());
        assert!(Resource::from(s).validate().is_clean());
    }

    #[test]
    fn episode_requires_positive_season_and_episode() {
        let mut e = episode();
        e.metadata.labels.insert(LABEL_SEASON.into(), "0".into());
        e.metadata.labels.insert(LABEL_EPISODE.into(), "two".into());

        let result = Resource::from(e).validate();
        assert_eq!(
            fields(&result),
            vec!["metadata.labels.season", "metadata.labels.episode"]
        );
    }

    #[test]
    fn episode_requires_season_label() {
        let mut e = episode();
        e.metadata.labels.remove(LABEL_SEASON);
        let result = Resource::from(e).validate();
        assert_eq!(fields(&result), vec!["metadata.labels.season"]);
        assert_eq!(result.violations()[0].message, "is required");
    }

    #[test]
    fn episode_rejects_bad_date_and_enclosure() {
        let mut e = episode();
        e.metadata
            .labels
            .insert(LABEL_DATE.into(), "yesterday".into());
        e.enclosure.uri.clear();
        e.enclosure.content_type.clear();

        let result = Resource::from(e).validate();
        assert_eq!(
            fields(&result),
            vec!["metadata.labels.date", "enclosure.uri", "enclosure.type"]
        );
    }

    #[test]
    fn imported_enclosure_must_be_remote() {
        let mut e = episode();
        e.enclosure.rel = AssetRel::Import;
        e.enclosure.uri = "file:///tmp/a.mp3".into();
        let result = Resource::from(e).validate();
        assert_eq!(fields(&result), vec!["enclosure.uri"]);
    }

    #[test]
    fn asset_validation() {
        let asset = Asset {
            api_version: API_VERSION.into(),
            kind: ResourceKind::Asset,
            metadata: Metadata {
                name: "cover".into(),
                labels: [(LABEL_GUID.to_string(), "a1".to_string())].into(),
            },
            uri: "ftp://host/cover.png".into(),
            rel: AssetRel::Import,
            name: String::new(),
            content_type: String::new(),
            size: -1,
            duration: 0,
            checksum: String::new(),
        };
        let result = Resource::from(asset).validate();
        assert_eq!(fields(&result), vec!["uri", "size"]);
    }

    #[test]
    fn wrong_api_version_is_reported() {
        let mut s = show();
        s.api_version = "v2".into();
        let result = Resource::from(s).validate();
        assert_eq!(fields(&result), vec!["apiVersion"]);
    }

    #[test]
    fn into_result_carries_all_violations() {
        let mut e = episode();
        e.metadata.name.clear();
        e.description.summary.clear();
        let err = Resource::from(e).validate().into_result().unwrap_err();
        assert_eq!(err.violations.len(), 2);
        let message = err.to_string();
        assert!(message.contains("metadata.name: is required"));
        assert!(message.contains("description.summary: is required"));
    }
}
