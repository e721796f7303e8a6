//! RSS 2.0 rendering with the iTunes podcast namespace.

use std::fmt::Write;

use common::resource::{
    Episode, LABEL_BLOCK, LABEL_COMPLETE, LABEL_DATE, LABEL_EPISODE, LABEL_EXPLICIT,
    LABEL_GUID, LABEL_LANGUAGE, LABEL_SEASON, LABEL_TYPE, Metadata, Show,
};

const GENERATOR: &str = "podops";

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

fn element(out: &mut String, indent: &str, tag: &str, value: &str) {
    if !value.is_empty() {
        let _ = writeln!(out, "{indent}<{tag}>{}</{tag}>", escape(value));
    }
}

fn flag(metadata: &Metadata, key: &str) -> &'static str {
    match metadata.label(key).map(str::to_ascii_lowercase).as_deref() {
        Some("yes" | "true") => "true",
        _ => "false",
    }
}

fn label<'a>(metadata: &'a Metadata, key: &str) -> &'a str {
    metadata.label(key).unwrap_or_default()
}

/// Render the feed of a production. Episodes are emitted in the given order.
/// `build_date` is the Unix time of this build; 0 omits `lastBuildDate`.
pub fn render(show: &Show, episodes: &[Episode], link: &str, build_date: i64) -> String {
    let mut out = String::new();
    let d = &show.description;
    let m = &show.metadata;

    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str(
        "<rss version=\"2.0\" xmlns:itunes=\"http://www.itunes.com/dtds/podcast-1.0.dtd\" \
         xmlns:content=\"http://purl.org/rss/1.0/modules/content/\">\n",
    );
    out.push_str("  <channel>\n");
    element(&mut out, "    ", "title", &d.title);
    element(&mut out, "    ", "link", link);
    element(&mut out, "    ", "description", &d.summary);
    element(&mut out, "    ", "language", label(m, LABEL_LANGUAGE));
    element(&mut out, "    ", "copyright", &d.copyright);
    element(&mut out, "    ", "generator", GENERATOR);
    if build_date > 0
        && let Some(date) = chrono::DateTime::from_timestamp(build_date, 0)
    {
        element(&mut out, "    ", "lastBuildDate", &date.to_rfc2822());
    }
    element(&mut out, "    ", "itunes:author", &d.author);
    element(&mut out, "    ", "itunes:summary", &d.summary);
    element(&mut out, "    ", "itunes:type", &label(m, LABEL_TYPE).to_lowercase());
    element(&mut out, "    ", "itunes:explicit", flag(m, LABEL_EXPLICIT));
    if flag(m, LABEL_BLOCK) == "true" {
        element(&mut out, "    ", "itunes:block", "Yes");
    }
    if flag(m, LABEL_COMPLETE) == "true" {
        element(&mut out, "    ", "itunes:complete", "Yes");
    }
    out.push_str("    <itunes:owner>\n");
    element(&mut out, "      ", "itunes:name", &d.owner.name);
    element(&mut out, "      ", "itunes:email", &d.owner.email);
    out.push_str("    </itunes:owner>\n");
    if !show.image.uri.is_empty() {
        let _ = writeln!(out, "    <itunes:image href=\"{}\"/>", escape(&show.image.uri));
    }
    if !d.category.name.is_empty() {
        let _ = writeln!(out, "    <itunes:category text=\"{}\">", escape(&d.category.name));
        for sub in &d.category.subcategory {
            let _ = writeln!(out, "      <itunes:category text=\"{}\"/>", escape(sub));
        }
        out.push_str("    </itunes:category>\n");
    }

    for episode in episodes {
        render_item(&mut out, episode);
    }

    out.push_str("  </channel>\n");
    out.push_str("</rss>\n");
    out
}

fn render_item(out: &mut String, episode: &Episode) {
    let d = &episode.description;
    let m = &episode.metadata;

    out.push_str("    <item>\n");
    element(out, "      ", "title", &d.title);
    element(out, "      ", "description", &d.summary);
    if !d.episode_text.is_empty() {
        let _ = writeln!(
            out,
            "      <content:encoded><![CDATA[{}]]></content:encoded>",
            d.episode_text.replace("]]>", "]]]]><![CDATA[>")
        );
    }
    element(out, "      ", "link", &d.link.uri);
    let _ = writeln!(
        out,
        "      <guid isPermaLink=\"false\">{}</guid>",
        escape(label(m, LABEL_GUID))
    );
    element(out, "      ", "pubDate", label(m, LABEL_DATE));
    let _ = writeln!(
        out,
        "      <enclosure url=\"{}\" length=\"{}\" type=\"{}\"/>",
        escape(&episode.enclosure.uri),
        episode.enclosure.size,
        escape(&episode.enclosure.content_type)
    );
    element(out, "      ", "itunes:title", &d.title);
    element(out, "      ", "itunes:season", label(m, LABEL_SEASON));
    element(out, "      ", "itunes:episode", label(m, LABEL_EPISODE));
    element(out, "      ", "itunes:episodeType", &label(m, LABEL_TYPE).to_lowercase());
    element(out, "      ", "itunes:explicit", flag(m, LABEL_EXPLICIT));
    element(out, "      ", "itunes:duration", &d.duration.to_string());
    if flag(m, LABEL_BLOCK) == "true" {
        element(out, "      ", "itunes:block", "Yes");
    }
    if !episode.image.uri.is_empty() {
        let _ = writeln!(out, "      <itunes:image href=\"{}\"/>", escape(&episode.image.uri));
    }
    out.push_str("    </item>\n");
}
