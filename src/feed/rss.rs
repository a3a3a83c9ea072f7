//! RSS 2.0 rendering.

use chrono::{DateTime, Utc};

use super::model::Feed;
use super::xml::{RenderError, XmlDoc};

const DC_NAMESPACE: &str = "http://purl.org/dc/elements/1.1/";
const RSS_DOCS: &str = "https://www.rssboard.org/rss-specification";

/// Renders the feed as a pretty-printed RSS 2.0 document.
///
/// Each entry becomes one `<item>` carrying a non-permalink `<guid>` (the video
/// id), the channel title as `dc:creator` and a `video/mpeg` enclosure.
/// `pubDate` is omitted when the publish timestamp is not RFC 3339.
pub fn render_rss(feed: &Feed) -> Result<String, RenderError> {
    let meta = feed.metadata();
    let mut doc = XmlDoc::new()?;

    doc.start("rss", &[("version", "2.0"), ("xmlns:dc", DC_NAMESPACE)])?;
    doc.start("channel", &[])?;

    doc.text_element("title", &meta.title)?;
    doc.text_element("link", &meta.link)?;
    doc.text_element("description", &meta.subtitle)?;
    doc.text_element("language", &meta.language)?;

    doc.start("image", &[])?;
    doc.text_element("url", &meta.logo)?;
    doc.text_element("title", &meta.title)?;
    doc.text_element("link", &meta.link)?;
    doc.end("image")?;

    doc.text_element("lastBuildDate", &rfc2822(feed.updated()))?;
    doc.text_element(
        "generator",
        &format!("{} {}", meta.generator, env!("CARGO_PKG_VERSION")),
    )?;
    doc.text_element("docs", RSS_DOCS)?;

    for entry in feed.entries() {
        doc.start("item", &[])?;
        doc.text_element("title", &entry.title)?;
        doc.text_element("link", &entry.link)?;
        doc.text_element("description", &entry.description)?;
        doc.text_element("dc:creator", &entry.author)?;

        doc.text_element_with("guid", &[("isPermaLink", "false")], &entry.id)?;

        let length = entry.enclosure.length.to_string();
        doc.empty(
            "enclosure",
            &[
                ("url", entry.enclosure.url.as_str()),
                ("length", length.as_str()),
                ("type", entry.enclosure.mime_type.as_str()),
            ],
        )?;

        if let Some(published) = entry.published_time() {
            doc.text_element("pubDate", &rfc2822(published))?;
        }
        doc.end("item")?;
    }

    doc.end("channel")?;
    doc.end("rss")?;
    doc.finish()
}

fn rfc2822(time: DateTime<Utc>) -> String {
    time.to_rfc2822()
}
