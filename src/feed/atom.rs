//! Atom 1.0 rendering.

use chrono::{DateTime, SecondsFormat, Utc};

use super::model::Feed;
use super::xml::{RenderError, XmlDoc};

const ATOM_NAMESPACE: &str = "http://www.w3.org/2005/Atom";

/// Renders the feed as a pretty-printed Atom 1.0 document.
///
/// Entries carry the video id as `<id>`, the channel title as author name, the
/// description as `<summary>`, an alternate link to the watch page and the
/// enclosure link. `<updated>` is mandatory in Atom, so entries whose publish
/// timestamp does not parse fall back to the feed build time and omit
/// `<published>`.
pub fn render_atom(feed: &Feed) -> Result<String, RenderError> {
    let meta = feed.metadata();
    let mut doc = XmlDoc::new()?;

    doc.start(
        "feed",
        &[("xmlns", ATOM_NAMESPACE), ("xml:lang", meta.language.as_str())],
    )?;

    doc.text_element("id", &meta.id)?;
    doc.text_element("title", &meta.title)?;
    doc.text_element("updated", &rfc3339(feed.updated()))?;

    doc.start("author", &[])?;
    doc.text_element("name", &meta.author_name)?;
    doc.text_element("uri", &meta.author_contact)?;
    doc.end("author")?;

    doc.empty("link", &[("href", meta.link.as_str()), ("rel", "alternate")])?;

    doc.text_element_with(
        "generator",
        &[("uri", meta.link.as_str()), ("version", env!("CARGO_PKG_VERSION"))],
        &meta.generator,
    )?;
    doc.text_element("logo", &meta.logo)?;
    doc.text_element("subtitle", &meta.subtitle)?;

    for entry in feed.entries() {
        let published = entry.published_time();

        doc.start("entry", &[])?;
        doc.text_element("id", &entry.id)?;
        doc.text_element("title", &entry.title)?;
        doc.text_element("updated", &rfc3339(published.unwrap_or(feed.updated())))?;

        doc.start("author", &[])?;
        doc.text_element("name", &entry.author)?;
        doc.end("author")?;

        doc.text_element("summary", &entry.description)?;

        doc.empty("link", &[("href", entry.link.as_str()), ("rel", "alternate")])?;

        let length = entry.enclosure.length.to_string();
        doc.empty(
            "link",
            &[
                ("href", entry.enclosure.url.as_str()),
                ("rel", "enclosure"),
                ("type", entry.enclosure.mime_type.as_str()),
                ("length", length.as_str()),
            ],
        )?;

        if let Some(published) = published {
            doc.text_element("published", &rfc3339(published))?;
        }
        doc.end("entry")?;
    }

    doc.end("feed")?;
    doc.finish()
}

fn rfc3339(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}
