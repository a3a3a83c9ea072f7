use chrono::{DateTime, Utc};

use crate::episode::Episode;

/// Canonical watch page; the video id is appended.
pub const WATCH_URL_BASE: &str = "https://www.youtube.com/watch?v=";

/// Media type declared on every enclosure.
pub const ENCLOSURE_MIME_TYPE: &str = "video/mpeg";

const PROJECT_URL: &str = "https://github.com/JosephSamela/podcrafter";

/// Identity of the generated feed. Constant across runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedMetadata {
    pub id: String,
    pub title: String,
    pub author_name: String,
    /// Contact for the feed author (a URL, rendered as the Atom author `uri`).
    pub author_contact: String,
    pub link: String,
    pub logo: String,
    pub subtitle: String,
    pub language: String,
    pub generator: String,
}

impl Default for FeedMetadata {
    fn default() -> Self {
        Self {
            id: PROJECT_URL.to_string(),
            title: "podcrafter".to_string(),
            author_name: "podcrafter".to_string(),
            author_contact: PROJECT_URL.to_string(),
            link: PROJECT_URL.to_string(),
            logo: format!("{PROJECT_URL}/blob/main/thumbnail.jpg"),
            subtitle: "Custom podcast feed of your favorite youtube shows!".to_string(),
            language: "en".to_string(),
            generator: "podcrafter".to_string(),
        }
    }
}

/// Playable media attached to an entry.
///
/// `length` is always 0: the media size is never fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enclosure {
    pub url: String,
    pub length: u64,
    pub mime_type: String,
}

/// One rendered feed entry, owned by the [`Feed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    pub id: String,
    pub title: String,
    pub author: String,
    pub description: String,
    /// Publish timestamp exactly as the API reported it.
    pub published: String,
    pub link: String,
    pub enclosure: Enclosure,
}

impl FeedEntry {
    fn from_episode(episode: &Episode) -> Self {
        let watch_url = format!("{WATCH_URL_BASE}{}", episode.video_id);
        Self {
            id: episode.video_id.clone(),
            title: episode.title.clone(),
            author: episode.channel_title.clone(),
            description: episode.description.clone(),
            published: episode.published_at.clone(),
            link: watch_url.clone(),
            enclosure: Enclosure {
                url: watch_url,
                length: 0,
                mime_type: ENCLOSURE_MIME_TYPE.to_string(),
            },
        }
    }

    /// Parsed publish time, or `None` when the API value is not RFC 3339.
    pub fn published_time(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.published)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// The aggregate syndication document for one run.
///
/// Built once from the episode list and read-only afterwards; the same value is
/// rendered as RSS and as Atom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feed {
    metadata: FeedMetadata,
    updated: DateTime<Utc>,
    entries: Vec<FeedEntry>,
}

impl Feed {
    pub fn metadata(&self) -> &FeedMetadata {
        &self.metadata
    }

    /// Build time, used for `lastBuildDate` / `updated`.
    pub fn updated(&self) -> DateTime<Utc> {
        self.updated
    }

    /// Entries in episode order.
    pub fn entries(&self) -> &[FeedEntry] {
        &self.entries
    }
}

/// Builds the feed for a run, stamped with the current time.
pub fn build(episodes: &[Episode]) -> Feed {
    build_at(episodes, Utc::now())
}

/// Builds the feed with an explicit build time.
pub fn build_at(episodes: &[Episode], updated: DateTime<Utc>) -> Feed {
    Feed {
        metadata: FeedMetadata::default(),
        updated,
        entries: episodes.iter().map(FeedEntry::from_episode).collect(),
    }
}
