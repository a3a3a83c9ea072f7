//! Keyword filtering of channel uploads into episodes.

use std::collections::HashSet;

use crate::youtube::VideoRecord;

/// A video that matched a channel's keyword filter, destined to become one
/// feed entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Episode {
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub channel_id: String,
    pub channel_title: String,
    pub thumbnail: String,
    pub published_at: String,
    pub publish_time: String,
}

impl From<&VideoRecord> for Episode {
    fn from(record: &VideoRecord) -> Self {
        Self {
            video_id: record.video_id.clone(),
            title: record.title.clone(),
            description: record.description.clone(),
            channel_id: record.channel_id.clone(),
            channel_title: record.channel_title.clone(),
            thumbnail: record.thumbnail_url.clone(),
            published_at: record.published_at.clone(),
            publish_time: record.publish_time.clone(),
        }
    }
}

/// How a title that matches several keywords is turned into episodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchPolicy {
    /// `true`: one episode per matching keyword (a title matching two keywords
    /// appears twice). `false`: at most one episode per video id per channel.
    pub allow_duplicate_matches: bool,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            allow_duplicate_matches: true,
        }
    }
}

/// Selects the records whose title contains a keyword, using the default policy.
pub fn filter(records: &[VideoRecord], keywords: &[String]) -> Vec<Episode> {
    filter_episodes(records, keywords, MatchPolicy::default())
}

/// Selects the records whose title contains at least one keyword.
///
/// Matching is a case-sensitive substring test with no trimming or case
/// folding. Records are visited in order and, for each record, keywords in
/// order; every hit appends an [`Episode`]. An empty keyword list yields
/// nothing.
pub fn filter_episodes(
    records: &[VideoRecord],
    keywords: &[String],
    policy: MatchPolicy,
) -> Vec<Episode> {
    let mut episodes = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for record in records {
        for keyword in keywords {
            if !record.title.contains(keyword.as_str()) {
                continue;
            }
            if policy.allow_duplicate_matches {
                episodes.push(Episode::from(record));
                continue;
            }
            if seen.insert(record.video_id.as_str()) {
                episodes.push(Episode::from(record));
            }
            break;
        }
    }

    episodes
}
