use serde::Deserialize;

/// Body of a `search.list` response. Only the fields podcrafter reads.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    pub items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchItem {
    pub id: ResourceId,
    pub snippet: Snippet,
}

/// Search hits can be videos, channels or playlists; only videos carry `videoId`.
#[derive(Debug, Deserialize)]
pub(crate) struct ResourceId {
    #[serde(rename = "videoId", default)]
    pub video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Snippet {
    #[serde(rename = "publishedAt")]
    pub published_at: String,
    #[serde(rename = "channelId")]
    pub channel_id: String,
    pub title: String,
    pub description: String,
    pub thumbnails: Thumbnails,
    #[serde(rename = "channelTitle")]
    pub channel_title: String,
    #[serde(rename = "publishTime")]
    pub publish_time: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Thumbnails {
    pub high: Thumbnail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Thumbnail {
    pub url: String,
}

/// Error envelope returned by Google APIs on non-2xx responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorDetail {
    pub message: String,
}

/// One video returned by the search endpoint, decoded and flattened.
///
/// Fields are passed through exactly as the API returns them. `published_at`
/// and `publish_time` are separate API fields and are kept separate here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoRecord {
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub channel_id: String,
    pub channel_title: String,
    pub thumbnail_url: String,
    pub published_at: String,
    pub publish_time: String,
}

impl SearchItem {
    /// Converts a search hit into a [`VideoRecord`], or `None` for non-video hits.
    pub(crate) fn into_video(self) -> Option<VideoRecord> {
        let video_id = self.id.video_id?;
        let snippet = self.snippet;
        Some(VideoRecord {
            video_id,
            title: snippet.title,
            description: snippet.description,
            channel_id: snippet.channel_id,
            channel_title: snippet.channel_title,
            thumbnail_url: snippet.thumbnails.high.url,
            published_at: snippet.published_at,
            publish_time: snippet.publish_time,
        })
    }
}
