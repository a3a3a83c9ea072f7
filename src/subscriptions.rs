//! Channel subscription list (`config.json`).
//!
//! The file is a JSON array of `{"channel_id": "...", "keywords": [...]}`
//! objects. Entries are returned in document order without any filtering.

use serde::Deserialize;
use std::path::Path;

use crate::config::{read_bounded, ConfigError};

/// One subscribed channel and the keywords that select its videos.
///
/// A video matches when its title contains any keyword as a case-sensitive
/// substring. An empty keyword list matches nothing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChannelSubscription {
    pub channel_id: String,
    pub keywords: Vec<String>,
}

/// Loads the subscription list from a JSON file.
///
/// # Errors
///
/// - [`ConfigError::Io`] if the file cannot be read
/// - [`ConfigError::TooLarge`] if the file exceeds 1 MiB
/// - [`ConfigError::Json`] if the content is not an array of subscriptions
pub fn load(path: &Path) -> Result<Vec<ChannelSubscription>, ConfigError> {
    let content = read_bounded(path)?;
    let subscriptions = parse(&content).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(
        path = %path.display(),
        channels = subscriptions.len(),
        "Loaded channel subscriptions"
    );
    Ok(subscriptions)
}

/// Parses a subscription list from an in-memory JSON document.
pub fn parse(content: &str) -> Result<Vec<ChannelSubscription>, serde_json::Error> {
    serde_json::from_str(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_preserves_document_order() {
        let json = r#"[
            {"channel_id": "UC2", "keywords": ["Live", "Q&A"]},
            {"channel_id": "UC1", "keywords": ["Podcast"]}
        ]"#;

        let subs = parse(json).unwrap();
        assert_eq!(
            subs,
            vec![
                ChannelSubscription {
                    channel_id: "UC2".into(),
                    keywords: vec!["Live".into(), "Q&A".into()],
                },
                ChannelSubscription {
                    channel_id: "UC1".into(),
                    keywords: vec!["Podcast".into()],
                },
            ]
        );
    }

    #[test]
    fn test_parse_keeps_empty_keywords_and_duplicates() {
        let json = r#"[
            {"channel_id": "UC1", "keywords": []},
            {"channel_id": "UC1", "keywords": ["", ""]}
        ]"#;

        let subs = parse(json).unwrap();
        assert_eq!(subs.len(), 2);
        assert!(subs[0].keywords.is_empty());
        assert_eq!(subs[1].keywords, vec!["".to_string(), "".to_string()]);
    }

    #[test]
    fn test_parse_empty_array() {
        assert!(parse("[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_wrong_shape() {
        assert!(parse(r#"{"channel_id": "UC1", "keywords": []}"#).is_err());
        assert!(parse(r#"[{"channel_id": "UC1"}]"#).is_err());
        assert!(parse(r#"[{"channel_id": "UC1", "keywords": "Live"}]"#).is_err());
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = load(Path::new("/tmp/podcrafter_test_missing_channels.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_invalid_json_names_path() {
        let dir = std::env::temp_dir().join("podcrafter_subs_invalid");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");
        std::fs::write(&path, "not json").unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Json { .. }));
        assert!(err.to_string().contains("config.json"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_from_file() {
        let dir = std::env::temp_dir().join("podcrafter_subs_valid");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");
        std::fs::write(&path, r#"[{"channel_id":"UC1","keywords":["Live"]}]"#).unwrap();

        let subs = load(&path).unwrap();
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].channel_id, "UC1");

        std::fs::remove_dir_all(&dir).ok();
    }
}
