//! Settings file parser for `podcrafter.toml`.
//!
//! The settings file is optional: a missing file yields `Settings::default()`.
//! Unknown keys are accepted by serde but logged as warnings, since they are
//! usually typos.
use secrecy::SecretString;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable holding the YouTube Data API key.
pub const API_KEY_ENV: &str = "YOUTUBE_API_KEY";

/// Default YouTube Data API v3 base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Maximum size accepted for settings and subscription files (1 MiB).
pub(crate) const MAX_FILE_SIZE: u64 = 1_048_576;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML in settings file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid channel list in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("File too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Settings
// ============================================================================

/// Run parameters for a podcrafter invocation.
///
/// Every field has a default, so any subset of keys can be given. Command-line
/// flags are applied on top of the loaded values.
///
/// `Debug` is implemented by hand to mask `youtube_api_key`.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Path to the JSON channel subscription list.
    pub channels: PathBuf,

    /// Destination of the RSS 2.0 document.
    pub rss_path: PathBuf,

    /// Destination of the Atom 1.0 document.
    pub atom_path: PathBuf,

    /// Base URL of the search API. HTTPS is required except for loopback hosts.
    pub api_base_url: String,

    /// Results requested per channel (the API accepts 1..=50).
    pub max_results: u32,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Number of channels fetched at the same time. 1 = strictly sequential.
    pub concurrency: usize,

    /// Emit one episode per matching keyword (true) or at most one per video.
    pub allow_duplicate_matches: bool,

    /// Abort the whole run on the first channel that fails to fetch.
    pub fail_fast: bool,

    /// Also send the API key as a raw `Authorization` header.
    pub send_authorization_header: bool,

    /// API key (alternative to the YOUTUBE_API_KEY env var).
    /// The env var takes precedence.
    pub youtube_api_key: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            channels: PathBuf::from("config.json"),
            rss_path: PathBuf::from("rss.xml"),
            atom_path: PathBuf::from("atom.xml"),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            max_results: 25,
            request_timeout_secs: 30,
            concurrency: 1,
            allow_duplicate_matches: true,
            fail_fast: false,
            send_authorization_header: false,
            youtube_api_key: None,
        }
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("channels", &self.channels)
            .field("rss_path", &self.rss_path)
            .field("atom_path", &self.atom_path)
            .field("api_base_url", &self.api_base_url)
            .field("max_results", &self.max_results)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("concurrency", &self.concurrency)
            .field("allow_duplicate_matches", &self.allow_duplicate_matches)
            .field("fail_fast", &self.fail_fast)
            .field("send_authorization_header", &self.send_authorization_header)
            .field(
                "youtube_api_key",
                &self.youtube_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

const KNOWN_KEYS: [&str; 11] = [
    "channels",
    "rss_path",
    "atom_path",
    "api_base_url",
    "max_results",
    "request_timeout_secs",
    "concurrency",
    "allow_duplicate_matches",
    "fail_fast",
    "send_authorization_header",
    "youtube_api_key",
];

impl Settings {
    /// Load settings from a TOML file.
    ///
    /// - Missing file → `Ok(Settings::default())`
    /// - Empty file → `Ok(Settings::default())`
    /// - Invalid TOML → `Err(ConfigError::Toml)` with line number info
    /// - Unknown keys → accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match read_bounded(path) {
            Ok(c) => c,
            Err(ConfigError::Io { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                tracing::debug!(path = %path.display(), "No settings file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Settings file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in settings file, ignoring");
                }
            }
        }

        let settings: Settings = toml::from_str(&content)?;
        tracing::info!(
            path = %path.display(),
            channels = %settings.channels.display(),
            "Loaded settings"
        );
        Ok(settings)
    }

    /// Resolve the API key, preferring the environment value over the file.
    ///
    /// Empty strings count as absent.
    pub fn resolve_api_key(&self, env_value: Option<String>) -> Option<SecretString> {
        env_value
            .filter(|v| !v.trim().is_empty())
            .or_else(|| {
                self.youtube_api_key
                    .clone()
                    .filter(|v| !v.trim().is_empty())
            })
            .map(SecretString::from)
    }
}

/// Read a UTF-8 file after checking it is below [`MAX_FILE_SIZE`].
pub(crate) fn read_bounded(path: &Path) -> Result<String, ConfigError> {
    let io_err = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };

    let meta = std::fs::metadata(path).map_err(io_err)?;
    if meta.len() > MAX_FILE_SIZE {
        return Err(ConfigError::TooLarge(format!(
            "{} is {} bytes (max {} bytes)",
            path.display(),
            meta.len(),
            MAX_FILE_SIZE
        )));
    }

    std::fs::read_to_string(path).map_err(io_err)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn write_settings(name: &str, content: &str) -> (PathBuf, PathBuf) {
        let dir = std::env::temp_dir().join(format!("podcrafter_settings_{name}"));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("podcrafter.toml");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.channels, PathBuf::from("config.json"));
        assert_eq!(settings.rss_path, PathBuf::from("rss.xml"));
        assert_eq!(settings.atom_path, PathBuf::from("atom.xml"));
        assert_eq!(settings.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(settings.max_results, 25);
        assert_eq!(settings.concurrency, 1);
        assert!(settings.allow_duplicate_matches);
        assert!(!settings.fail_fast);
        assert!(!settings.send_authorization_header);
        assert!(settings.youtube_api_key.is_none());
    }

    #[test]
    fn test_missing_file_returns_default() {
        let path = Path::new("/tmp/podcrafter_test_nonexistent_settings.toml");
        let settings = Settings::load(path).unwrap();
        assert_eq!(settings.max_results, 25);
    }

    #[test]
    fn test_whitespace_only_file_returns_default() {
        let (dir, path) = write_settings("whitespace", "   \n  \n  ");
        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.rss_path, PathBuf::from("rss.xml"));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_partial_settings_use_defaults_for_missing() {
        let (dir, path) = write_settings("partial", "max_results = 10\nfail_fast = true\n");

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.max_results, 10);
        assert!(settings.fail_fast);
        assert_eq!(settings.request_timeout_secs, 30); // default
        assert!(settings.allow_duplicate_matches); // default

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_full_settings() {
        let content = r#"
channels = "channels.json"
rss_path = "out/feed.rss"
atom_path = "out/feed.atom"
api_base_url = "http://127.0.0.1:9000/youtube/v3"
max_results = 50
request_timeout_secs = 5
concurrency = 4
allow_duplicate_matches = false
fail_fast = true
send_authorization_header = true
youtube_api_key = "file-key"
"#;
        let (dir, path) = write_settings("full", content);

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.channels, PathBuf::from("channels.json"));
        assert_eq!(settings.rss_path, PathBuf::from("out/feed.rss"));
        assert_eq!(settings.atom_path, PathBuf::from("out/feed.atom"));
        assert_eq!(settings.api_base_url, "http://127.0.0.1:9000/youtube/v3");
        assert_eq!(settings.max_results, 50);
        assert_eq!(settings.request_timeout_secs, 5);
        assert_eq!(settings.concurrency, 4);
        assert!(!settings.allow_duplicate_matches);
        assert!(settings.fail_fast);
        assert!(settings.send_authorization_header);
        assert_eq!(settings.youtube_api_key.as_deref(), Some("file-key"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let (dir, path) = write_settings("invalid", "this is not [valid toml");

        let err = Settings::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
        assert!(err.to_string().contains("Invalid TOML"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_wrong_type_returns_error() {
        let (dir, path) = write_settings("wrongtype", "max_results = \"lots\"\n");
        assert!(Settings::load(&path).is_err());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unknown_keys_accepted() {
        let (dir, path) = write_settings("unknown", "max_results = 5\nmystery = 42\n");
        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.max_results, 5);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_too_large_file_rejected() {
        let (dir, path) = write_settings("too_large", &"#".repeat(1_048_577));

        let err = Settings::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge(_)));
        assert!(err.to_string().contains("too large"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_debug_masks_api_key() {
        let settings = Settings {
            youtube_api_key: Some("super-secret-key-12345".to_string()),
            ..Settings::default()
        };

        let debug_output = format!("{:?}", settings);
        assert!(!debug_output.contains("super-secret-key-12345"));
        assert!(debug_output.contains("[REDACTED]"));
    }

    #[test]
    fn test_env_key_takes_precedence() {
        let settings = Settings {
            youtube_api_key: Some("file-key".to_string()),
            ..Settings::default()
        };

        let key = settings.resolve_api_key(Some("env-key".to_string())).unwrap();
        assert_eq!(key.expose_secret(), "env-key");

        let key = settings.resolve_api_key(None).unwrap();
        assert_eq!(key.expose_secret(), "file-key");
    }

    #[test]
    fn test_empty_keys_count_as_missing() {
        let settings = Settings {
            youtube_api_key: Some("  ".to_string()),
            ..Settings::default()
        };
        assert!(settings.resolve_api_key(Some(String::new())).is_none());
        assert!(Settings::default().resolve_api_key(None).is_none());
    }
}
