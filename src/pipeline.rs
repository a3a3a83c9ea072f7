//! End-to-end run: subscriptions → search → filter → feed → files.

use futures::stream::{self, StreamExt};
use secrecy::{ExposeSecret, SecretString};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::config::{ConfigError, Settings, API_KEY_ENV};
use crate::episode::{filter_episodes, Episode, MatchPolicy};
use crate::feed::{self, FileWriteError};
use crate::subscriptions::{self, ChannelSubscription};
use crate::youtube::{SearchClient, SearchError, SearchOptions};

/// Fatal errors that end a run without (complete) output.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("API key not found! Set the {0} environment variable to a YouTube Data API key")]
    MissingCredential(&'static str),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to create search client: {0}")]
    Client(#[source] SearchError),

    /// Only raised when `fail_fast` is set; otherwise channel errors are reported
    /// in [`RunReport::channels`].
    #[error("Channel {channel_id} failed: {source}")]
    Channel {
        channel_id: String,
        #[source]
        source: SearchError,
    },

    #[error(transparent)]
    FileWrite(#[from] FileWriteError),

    #[error("Failed to write episode listing: {0}")]
    Listing(#[from] std::io::Error),
}

/// Inputs of a run, usually derived from [`Settings`].
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub channels_path: PathBuf,
    pub rss_path: PathBuf,
    pub atom_path: PathBuf,
    pub search: SearchOptions,
    pub max_results: u32,
    /// Channels fetched at the same time; results are still consumed in order.
    pub concurrency: usize,
    pub match_policy: MatchPolicy,
    pub fail_fast: bool,
}

impl From<&Settings> for RunOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            channels_path: settings.channels.clone(),
            rss_path: settings.rss_path.clone(),
            atom_path: settings.atom_path.clone(),
            search: SearchOptions {
                base_url: settings.api_base_url.clone(),
                timeout: Duration::from_secs(settings.request_timeout_secs),
                send_authorization_header: settings.send_authorization_header,
            },
            max_results: settings.max_results,
            concurrency: settings.concurrency,
            match_policy: MatchPolicy {
                allow_duplicate_matches: settings.allow_duplicate_matches,
            },
            fail_fast: settings.fail_fast,
        }
    }
}

impl Default for RunOptions {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

/// What happened to one configured channel.
#[derive(Debug)]
pub struct ChannelOutcome {
    pub channel_id: String,
    /// Episodes contributed, or the error that made the channel fail.
    pub result: Result<usize, SearchError>,
}

/// Summary of a completed run.
#[derive(Debug)]
pub struct RunReport {
    /// Every episode in feed order.
    pub episodes: Vec<Episode>,
    /// One outcome per configured channel, in configuration order.
    pub channels: Vec<ChannelOutcome>,
    pub rss_path: PathBuf,
    pub atom_path: PathBuf,
}

impl RunReport {
    pub fn failed_channels(&self) -> impl Iterator<Item = &ChannelOutcome> {
        self.channels.iter().filter(|c| c.result.is_err())
    }
}

/// Runs the whole pipeline once.
///
/// The credential is checked before anything else, so a missing key never
/// causes network traffic. Each episode is listed on `out` as
/// `<channel title> | <title>` before the feed files are written.
///
/// # Errors
///
/// - [`RunError::MissingCredential`] if `api_key` is absent or empty
/// - [`RunError::Config`] if the subscription list cannot be loaded
/// - [`RunError::Channel`] on the first channel failure when `fail_fast` is set
/// - [`RunError::FileWrite`] if either feed file cannot be written
pub async fn run<W: Write>(
    options: &RunOptions,
    api_key: Option<SecretString>,
    out: &mut W,
) -> Result<RunReport, RunError> {
    let api_key = api_key
        .filter(|key| !key.expose_secret().trim().is_empty())
        .ok_or(RunError::MissingCredential(API_KEY_ENV))?;

    let subscriptions = subscriptions::load(&options.channels_path)?;
    let client = SearchClient::new(api_key, options.search.clone()).map_err(RunError::Client)?;

    let (episodes, channels) = collect_episodes(&client, &subscriptions, options).await?;

    let feed = feed::build(&episodes);

    for episode in &episodes {
        writeln!(out, "{} | {}", episode.channel_title, episode.title)?;
    }

    feed::write_rss(&feed, &options.rss_path)?;
    feed::write_atom(&feed, &options.atom_path)?;

    let report = RunReport {
        episodes,
        channels,
        rss_path: options.rss_path.clone(),
        atom_path: options.atom_path.clone(),
    };

    tracing::info!(
        episodes = report.episodes.len(),
        channels = report.channels.len(),
        failed = report.failed_channels().count(),
        rss = %report.rss_path.display(),
        atom = %report.atom_path.display(),
        "Feeds written"
    );

    Ok(report)
}

/// Fetches and filters every channel, in configuration order.
///
/// Up to `concurrency` searches are in flight, but results are consumed in
/// input order so the episode list never depends on timing.
async fn collect_episodes(
    client: &SearchClient,
    subscriptions: &[ChannelSubscription],
    options: &RunOptions,
) -> Result<(Vec<Episode>, Vec<ChannelOutcome>), RunError> {
    let limit = options.max_results;
    let policy = options.match_policy;

    let mut fetches = std::pin::pin!(stream::iter(subscriptions)
        .map(|sub| async move { (sub, client.search(&sub.channel_id, limit).await) })
        .buffered(options.concurrency.max(1)));

    let mut episodes = Vec::new();
    let mut outcomes = Vec::with_capacity(subscriptions.len());

    while let Some((sub, result)) = fetches.next().await {
        match result {
            Ok(records) => {
                let matched = filter_episodes(&records, &sub.keywords, policy);
                tracing::info!(
                    channel_id = %sub.channel_id,
                    videos = records.len(),
                    episodes = matched.len(),
                    "Channel searched"
                );
                outcomes.push(ChannelOutcome {
                    channel_id: sub.channel_id.clone(),
                    result: Ok(matched.len()),
                });
                episodes.extend(matched);
            }
            Err(e) if options.fail_fast => {
                tracing::error!(channel_id = %sub.channel_id, error = %e, "Channel search failed, aborting");
                return Err(RunError::Channel {
                    channel_id: sub.channel_id.clone(),
                    source: e,
                });
            }
            Err(e) => {
                tracing::warn!(channel_id = %sub.channel_id, error = %e, "Channel search failed, skipping");
                outcomes.push(ChannelOutcome {
                    channel_id: sub.channel_id.clone(),
                    result: Err(e),
                });
            }
        }
    }

    Ok((episodes, outcomes))
}
