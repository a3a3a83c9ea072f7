//! YouTube Data API search client.
//!
//! - [`client`] - one authenticated `search.list` call per channel
//! - [`types`] - typed response schema and the flattened [`VideoRecord`]

mod client;
mod types;

pub use client::{SearchClient, SearchError, SearchOptions, DEFAULT_LIMIT, MAX_LIMIT};
pub use types::VideoRecord;
