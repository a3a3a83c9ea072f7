//! podcrafter turns keyword-filtered YouTube channel uploads into RSS and Atom
//! podcast feeds.
//!
//! A run loads the channel subscription list, searches each channel's most
//! recent uploads, keeps the videos whose title contains one of the channel's
//! keywords, and writes one feed in both dialects.

pub mod config;
pub mod episode;
pub mod feed;
pub mod pipeline;
pub mod subscriptions;
pub mod youtube;
