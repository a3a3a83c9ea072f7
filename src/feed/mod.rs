//! Feed construction and serialization.
//!
//! One [`Feed`] is built per run from the flat episode list and rendered twice:
//!
//! - [`render_rss`] - RSS 2.0
//! - [`render_atom`] - Atom 1.0
//!
//! [`write_rss`] and [`write_atom`] persist the renderings atomically.
//!
//! # Example
//!
//! ```ignore
//! let feed = feed::build(&episodes);
//! feed::write_rss(&feed, Path::new("rss.xml"))?;
//! feed::write_atom(&feed, Path::new("atom.xml"))?;
//! ```

mod atom;
mod model;
mod rss;
mod writer;
mod xml;

pub use atom::render_atom;
pub use model::{
    build, build_at, Enclosure, Feed, FeedEntry, FeedMetadata, ENCLOSURE_MIME_TYPE,
    WATCH_URL_BASE,
};
pub use rss::render_rss;
pub use writer::{write_atom, write_rss, FileWriteError};
pub use xml::RenderError;
