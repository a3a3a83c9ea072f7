//! Atomic writing of rendered feeds to disk.

use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::atom::render_atom;
use super::model::Feed;
use super::rss::render_rss;
use super::xml::RenderError;

/// Failure to persist a rendered feed.
#[derive(Debug, Error)]
pub enum FileWriteError {
    #[error("Failed to render {path}: {source}")]
    Render {
        path: PathBuf,
        #[source]
        source: RenderError,
    },
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Renders the feed as RSS and writes it to `path`, replacing any existing file.
pub fn write_rss(feed: &Feed, path: &Path) -> Result<(), FileWriteError> {
    let content = render_rss(feed).map_err(|source| FileWriteError::Render {
        path: path.to_path_buf(),
        source,
    })?;
    write_atomically(path, &content)
}

/// Renders the feed as Atom and writes it to `path`, replacing any existing file.
pub fn write_atom(feed: &Feed, path: &Path) -> Result<(), FileWriteError> {
    let content = render_atom(feed).map_err(|source| FileWriteError::Render {
        path: path.to_path_buf(),
        source,
    })?;
    write_atomically(path, &content)
}

/// Writes `content` to a temporary sibling of `path`, syncs it, then renames it
/// over `path`. Readers never observe a half-written feed.
fn write_atomically(path: &Path, content: &str) -> Result<(), FileWriteError> {
    use std::time::{SystemTime, UNIX_EPOCH};

    let io_err = |source| FileWriteError::Io {
        path: path.to_path_buf(),
        source,
    };

    // Unpredictable temp name; create_new refuses to follow an existing file
    let random_suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let temp_path = path.with_extension(format!("tmp.{:016x}", random_suffix));

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&temp_path)
        .map_err(io_err)?;

    let written = file
        .write_all(content.as_bytes())
        .and_then(|_| file.sync_all());
    drop(file);
    if let Err(e) = written {
        let _ = std::fs::remove_file(&temp_path);
        return Err(io_err(e));
    }

    // On Windows, rename fails if destination exists
    #[cfg(windows)]
    if path.exists() {
        if let Err(e) = std::fs::remove_file(path) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(io_err(e));
        }
    }

    if let Err(e) = std::fs::rename(&temp_path, path) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(io_err(e));
    }

    tracing::debug!(path = %path.display(), bytes = content.len(), "Wrote feed file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::build;

    #[test]
    fn test_write_overwrites_existing_file() {
        let dir = std::env::temp_dir().join("podcrafter_writer_overwrite");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("rss.xml");
        std::fs::write(&path, "stale content").unwrap();

        write_rss(&build(&[]), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<rss version=\"2.0\""));
        assert!(!content.contains("stale content"));

        // No temp files left behind
        let leftovers: Vec<_> = std::fs::read_dir(&dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().contains(".tmp."))
            .collect();
        assert!(leftovers.is_empty());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_write_atom_creates_file() {
        let dir = std::env::temp_dir().join("podcrafter_writer_atom");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("atom.xml");

        write_atom(&build(&[]), &path).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("<feed "));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_directory_is_write_error() {
        let path = Path::new("/tmp/podcrafter_no_such_dir/nested/rss.xml");
        let err = write_rss(&build(&[]), path).unwrap_err();

        assert!(matches!(err, FileWriteError::Io { .. }));
        assert!(err.to_string().contains("rss.xml"));
    }
}
