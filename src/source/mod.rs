//! Track sources
//!
//! Turns playlist files and music directories into path lists and loads
//! them into collections.

mod playlist;
mod scan;

pub use playlist::{parse_playlist, playlist_name};
pub use scan::{filter_untagged, is_audio_file, scan_directory, AUDIO_EXTENSIONS};

use crate::error::Result;
use crate::model::{CollectionSource, LoadPolicy, TrackCollection};
use crate::tags::TagReader;
use std::path::Path;

/// Load an M3U playlist into a collection named after the file
pub fn load_playlist<R>(path: &Path, reader: &R, policy: LoadPolicy) -> Result<TrackCollection>
where
    R: TagReader + Sync + ?Sized,
{
    log::info!("Loading playlist from {:?}", path);
    let paths = parse_playlist(path)?;
    TrackCollection::load(playlist_name(path), CollectionSource::Paths(paths), reader, policy)
}

/// Load every audio file below `dir` into a collection named after it
pub fn load_directory<R>(dir: &Path, reader: &R, policy: LoadPolicy) -> Result<TrackCollection>
where
    R: TagReader + Sync + ?Sized,
{
    log::info!("Scanning directory {:?}", dir);
    let paths = scan_directory(dir)?;
    TrackCollection::load(dir.display().to_string(), CollectionSource::Paths(paths), reader, policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::tags::MemoryTagReader;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_directory_fails() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let result = load_directory(
            &dir.path().join("typo"),
            &MemoryTagReader::new(),
            LoadPolicy::SkipUnreadable,
        );
        assert!(matches!(result, Err(Error::Scan { .. })));
    }
}
