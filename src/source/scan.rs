//! Directory scanning

use crate::error::{Error, Result};
use crate::model::Attribute;
use crate::tags::TagReader;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File extensions picked up by [`scan_directory`]
pub const AUDIO_EXTENSIONS: [&str; 2] = ["mp3", "wav"];

/// Recursively collect audio files below `dir`, sorted by path
///
/// Fails with [`Error::Scan`] when `dir` itself cannot be read. Unreadable
/// entries below it are logged and skipped.
pub fn scan_directory(dir: &Path) -> Result<Vec<PathBuf>> {
    let root = std::path::absolute(dir).unwrap_or_else(|_| dir.to_path_buf());

    let mut files = Vec::new();
    for entry in WalkDir::new(&root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(source) if source.depth() == 0 => {
                return Err(Error::Scan { path: root, source });
            }
            Err(e) => {
                log::warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        if entry.file_type().is_file() && is_audio_file(entry.path()) {
            files.push(entry.into_path());
        }
    }

    log::info!("Found {} audio files in {:?}", files.len(), root);
    Ok(files)
}

/// Whether `path` has one of [`AUDIO_EXTENSIONS`]
pub fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| AUDIO_EXTENSIONS.iter().any(|a| ext.eq_ignore_ascii_case(a)))
}

/// Files that still need a genre: empty genre tag or no readable tags
///
/// Tags are read in parallel; the result keeps the input order.
pub fn filter_untagged<R>(paths: &[PathBuf], reader: &R) -> Vec<PathBuf>
where
    R: TagReader + Sync + ?Sized,
{
    let untagged: Vec<bool> = paths
        .par_iter()
        .map(|path| match reader.read(path) {
            Ok(tags) => tags.get(Attribute::Genre).is_empty(),
            Err(e) => {
                log::debug!("Treating as untagged: {}", e);
                true
            }
        })
        .collect();

    paths
        .iter()
        .zip(untagged)
        .filter_map(|(path, keep)| keep.then(|| path.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::{MemoryTagReader, TagBag};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_scan_directory_filters_and_sorts() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        fs::create_dir_all(dir.path().join("b")).unwrap();
        fs::write(dir.path().join("b/two.MP3"), b"x").unwrap();
        fs::write(dir.path().join("a.wav"), b"x").unwrap();
        fs::write(dir.path().join("cover.jpg"), b"x").unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();

        let files = scan_directory(dir.path()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.strip_prefix(std::path::absolute(dir.path()).unwrap()).unwrap().display().to_string())
            .collect();

        assert_eq!(names, vec!["a.wav".to_string(), format!("b{}two.MP3", std::path::MAIN_SEPARATOR)]);
        assert!(files.iter().all(|p| p.is_absolute()));
    }

    #[test]
    fn test_scan_missing_root() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let missing = dir.path().join("not-there");

        let err = scan_directory(&missing).unwrap_err();
        match err {
            Error::Scan { path, .. } => assert_eq!(path, std::path::absolute(&missing).unwrap()),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_scan_empty_root_is_ok() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        assert!(scan_directory(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_filter_untagged() {
        let mut reader = MemoryTagReader::new();
        reader.insert("/tagged.mp3", TagBag::new().with(Attribute::Genre, ["House"]));
        reader.insert("/blank.mp3", TagBag::new().with(Attribute::Title, ["No Genre"]));
        let paths = vec![
            PathBuf::from("/tagged.mp3"),
            PathBuf::from("/blank.mp3"),
            PathBuf::from("/unreadable.mp3"),
        ];

        assert_eq!(
            filter_untagged(&paths, &reader),
            vec![PathBuf::from("/blank.mp3"), PathBuf::from("/unreadable.mp3")]
        );
    }
}
