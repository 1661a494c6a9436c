//! M3U playlist parser

use crate::error::{Error, Result};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Parse an M3U playlist into absolute file paths
///
/// Lines starting with `#` (including `#EXTM3U`/`#EXTINF`) and blank lines
/// are skipped. `file://` entries are percent-decoded. Relative entries
/// are resolved against the playlist's own directory, and `.`/`..`
/// components are folded so every entry has a single canonical spelling.
pub fn parse_playlist(path: &Path) -> Result<Vec<PathBuf>> {
    let playlist_error = |source| Error::Playlist {
        path: path.to_path_buf(),
        source,
    };

    let contents = fs::read_to_string(path).map_err(playlist_error)?;
    let base = std::path::absolute(path)
        .map_err(playlist_error)?
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    let entries: Vec<PathBuf> = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| resolve_entry(line, &base))
        .collect();

    log::debug!("Parsed {} entries from playlist {:?}", entries.len(), path);
    Ok(entries)
}

fn resolve_entry(line: &str, base: &Path) -> PathBuf {
    let entry = match line.strip_prefix("file://") {
        Some(uri) => match urlencoding::decode(uri) {
            Ok(decoded) => PathBuf::from(decoded.into_owned()),
            Err(_) => PathBuf::from(uri),
        },
        None => PathBuf::from(line),
    };

    if entry.is_absolute() {
        normalize(&entry)
    } else {
        normalize(&base.join(entry))
    }
}

/// Fold `.` and `..` components without touching the filesystem
///
/// `..` at the root stays at the root. Symlinks are not resolved.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => normalized.push(component),
            },
            other => normalized.push(other),
        }
    }
    normalized
}

/// Playlist name derived from its file name (`"Warmup.m3u"` → `"Warmup"`)
pub fn playlist_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
