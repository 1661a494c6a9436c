//! Genre tagging

use super::read::{read_tag, text_values};
use crate::error::{Error, Result};
use crate::model::Attribute;
use id3::{Tag, TagLike, Version};
use std::path::Path;

/// Separator between genre labels inside a single genre tag
pub const GENRE_SEPARATOR: &str = " / ";

/// Add `genre` to the file's genre tag, or remove it if already present
///
/// Labels live in the first genre value, joined by [`GENRE_SEPARATOR`].
/// Returns the genre string now stored in the file (empty when the last
/// label was removed, in which case the frame is dropped).
pub fn toggle_genre(path: &Path, genre: &str) -> Result<String> {
    let write_error = |reason: String| Error::TagWrite {
        path: path.to_path_buf(),
        reason,
    };

    let mut tag = match read_tag(path) {
        Ok(tag) => tag,
        Err(e) if matches!(e.kind, id3::ErrorKind::NoTag) => Tag::new(),
        Err(e) => return Err(write_error(e.to_string())),
    };

    let current = text_values(&tag, Attribute::Genre)
        .into_iter()
        .next()
        .unwrap_or_default();
    let updated = toggled(&current, genre.trim());

    let frame_id = Attribute::Genre.frame_id();
    if updated.is_empty() {
        let _ = tag.remove(frame_id);
    } else {
        tag.set_text(frame_id, updated.clone());
    }

    tag.write_to_path(path, Version::Id3v24)
        .map_err(|e| write_error(e.to_string()))?;

    log::info!("Genre of {:?}: {:?} -> {:?}", path, current, updated);
    Ok(updated)
}

fn toggled(current: &str, genre: &str) -> String {
    let mut labels: Vec<&str> = current
        .split(GENRE_SEPARATOR)
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .collect();

    if let Some(position) = labels.iter().position(|label| *label == genre) {
        labels.remove(position);
    } else if !genre.is_empty() {
        labels.push(genre);
    }
    labels.join(GENRE_SEPARATOR)
}
