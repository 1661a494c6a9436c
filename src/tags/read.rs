//! ID3v2 tag reading

use super::{TagBag, TagReader};
use crate::error::{Error, Result};
use crate::model::Attribute;
use id3::frame::Content;
use id3::{Tag, TagLike};
use std::path::Path;

/// Reads ID3v2 tags from MP3 files and from the `id3 ` chunk of WAV files
#[derive(Debug, Clone, Copy, Default)]
pub struct Id3TagReader;

impl Id3TagReader {
    /// Create an ID3 reader
    pub fn new() -> Self {
        Self
    }
}

impl TagReader for Id3TagReader {
    fn read(&self, path: &Path) -> Result<TagBag> {
        let tag = read_tag(path).map_err(|e| Error::TagRead {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut tags = TagBag::new();
        for attribute in Attribute::ALL {
            tags.set(attribute, text_values(&tag, attribute));
        }
        Ok(tags)
    }
}

/// Read the ID3v2 tag of an MP3 file or of a WAV file's `id3 ` chunk
pub(super) fn read_tag(path: &Path) -> std::result::Result<Tag, id3::Error> {
    Tag::read_from_path(path)
}

/// All values of the frame backing `attribute`
///
/// ID3v2.4 separates multiple values of one text frame with NUL. Files
/// written as v2.3 carry the year in `TYER` instead of `TDRC`.
pub(super) fn text_values(tag: &Tag, attribute: Attribute) -> Vec<String> {
    let text = text_frame(tag, attribute.frame_id()).or_else(|| match attribute {
        Attribute::Date => text_frame(tag, "TYER"),
        _ => None,
    });

    text.map(|text| {
        text.split('\0')
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_owned)
            .collect()
    })
    .unwrap_or_default()
}

fn text_frame<'a>(tag: &'a Tag, id: &str) -> Option<&'a str> {
    match tag.get(id)?.content() {
        Content::Text(s) => Some(s.as_str()),
        _ => None,
    }
}
