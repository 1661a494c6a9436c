//! Tag reading and writing
//!
//! [`TagReader`] is the seam between the track library and whatever knows
//! how to parse tag bytes. [`Id3TagReader`] reads ID3v2 tags from MP3 and
//! WAV files; [`MemoryTagReader`] serves fixed values for tests and callers
//! that already hold metadata.

mod read;
mod write;

pub use read::Id3TagReader;
pub use write::{toggle_genre, GENRE_SEPARATOR};

use crate::error::{Error, Result};
use crate::model::Attribute;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Raw tag values of one file, possibly several per attribute
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagBag {
    values: HashMap<Attribute, Vec<String>>,
}

impl TagBag {
    /// Create an empty tag bag
    pub fn new() -> Self {
        Self::default()
    }

    /// Values stored for `attribute`, empty when the tag is absent
    pub fn get(&self, attribute: Attribute) -> &[String] {
        self.values.get(&attribute).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Replace the values of `attribute`; an empty list removes it
    pub fn set<I, S>(&mut self, attribute: Attribute, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            self.values.remove(&attribute);
        } else {
            self.values.insert(attribute, values);
        }
    }

    /// Builder form of [`TagBag::set`]
    pub fn with<I, S>(mut self, attribute: Attribute, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set(attribute, values);
        self
    }

    /// Whether no attribute has a value
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Source of tag values for a file
pub trait TagReader {
    /// Read the display tags of the file at `path`
    ///
    /// Fails with [`Error::TagRead`] when the file cannot be parsed.
    fn read(&self, path: &Path) -> Result<TagBag>;
}

/// Tag reader answering from an in-memory table
#[derive(Debug, Clone, Default)]
pub struct MemoryTagReader {
    entries: HashMap<PathBuf, TagBag>,
}

impl MemoryTagReader {
    /// Create a reader with no registered files
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the tags returned for `path`
    pub fn insert(&mut self, path: impl Into<PathBuf>, tags: TagBag) {
        self.entries.insert(path.into(), tags);
    }
}

impl TagReader for MemoryTagReader {
    fn read(&self, path: &Path) -> Result<TagBag> {
        self.entries.get(path).cloned().ok_or_else(|| Error::TagRead {
            path: path.to_path_buf(),
            reason: "no tags registered".to_string(),
        })
    }
}
