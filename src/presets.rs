//! Saved genre labels offered for quick tagging

use crate::error::{Error, Result};
use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Default location of the presets file, before `~` expansion
pub const DEFAULT_PRESETS_PATH: &str = "~/.config/tagedit/genres.txt";

/// Ordered set of genre labels, persisted one per line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenrePresets {
    genres: BTreeSet<String>,
}

impl GenrePresets {
    /// Create an empty preset set
    pub fn new() -> Self {
        Self::default()
    }

    /// Load presets from `path`; a missing file yields an empty set
    pub fn load(path: &Path) -> Result<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("No genre presets at {:?}", path);
                return Ok(Self::new());
            }
            Err(source) => {
                return Err(Error::Presets {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let mut presets = Self::new();
        for line in contents.lines() {
            presets.add(line);
        }
        log::debug!("Loaded {} genre presets from {:?}", presets.len(), path);
        Ok(presets)
    }

    /// Write presets to `path`, creating missing parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        let presets_error = |source| Error::Presets {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(presets_error)?;
        }

        let mut contents = self.genres.iter().cloned().collect::<Vec<_>>().join("\n");
        if !contents.is_empty() {
            contents.push('\n');
        }
        fs::write(path, contents).map_err(presets_error)
    }

    /// Returns false for blank labels and labels already present
    pub fn add(&mut self, genre: &str) -> bool {
        let genre = genre.trim();
        !genre.is_empty() && self.genres.insert(genre.to_string())
    }

    /// Returns false if the label was not present
    pub fn remove(&mut self, genre: &str) -> bool {
        self.genres.remove(genre.trim())
    }

    /// Whether `genre` is saved
    pub fn contains(&self, genre: &str) -> bool {
        self.genres.contains(genre.trim())
    }

    /// Saved labels in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.genres.iter().map(String::as_str)
    }

    /// Number of saved labels
    pub fn len(&self) -> usize {
        self.genres.len()
    }

    /// Whether no label is saved
    pub fn is_empty(&self) -> bool {
        self.genres.is_empty()
    }
}
