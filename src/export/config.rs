//! Export configuration

use std::path::PathBuf;

/// Configuration for an Apple Music export
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// File the XML document is written to
    pub destination: PathBuf,

    /// Indent nested elements by this many spaces (None = single line)
    pub indent: Option<usize>,

    /// Also emit a `Playlists` array for the collection's playlists
    pub include_playlists: bool,
}

impl ExportConfig {
    /// Create a new export configuration
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
            indent: None,
            include_playlists: false,
        }
    }

    /// Pretty-print the document
    pub fn with_indent(mut self, spaces: usize) -> Self {
        self.indent = Some(spaces);
        self
    }

    /// Include registered playlists in the document
    pub fn with_playlists(mut self, include: bool) -> Self {
        self.include_playlists = include;
        self
    }
}
