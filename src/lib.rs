//! Tagedit - ID3 track library and Apple Music exporter
//!
//! This library loads audio files and M3U playlists into an indexed
//! in-memory collection and exports it as an Apple Music library plist.

pub mod error;
pub mod export;
pub mod model;
pub mod presets;
pub mod source;
pub mod tags;

pub use error::{Error, Result};
pub use export::ExportConfig;
pub use model::{Attribute, CollectionSource, LoadPolicy, TrackCollection, TrackRecord};
pub use tags::{Id3TagReader, TagBag, TagReader};
