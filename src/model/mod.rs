//! In-memory track library
//!
//! Track records and the multi-indexed collection that holds them. Nothing
//! in here touches the filesystem except through a [`crate::tags::TagReader`].

mod collection;
mod index;
mod track;

pub use collection::{CollectionSource, LoadPolicy, TrackCollection, DEFAULT_COLLECTION_NAME};
pub use track::{Attribute, TrackRecord};
