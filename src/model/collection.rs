use super::index::{PrimaryIndex, SecondaryIndexes};
use super::track::{Attribute, TrackRecord};
use crate::error::{Error, Result};
use crate::tags::TagReader;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Index;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Name given to collections created without one
pub const DEFAULT_COLLECTION_NAME: &str = "collection";

/// What a collection is built from
#[derive(Debug, Clone)]
pub enum CollectionSource {
    /// Files whose tags still need to be read
    Paths(Vec<PathBuf>),
    /// Records that were already read
    Records(Vec<TrackRecord>),
}

/// How [`TrackCollection::load`] reacts to a file whose tags cannot be read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPolicy {
    /// Fail the whole load on the first unreadable file
    #[default]
    AbortOnError,
    /// Log a warning and leave the file out
    SkipUnreadable,
}

/// Ordered set of tracks with lookup indexes
///
/// Insertion order is display order. Every track in the sequence is also
/// reachable through the path index and through one bucket per
/// [`Attribute`]; the indexes are only touched through the methods below.
#[derive(Debug, Clone)]
pub struct TrackCollection {
    name: String,
    tracks: Vec<Arc<TrackRecord>>,
    primary: PrimaryIndex,
    secondary: SecondaryIndexes,
    playlists: BTreeMap<String, TrackCollection>,
}

impl TrackCollection {
    /// Create an empty collection
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tracks: Vec::new(),
            primary: PrimaryIndex::default(),
            secondary: SecondaryIndexes::new(),
            playlists: BTreeMap::new(),
        }
    }

    /// Build a collection from already-read records
    pub fn from_records(name: impl Into<String>, records: impl IntoIterator<Item = TrackRecord>) -> Self {
        let mut collection = Self::new(name);
        for record in records {
            collection.add_track(record);
        }
        collection
    }

    /// Build a collection from `source`, reading tags through `reader`
    ///
    /// Tag reads run in parallel; tracks are inserted in source order and
    /// duplicate paths keep their first occurrence.
    pub fn load<R>(
        name: impl Into<String>,
        source: CollectionSource,
        reader: &R,
        policy: LoadPolicy,
    ) -> Result<Self>
    where
        R: TagReader + Sync + ?Sized,
    {
        let paths = match source {
            CollectionSource::Records(records) => return Ok(Self::from_records(name, records)),
            CollectionSource::Paths(paths) => paths,
        };

        let mut collection = Self::new(name);
        let total = paths.len();
        let results: Vec<Result<TrackRecord>> = paths
            .into_par_iter()
            .map(|path| TrackRecord::read(path, reader))
            .collect();

        let mut skipped = 0;
        for result in results {
            match result {
                Ok(track) => {
                    collection.add_track(track);
                }
                Err(e) if policy == LoadPolicy::SkipUnreadable => {
                    log::warn!("Skipping unreadable file: {}", e);
                    skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        log::info!(
            "Loaded collection {:?}: {} tracks from {} files ({} skipped)",
            collection.name,
            collection.len(),
            total,
            skipped
        );
        Ok(collection)
    }

    /// Collection name (playlists are registered under it)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether the collection holds no tracks
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Tracks in display order
    pub fn tracks(&self) -> &[Arc<TrackRecord>] {
        &self.tracks
    }

    /// Iterate over tracks in display order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<TrackRecord>> {
        self.tracks.iter()
    }

    /// Track at `position` in display order
    pub fn get(&self, position: usize) -> Option<&Arc<TrackRecord>> {
        self.tracks.get(position)
    }

    /// Whether a track with this path is indexed
    pub fn contains_path(&self, path: impl AsRef<Path>) -> bool {
        self.primary.contains(path.as_ref())
    }

    /// Append a track unless its path is already present
    ///
    /// Returns whether the track was inserted. Adding a known path is a
    /// silent no-op and keeps the existing record.
    pub fn add_track(&mut self, track: impl Into<Arc<TrackRecord>>) -> bool {
        let track = track.into();
        if !self.primary.insert(Arc::clone(&track)) {
            log::debug!("Already in {:?}: {:?}", self.name, track.path());
            return false;
        }
        self.secondary.insert(&track);
        self.tracks.push(track);
        true
    }

    /// Remove the track stored under `track`'s path
    ///
    /// The track is also removed from every registered playlist. Returns
    /// the removed record, or `None` when the path is not part of this
    /// collection.
    pub fn remove_track(&mut self, track: &TrackRecord) -> Option<Arc<TrackRecord>> {
        if !self.primary.contains(track.path()) {
            return None;
        }
        let position = self.tracks.iter().position(|t| t.path() == track.path())?;

        let removed = self.tracks.remove(position);
        self.secondary.remove(&removed);
        self.primary.remove(removed.path());
        for playlist in self.playlists.values_mut() {
            playlist.remove_track(&removed);
        }
        log::debug!("Removed from {:?}: {:?}", self.name, removed.path());
        Some(removed)
    }

    /// Add every track of `other` that this collection does not hold yet
    ///
    /// On a path collision the receiver's record wins.
    pub fn merge(&mut self, other: &TrackCollection) -> &mut Self {
        for track in &other.tracks {
            if !self.primary.contains(track.path()) {
                self.add_track(Arc::clone(track));
            }
        }
        self
    }

    /// Register `playlist` under its name and merge its tracks into `self`
    ///
    /// A playlist with the same name is replaced.
    pub fn add_playlist(&mut self, playlist: TrackCollection) -> &mut Self {
        self.merge(&playlist);
        if self.playlists.contains_key(&playlist.name) {
            log::debug!("Replacing playlist {:?}", playlist.name);
        }
        self.playlists.insert(playlist.name.clone(), playlist);
        self
    }

    /// Register an empty playlist, keeping an existing one with that name
    pub fn create_playlist(&mut self, name: impl Into<String>) -> &TrackCollection {
        let name = name.into();
        self.playlists
            .entry(name.clone())
            .or_insert_with(|| TrackCollection::new(name))
    }

    /// Add `track` to the named playlist and to this collection
    pub fn add_track_to_playlist(
        &mut self,
        playlist: &str,
        track: impl Into<Arc<TrackRecord>>,
    ) -> Result<bool> {
        let track = track.into();
        let target = self
            .playlists
            .get_mut(playlist)
            .ok_or_else(|| Error::not_found("playlist", playlist))?;
        let inserted = target.add_track(Arc::clone(&track));
        self.add_track(track);
        Ok(inserted)
    }

    /// Remove `track` from the named playlist, keeping it in this collection
    pub fn remove_track_from_playlist(
        &mut self,
        playlist: &str,
        track: &TrackRecord,
    ) -> Result<Option<Arc<TrackRecord>>> {
        let target = self
            .playlists
            .get_mut(playlist)
            .ok_or_else(|| Error::not_found("playlist", playlist))?;
        Ok(target.remove_track(track))
    }

    /// Playlist registered under `name`
    pub fn playlist(&self, name: &str) -> Option<&TrackCollection> {
        self.playlists.get(name)
    }

    /// Registered playlists, ordered by name
    pub fn playlists(&self) -> impl Iterator<Item = &TrackCollection> {
        self.playlists.values()
    }

    /// Track at `path` and its position in the sequence
    pub fn get_track_by_path(&self, path: impl AsRef<Path>) -> Result<(usize, &Arc<TrackRecord>)> {
        let path = path.as_ref();
        let not_found = || Error::not_found("path", path.display().to_string());

        let track = self.primary.get(path).ok_or_else(not_found)?;
        let position = self
            .tracks
            .iter()
            .position(|t| Arc::ptr_eq(t, track))
            .ok_or_else(not_found)?;
        Ok((position, track))
    }

    /// Tracks whose `attribute` equals `value`, in insertion order
    pub fn get_tracks_by(&self, attribute: Attribute, value: &str) -> Result<&[Arc<TrackRecord>]> {
        self.secondary
            .get(attribute)
            .get(value)
            .ok_or_else(|| Error::not_found(attribute.name(), value))
    }

    pub fn get_tracks_by_title(&self, title: &str) -> Result<&[Arc<TrackRecord>]> {
        self.get_tracks_by(Attribute::Title, title)
    }

    pub fn get_tracks_by_artist(&self, artist: &str) -> Result<&[Arc<TrackRecord>]> {
        self.get_tracks_by(Attribute::Artist, artist)
    }

    pub fn get_tracks_by_album(&self, album: &str) -> Result<&[Arc<TrackRecord>]> {
        self.get_tracks_by(Attribute::Album, album)
    }

    pub fn get_tracks_by_date(&self, date: &str) -> Result<&[Arc<TrackRecord>]> {
        self.get_tracks_by(Attribute::Date, date)
    }

    pub fn get_tracks_by_genre(&self, genre: &str) -> Result<&[Arc<TrackRecord>]> {
        self.get_tracks_by(Attribute::Genre, genre)
    }

    pub fn get_tracks_by_bpm(&self, bpm: &str) -> Result<&[Arc<TrackRecord>]> {
        self.get_tracks_by(Attribute::Bpm, bpm)
    }
}

impl Default for TrackCollection {
    fn default() -> Self {
        Self::new(DEFAULT_COLLECTION_NAME)
    }
}

impl Index<usize> for TrackCollection {
    type Output = TrackRecord;

    fn index(&self, position: usize) -> &TrackRecord {
        &self.tracks[position]
    }
}

impl<'a> IntoIterator for &'a TrackCollection {
    type Item = &'a Arc<TrackRecord>;
    type IntoIter = std::slice::Iter<'a, Arc<TrackRecord>>;

    fn into_iter(self) -> Self::IntoIter {
        self.tracks.iter()
    }
}

impl fmt::Display for TrackCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, track) in self.tracks.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            f.write_str(track.full_name())?;
        }
        Ok(())
    }
}
