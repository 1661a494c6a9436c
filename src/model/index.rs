//! Primary and secondary indexes of a track collection
//!
//! The two index kinds are separate types: the primary index maps a path to
//! exactly one record, a secondary index maps an attribute value to the
//! bucket of records sharing it.

use super::track::{Attribute, TrackRecord};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Path → record
#[derive(Debug, Clone, Default)]
pub(crate) struct PrimaryIndex {
    by_path: HashMap<PathBuf, Arc<TrackRecord>>,
}

impl PrimaryIndex {
    pub fn contains(&self, path: &Path) -> bool {
        self.by_path.contains_key(path)
    }

    pub fn get(&self, path: &Path) -> Option<&Arc<TrackRecord>> {
        self.by_path.get(path)
    }

    /// Returns false if the path was already indexed
    pub fn insert(&mut self, track: Arc<TrackRecord>) -> bool {
        if self.by_path.contains_key(track.path()) {
            return false;
        }
        self.by_path.insert(track.path().to_path_buf(), track);
        true
    }

    pub fn remove(&mut self, path: &Path) -> Option<Arc<TrackRecord>> {
        self.by_path.remove(path)
    }
}

/// Attribute value → records sharing that value, in insertion order
#[derive(Debug, Clone)]
pub(crate) struct AttributeIndex {
    attribute: Attribute,
    buckets: HashMap<String, Vec<Arc<TrackRecord>>>,
}

impl AttributeIndex {
    pub fn new(attribute: Attribute) -> Self {
        Self {
            attribute,
            buckets: HashMap::new(),
        }
    }

    pub fn get(&self, value: &str) -> Option<&[Arc<TrackRecord>]> {
        self.buckets.get(value).map(Vec::as_slice)
    }

    /// Append `track` to its bucket
    ///
    /// Callers insert a path at most once; the primary index rejects
    /// duplicates before a track reaches the secondary indexes.
    pub fn insert(&mut self, track: &Arc<TrackRecord>) {
        self.buckets
            .entry(track.get(self.attribute).to_string())
            .or_default()
            .push(Arc::clone(track));
    }

    /// Removes `track` from its bucket, dropping the bucket once empty
    pub fn remove(&mut self, track: &TrackRecord) {
        let value = track.get(self.attribute);
        if let Some(bucket) = self.buckets.get_mut(value) {
            bucket.retain(|t| t.path() != track.path());
            if bucket.is_empty() {
                self.buckets.remove(value);
            }
        }
    }

    #[cfg(test)]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }
}

/// One [`AttributeIndex`] per [`Attribute`]
#[derive(Debug, Clone)]
pub(crate) struct SecondaryIndexes {
    indexes: [AttributeIndex; 6],
}

impl SecondaryIndexes {
    pub fn new() -> Self {
        Self {
            indexes: Attribute::ALL.map(AttributeIndex::new),
        }
    }

    pub fn get(&self, attribute: Attribute) -> &AttributeIndex {
        &self.indexes[attribute.index()]
    }

    pub fn insert(&mut self, track: &Arc<TrackRecord>) {
        for index in &mut self.indexes {
            index.insert(track);
        }
    }

    pub fn remove(&mut self, track: &TrackRecord) {
        for index in &mut self.indexes {
            index.remove(track);
        }
    }
}

impl Default for SecondaryIndexes {
    fn default() -> Self {
        Self::new()
    }
}
