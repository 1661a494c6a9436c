use crate::error::{Error, Result};
use crate::tags::{TagBag, TagReader};
use std::fmt;
use std::path::{Path, PathBuf};

/// Tag attributes a collection keeps a secondary index for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Attribute {
    Title,
    Artist,
    Album,
    Date,
    Genre,
    Bpm,
}

impl Attribute {
    /// All attributes, in display/export order
    pub const ALL: [Attribute; 6] = [
        Attribute::Title,
        Attribute::Artist,
        Attribute::Album,
        Attribute::Date,
        Attribute::Genre,
        Attribute::Bpm,
    ];

    /// Position of this attribute in [`Attribute::ALL`]
    pub fn index(self) -> usize {
        match self {
            Attribute::Title => 0,
            Attribute::Artist => 1,
            Attribute::Album => 2,
            Attribute::Date => 3,
            Attribute::Genre => 4,
            Attribute::Bpm => 5,
        }
    }

    /// Lowercase name, as used in error messages and CLI output
    pub fn name(self) -> &'static str {
        match self {
            Attribute::Title => "title",
            Attribute::Artist => "artist",
            Attribute::Album => "album",
            Attribute::Date => "date",
            Attribute::Genre => "genre",
            Attribute::Bpm => "bpm",
        }
    }

    /// ID3v2.4 text frame holding this attribute
    pub fn frame_id(self) -> &'static str {
        match self {
            Attribute::Title => "TIT2",
            Attribute::Artist => "TPE1",
            Attribute::Album => "TALB",
            Attribute::Date => "TDRC",
            Attribute::Genre => "TCON",
            Attribute::Bpm => "TBPM",
        }
    }

    /// Key used for this attribute in an Apple Music track dict
    pub fn apple_music_key(self) -> &'static str {
        match self {
            Attribute::Title => "Name",
            Attribute::Artist => "Artist",
            Attribute::Album => "Album",
            Attribute::Date => "Year",
            Attribute::Genre => "Genre",
            Attribute::Bpm => "BPM",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Display metadata of a single audio file
///
/// Built once from the file's tags and never modified afterwards. Tag
/// writes go through [`crate::tags::toggle_genre`] and require re-reading
/// the file to observe the new values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRecord {
    path: PathBuf,
    values: [String; 6],
    full_name: String,
}

impl TrackRecord {
    /// Read the file's tags through `reader` and build its record
    pub fn read<R: TagReader + ?Sized>(path: impl Into<PathBuf>, reader: &R) -> Result<Self> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Err(Error::TagRead {
                path,
                reason: "empty path".to_string(),
            });
        }

        let tags = reader.read(&path)?;
        log::debug!("Read tags for {:?}", path);
        Ok(Self::from_tags(path, &tags))
    }

    /// Build a record from already-read tag values
    ///
    /// Multi-valued tags are joined with `,`; absent tags become empty strings.
    pub fn from_tags(path: impl Into<PathBuf>, tags: &TagBag) -> Self {
        let values = Attribute::ALL.map(|attribute| tags.get(attribute).join(","));
        let full_name = format!(
            "{} - {}",
            values[Attribute::Artist.index()],
            values[Attribute::Title.index()]
        );

        Self {
            path: path.into(),
            values,
            full_name,
        }
    }

    /// File path, the track's identity key
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Value of one display attribute
    pub fn get(&self, attribute: Attribute) -> &str {
        &self.values[attribute.index()]
    }

    /// Track title
    pub fn title(&self) -> &str {
        self.get(Attribute::Title)
    }

    /// Artist name
    pub fn artist(&self) -> &str {
        self.get(Attribute::Artist)
    }

    /// Album name
    pub fn album(&self) -> &str {
        self.get(Attribute::Album)
    }

    /// Recording date/year as tagged
    pub fn date(&self) -> &str {
        self.get(Attribute::Date)
    }

    /// Genre, `" / "`-separated labels as tagged
    pub fn genre(&self) -> &str {
        self.get(Attribute::Genre)
    }

    /// BPM as tagged
    pub fn bpm(&self) -> &str {
        self.get(Attribute::Bpm)
    }

    /// `"{artist} - {title}"`
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Attribute/value pairs in [`Attribute::ALL`] order
    pub fn attributes(&self) -> impl Iterator<Item = (Attribute, &str)> + '_ {
        Attribute::ALL.iter().map(move |&a| (a, self.get(a)))
    }
}

impl fmt::Display for TrackRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name)
    }
}
