//! Apple Music (iTunes library plist) writer
//!
//! Layout of the generated document:
//!
//! ```text
//! <plist version="1.0">
//!   <dict>
//!     <key>Tracks</key>
//!     <dict>
//!       <key>0</key>
//!       <dict><key>Location</key><string>file:///…</string>…</dict>
//!       …
//!     </dict>
//!     <key>Playlists</key>          (only with ExportConfig::with_playlists)
//!     <array>…</array>
//!   </dict>
//! </plist>
//! ```

use super::config::ExportConfig;
use crate::error::{Error, Result};
use crate::model::{Attribute, TrackCollection, TrackRecord};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::fs;
use std::path::Path;

const PLIST_DOCTYPE: &str =
    r#"plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd""#;

/// URI scheme prepended to track paths in `Location`
pub const LOCATION_SCHEME: &str = "file://";

/// Render `collection` and write it to `config.destination`
pub fn export_apple_music(collection: &TrackCollection, config: &ExportConfig) -> Result<()> {
    log::info!(
        "Exporting {} tracks from {:?} to {:?}",
        collection.len(),
        collection.name(),
        config.destination
    );

    let document = render_apple_music(collection, config)?;
    fs::write(&config.destination, document).map_err(|source| Error::ExportIo {
        path: config.destination.clone(),
        source,
    })?;

    log::info!("Export written to {:?}", config.destination);
    Ok(())
}

/// Render `collection` as an Apple Music plist document
///
/// Output depends only on the collection's contents and order, so
/// rendering an unchanged collection twice gives identical bytes.
pub fn render_apple_music(collection: &TrackCollection, config: &ExportConfig) -> Result<Vec<u8>> {
    let writer = match config.indent {
        Some(spaces) => Writer::new_with_indent(Vec::new(), b' ', spaces),
        None => Writer::new(Vec::new()),
    };
    let mut plist = PlistWriter { writer };

    plist.emit(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    plist.emit(Event::DocType(BytesText::from_escaped(PLIST_DOCTYPE)))?;
    plist.emit(Event::Start(
        BytesStart::new("plist").with_attributes([("version", "1.0")]),
    ))?;
    plist.start("dict")?;

    plist.key("Tracks")?;
    plist.start("dict")?;
    for (id, track) in collection.iter().enumerate() {
        plist.key(&id.to_string())?;
        plist.start("dict")?;
        for (key, value) in track_fields(track, id) {
            if value.is_empty() {
                continue;
            }
            plist.key(key)?;
            plist.value(&value)?;
        }
        plist.end("dict")?;
    }
    plist.end("dict")?;

    if config.include_playlists {
        write_playlists(&mut plist, collection)?;
    }

    plist.end("dict")?;
    plist.end("plist")?;

    let mut document = plist.writer.into_inner();
    document.push(b'\n');
    log::debug!("Rendered {} bytes of plist XML", document.len());
    Ok(document)
}

impl TrackCollection {
    /// Write this collection as an Apple Music plist to `destination`
    pub fn export_to_apple_music(&self, destination: impl AsRef<Path>) -> Result<()> {
        export_apple_music(self, &ExportConfig::new(destination.as_ref()))
    }
}

/// Key/value pairs of one track dict, before empty values are dropped
fn track_fields(track: &TrackRecord, id: usize) -> Vec<(&'static str, String)> {
    let mut fields = Vec::with_capacity(Attribute::ALL.len() + 2);
    fields.push(("Location", location(track.path())));
    for (attribute, value) in track.attributes() {
        fields.push((attribute.apple_music_key(), value.to_string()));
    }
    fields.push(("Track ID", id.to_string()));
    fields
}

/// `file://` URI of a track
///
/// UTF-8 paths are written verbatim. A path that is not valid UTF-8 has
/// each segment percent-encoded from its raw bytes, so distinct files never
/// collapse onto the same `U+FFFD`-substituted location.
fn location(path: &Path) -> String {
    match path.to_str() {
        Some(path) => format!("{}{}", LOCATION_SCHEME, path),
        None => format!("{}{}", LOCATION_SCHEME, encode_raw_path(path)),
    }
}

#[cfg(unix)]
fn encode_raw_path(path: &Path) -> String {
    use std::os::unix::ffi::OsStrExt;

    path.as_os_str()
        .as_bytes()
        .split(|&b| b == b'/')
        .map(|segment| urlencoding::encode_binary(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(not(unix))]
fn encode_raw_path(path: &Path) -> String {
    // Only unpaired UTF-16 surrogates end up here
    path.to_string_lossy().into_owned()
}

fn write_playlists(plist: &mut PlistWriter, collection: &TrackCollection) -> Result<()> {
    plist.key("Playlists")?;
    plist.start("array")?;
    for playlist in collection.playlists() {
        plist.start("dict")?;
        plist.key("Name")?;
        plist.value_as("string", playlist.name())?;
        plist.key("Playlist Items")?;
        plist.start("array")?;
        for track in playlist {
            match collection.get_track_by_path(track.path()) {
                Ok((id, _)) => {
                    plist.start("dict")?;
                    plist.key("Track ID")?;
                    plist.value_as("integer", &id.to_string())?;
                    plist.end("dict")?;
                }
                Err(e) => log::warn!("Playlist {:?}: {}", playlist.name(), e),
            }
        }
        plist.end("array")?;
        plist.end("dict")?;
    }
    plist.end("array")
}

/// `<integer>` for values made only of ASCII digits, `<string>` otherwise
fn value_element(value: &str) -> &'static str {
    if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
        "integer"
    } else {
        "string"
    }
}

struct PlistWriter {
    writer: Writer<Vec<u8>>,
}

impl PlistWriter {
    fn emit(&mut self, event: Event<'_>) -> Result<()> {
        self.writer
            .write_event(event)
            .map_err(|e| Error::Xml(e.to_string()))
    }

    fn start(&mut self, name: &str) -> Result<()> {
        self.emit(Event::Start(BytesStart::new(name)))
    }

    fn end(&mut self, name: &str) -> Result<()> {
        self.emit(Event::End(BytesEnd::new(name)))
    }

    fn key(&mut self, key: &str) -> Result<()> {
        self.value_as("key", key)
    }

    fn value(&mut self, value: &str) -> Result<()> {
        self.value_as(value_element(value), value)
    }

    fn value_as(&mut self, element: &str, text: &str) -> Result<()> {
        self.start(element)?;
        self.emit(Event::Text(BytesText::new(text)))?;
        self.end(element)
    }
}
