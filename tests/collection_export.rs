use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs;
use std::path::{Path, PathBuf};
use tagedit::export::render_apple_music;
use tagedit::tags::MemoryTagReader;
use tagedit::{
    Attribute, CollectionSource, Error, ExportConfig, Id3TagReader, LoadPolicy, TagBag,
    TrackCollection, TrackRecord,
};
use tempfile::TempDir;

/// (key, value element, text) entries of one exported track dict
type TrackEntries = Vec<(String, String, String)>;

/// Create a reader for the three-track test library
fn create_test_reader() -> MemoryTagReader {
    let mut reader = MemoryTagReader::new();
    for (path, artist, title) in [
        ("/a.mp3", "X", "One"),
        ("/b.mp3", "Y", "Two"),
        ("/c.mp3", "X", "Three"),
    ] {
        let tags = TagBag::new()
            .with(Attribute::Artist, [artist])
            .with(Attribute::Title, [title])
            .with(Attribute::Bpm, ["128"]);
        reader.insert(path, tags);
    }
    reader
}

fn create_test_collection() -> TrackCollection {
    let source = CollectionSource::Paths(vec![
        PathBuf::from("/a.mp3"),
        PathBuf::from("/b.mp3"),
        PathBuf::from("/c.mp3"),
    ]);
    TrackCollection::load("library", source, &create_test_reader(), LoadPolicy::AbortOnError)
        .expect("Failed to load test collection")
}

/// Parse the track dicts under `Tracks` out of an exported document
fn parse_tracks(xml: &str) -> Vec<(String, TrackEntries)> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut tracks: Vec<(String, TrackEntries)> = Vec::new();
    let mut depth = 0;
    let mut current_element = String::new();
    let mut pending_key: Option<String> = None;

    loop {
        match reader.read_event().expect("Invalid XML") {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if name == "dict" {
                    depth += 1;
                    if depth == 3 {
                        tracks.push((pending_key.take().unwrap(), Vec::new()));
                    }
                }
                current_element = name;
            }
            Event::End(e) => {
                if e.name().as_ref() == b"dict" {
                    depth -= 1;
                }
                current_element.clear();
            }
            Event::Text(e) => {
                let text = e.unescape().unwrap().to_string();
                if current_element == "key" {
                    pending_key = Some(text);
                } else if depth == 3 {
                    let key = pending_key.take().unwrap();
                    let entries = &mut tracks.last_mut().unwrap().1;
                    entries.push((key, current_element.clone(), text));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    tracks
}

fn entry<'a>(entries: &'a TrackEntries, key: &str) -> Option<(&'a str, &'a str)> {
    entries
        .iter()
        .find(|(k, _, _)| k == key)
        .map(|(_, element, text)| (element.as_str(), text.as_str()))
}

#[test]
fn test_end_to_end_lookup_and_export() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let output = temp_dir.path().join("library.xml");
    let collection = create_test_collection();

    let by_x: Vec<&str> = collection
        .get_tracks_by_artist("X")
        .unwrap()
        .iter()
        .map(|t| t.title())
        .collect();
    assert_eq!(by_x, vec!["One", "Three"]);

    collection.export_to_apple_music(&output).unwrap();
    let xml = fs::read_to_string(&output).unwrap();
    assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    assert!(xml.contains(r#"<plist version="1.0">"#));

    let tracks = parse_tracks(&xml);
    let ids: Vec<&str> = tracks.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(ids, vec!["0", "1", "2"]);

    for ((id, entries), path) in tracks.iter().zip(["/a.mp3", "/b.mp3", "/c.mp3"]) {
        let location = format!("file://{}", path);
        assert_eq!(entry(entries, "Location"), Some(("string", location.as_str())));
        assert_eq!(entry(entries, "Track ID"), Some(("integer", id.as_str())));
        assert_eq!(entry(entries, "BPM"), Some(("integer", "128")));
        assert_eq!(entry(entries, "Genre"), None);
        assert_eq!(entry(entries, "Album"), None);
    }

    let keys: Vec<&str> = tracks[1].1.iter().map(|(k, _, _)| k.as_str()).collect();
    assert_eq!(keys, vec!["Location", "Name", "Artist", "BPM", "Track ID"]);
}

#[test]
fn test_export_is_deterministic() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let collection = create_test_collection();

    for config in [
        ExportConfig::new(temp_dir.path().join("first.xml")),
        ExportConfig::new(temp_dir.path().join("second.xml")).with_indent(2),
    ] {
        let rendered = render_apple_music(&collection, &config).unwrap();
        assert_eq!(rendered, render_apple_music(&collection, &config).unwrap());

        tagedit::export::export_apple_music(&collection, &config).unwrap();
        assert_eq!(fs::read(&config.destination).unwrap(), rendered);
    }

    let indented = fs::read_to_string(temp_dir.path().join("second.xml")).unwrap();
    assert_eq!(parse_tracks(&indented).len(), 3);
}

#[test]
fn test_export_order_follows_removals() {
    let mut collection = create_test_collection();
    let first = collection[0].clone();
    collection.remove_track(&first);

    let bytes = render_apple_music(&collection, &ExportConfig::new("unused.xml")).unwrap();
    let tracks = parse_tracks(&String::from_utf8(bytes).unwrap());

    assert_eq!(tracks.len(), 2);
    assert_eq!(entry(&tracks[0].1, "Location"), Some(("string", "file:///b.mp3")));
    assert_eq!(entry(&tracks[0].1, "Track ID"), Some(("integer", "0")));
}

#[test]
fn test_export_to_missing_directory_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let destination = temp_dir.path().join("missing").join("library.xml");

    let err = create_test_collection()
        .export_to_apple_music(&destination)
        .unwrap_err();
    assert!(matches!(err, Error::ExportIo { ref path, .. } if path == &destination));
}

#[test]
fn test_id3_reader_on_real_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let tagged = temp_dir.path().join("tagged.mp3");
    let untagged = temp_dir.path().join("untagged.mp3");
    fs::write(&tagged, b"dummy audio data 1").unwrap();
    fs::write(&untagged, b"dummy audio data 2").unwrap();

    let mut tag = id3::Tag::new();
    id3::TagLike::set_text(&mut tag, "TIT2", "One");
    id3::TagLike::set_text(&mut tag, "TPE1", "X");
    id3::TagLike::set_text(&mut tag, "TDRC", "2024");
    id3::TagLike::set_text(&mut tag, "TCON", "House\0Disco");
    id3::TagLike::set_text(&mut tag, "TBPM", "124");
    tag.write_to_path(&tagged, id3::Version::Id3v24).unwrap();

    let reader = Id3TagReader::new();
    let track = TrackRecord::read(&tagged, &reader).unwrap();
    assert_eq!(track.full_name(), "X - One");
    assert_eq!(track.date(), "2024");
    assert_eq!(track.genre(), "House,Disco");
    assert_eq!(track.bpm(), "124");
    assert_eq!(track.album(), "");

    let err = TrackRecord::read(&untagged, &reader).unwrap_err();
    assert!(matches!(err, Error::TagRead { .. }));

    let untagged_files = tagedit::source::filter_untagged(&[tagged.clone(), untagged.clone()], &reader);
    assert_eq!(untagged_files, vec![untagged]);
}

#[test]
fn test_playlist_file_into_library() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let playlist = temp_dir.path().join("Warmup.m3u");
    fs::write(&playlist, "#EXTM3U\n/a.mp3\n# comment\n/c.mp3\n/a.mp3\n").unwrap();

    let reader = create_test_reader();
    let warmup = tagedit::source::load_playlist(&playlist, &reader, LoadPolicy::AbortOnError).unwrap();
    assert_eq!(warmup.name(), "Warmup");
    assert_eq!(warmup.len(), 2);

    let mut library = TrackCollection::from_records(
        "library",
        vec![TrackRecord::read(Path::new("/b.mp3"), &reader).unwrap()],
    );
    library.add_playlist(warmup);

    let titles: Vec<&str> = library.iter().map(|t| t.title()).collect();
    assert_eq!(titles, vec!["Two", "One", "Three"]);
    assert_eq!(library.playlist("Warmup").unwrap().len(), 2);
    assert_eq!(library.get_track_by_path("/c.mp3").unwrap().0, 2);
}
