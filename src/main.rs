use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tagedit::presets::{GenrePresets, DEFAULT_PRESETS_PATH};
use tagedit::{source, tags};
use tagedit::{Attribute, ExportConfig, Id3TagReader, LoadPolicy, TrackCollection, TrackRecord};

#[derive(Parser, Debug)]
#[command(name = "tagedit")]
#[command(about = "Browse, tag and export an ID3 music library", long_about = None)]
struct Args {
    /// Verbose logging
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug)]
struct SourceArgs {
    /// M3U playlist to load (can be specified multiple times)
    #[arg(short = 'p', long = "playlist")]
    playlists: Vec<String>,

    /// Directory to scan for .mp3/.wav files (can be specified multiple times)
    #[arg(short = 'd', long = "dir")]
    dirs: Vec<String>,

    /// Skip files whose tags cannot be read instead of aborting
    #[arg(long)]
    skip_unreadable: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Export tracks to an Apple Music library XML file
    Export {
        #[command(flatten)]
        source: SourceArgs,

        /// Destination XML file
        #[arg(short = 'o', long)]
        output: PathBuf,

        /// Indent the XML by this many spaces
        #[arg(long)]
        indent: Option<usize>,

        /// Also export loaded playlists
        #[arg(long)]
        with_playlists: bool,
    },

    /// List tracks, optionally filtered by tag values
    List {
        #[command(flatten)]
        source: SourceArgs,

        /// Only tracks by this artist
        #[arg(long)]
        artist: Option<String>,

        /// Only tracks from this album
        #[arg(long)]
        album: Option<String>,

        /// Only tracks with exactly this genre
        #[arg(long)]
        genre: Option<String>,
    },

    /// List audio files that have no genre yet
    Untagged {
        /// Directory to scan (can be specified multiple times)
        #[arg(short = 'd', long = "dir", required = true)]
        dirs: Vec<String>,
    },

    /// Toggle a genre label on audio files
    Tag {
        /// Genre label to add, or remove when already present
        #[arg(short = 'g', long)]
        genre: String,

        /// Files to tag
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Manage saved genre presets
    Presets {
        /// Presets file
        #[arg(long, default_value = DEFAULT_PRESETS_PATH)]
        file: String,

        #[command(subcommand)]
        action: PresetAction,
    },
}

#[derive(Subcommand, Debug)]
enum PresetAction {
    /// Print all presets
    List,
    /// Save a new preset
    Add { genre: String },
    /// Delete a preset
    Remove { genre: String },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    match args.command {
        Command::Export {
            source,
            output,
            indent,
            with_playlists,
        } => {
            let library = load_library(&source)?;

            let mut config = ExportConfig::new(output).with_playlists(with_playlists);
            if let Some(spaces) = indent {
                config = config.with_indent(spaces);
            }

            tagedit::export::export_apple_music(&library, &config)
                .with_context(|| format!("Failed to export to {:?}", config.destination))?;
            log::info!("Export completed successfully!");
        }

        Command::List {
            source,
            artist,
            album,
            genre,
        } => {
            let library = load_library(&source)?;
            let filters: Vec<(Attribute, String)> = [
                (Attribute::Artist, artist),
                (Attribute::Album, album),
                (Attribute::Genre, genre),
            ]
            .into_iter()
            .filter_map(|(attribute, value)| value.map(|v| (attribute, v)))
            .collect();

            for track in filter_tracks(&library, &filters)? {
                print_track(track);
            }
        }

        Command::Untagged { dirs } => {
            let reader = Id3TagReader::new();
            for dir in dirs {
                let files = source::scan_directory(&expand_path(&dir))
                    .with_context(|| format!("Failed to scan {}", dir))?;
                for file in source::filter_untagged(&files, &reader) {
                    println!("{}", file.display());
                }
            }
        }

        Command::Tag { genre, files } => {
            for file in files {
                let updated = tags::toggle_genre(&file, &genre)
                    .with_context(|| format!("Failed to tag {:?}", file))?;
                println!("{}: {}", file.display(), updated);
            }
        }

        Command::Presets { file, action } => {
            let path = expand_path(&file);
            let mut presets = GenrePresets::load(&path)?;

            match action {
                PresetAction::List => {
                    for genre in presets.iter() {
                        println!("{}", genre);
                    }
                }
                PresetAction::Add { genre } => {
                    if presets.add(&genre) {
                        presets.save(&path)?;
                        log::info!("Saved preset {:?}", genre.trim());
                    } else {
                        log::info!("Preset {:?} already exists", genre.trim());
                    }
                }
                PresetAction::Remove { genre } => {
                    if presets.remove(&genre) {
                        presets.save(&path)?;
                        log::info!("Removed preset {:?}", genre.trim());
                    } else {
                        log::warn!("No preset named {:?}", genre.trim());
                    }
                }
            }
        }
    }

    Ok(())
}

/// Expand ~ in a user-supplied path
fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

/// Load directories and playlists into one library collection
///
/// Each playlist is registered by its file name and merged into the library.
fn load_library(args: &SourceArgs) -> Result<TrackCollection> {
    if args.playlists.is_empty() && args.dirs.is_empty() {
        anyhow::bail!("Nothing to load: pass --playlist and/or --dir");
    }

    let reader = Id3TagReader::new();
    let policy = if args.skip_unreadable {
        LoadPolicy::SkipUnreadable
    } else {
        LoadPolicy::AbortOnError
    };

    let mut library = TrackCollection::new("library");

    for dir in &args.dirs {
        let dir = expand_path(dir);
        let collection = source::load_directory(&dir, &reader, policy)
            .with_context(|| format!("Failed to load directory {:?}", dir))?;
        library.merge(&collection);
    }

    for playlist in &args.playlists {
        let playlist = expand_path(playlist);
        let collection = source::load_playlist(&playlist, &reader, policy)
            .with_context(|| format!("Failed to load playlist {:?}", playlist))?;
        library.add_playlist(collection);
    }

    log::info!(
        "Library loaded: {} tracks, {} playlists",
        library.len(),
        library.playlists().count()
    );
    Ok(library)
}

/// Tracks matching every filter, looked up through the first filter's index
fn filter_tracks<'a>(
    library: &'a TrackCollection,
    filters: &[(Attribute, String)],
) -> Result<Vec<&'a Arc<TrackRecord>>> {
    let Some(((attribute, value), rest)) = filters.split_first() else {
        return Ok(library.iter().collect());
    };

    let bucket = match library.get_tracks_by(*attribute, value) {
        Ok(bucket) => bucket,
        Err(e) if e.is_not_found() => {
            log::info!("{}", e);
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    Ok(bucket
        .iter()
        .filter(|track| rest.iter().all(|(a, v)| track.get(*a) == v.as_str()))
        .collect())
}

fn print_track(track: &TrackRecord) {
    println!(
        "{}\t{}\t{}\t{}\t{}\t{}",
        track.full_name(),
        track.album(),
        track.date(),
        track.genre(),
        track.bpm(),
        track.path().display()
    );
}
