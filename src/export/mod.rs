//! Collection export

pub mod apple_music;
pub mod config;

pub use apple_music::{export_apple_music, render_apple_music};
pub use config::ExportConfig;
