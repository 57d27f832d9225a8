//! Error types for stemclean-core

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StemCleanError>;

#[derive(Error, Debug)]
pub enum StemCleanError {
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Separation failed: {0}")]
    Split(#[from] stemclean_split::SplitError),

    #[error("Silence trim failed: {0}")]
    Trim(#[from] TrimError),

    #[error("Output already exists: {}", .0.display())]
    OutputExists(PathBuf),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("yt-dlp failed with exit code: {0:?}")]
    YtDlpFailed(Option<i32>),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Video unavailable or private: {0}")]
    VideoUnavailable(String),

    #[error("No audio stream available")]
    NoAudioStream,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum TrimError {
    #[error("ffmpeg silenceremove failed with exit code: {0:?}")]
    FfmpegFailed(Option<i32>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    LoadError(String),

    #[error("Invalid config value: {0}")]
    InvalidValue(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
