//! Error types for ytplaylist-core

use thiserror::Error;

pub type Result<T> = std::result::Result<T, YtPlaylistError>;

#[derive(Error, Debug)]
pub enum YtPlaylistError {
    #[error("{0}")]
    Url(#[from] UrlError),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Cover art failed: {0}")]
    Cover(#[from] CoverError),

    #[error("Transcode failed: {0}")]
    Transcode(#[from] TranscodeError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum UrlError {
    #[error("Invalid YouTube playlist URL: {0:?}. Please provide a valid playlist URL.")]
    InvalidUrl(String),
}

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("yt-dlp failed with exit code {code:?}: {stderr}")]
    YtDlpFailed { code: Option<i32>, stderr: String },

    #[error("Playlist unavailable: {0}")]
    PlaylistUnavailable(String),

    #[error("Video unavailable or private: {0}")]
    VideoUnavailable(String),

    #[error("No audio-only stream with container {container:?}")]
    NoAudioStream { container: String },

    #[error("Failed to parse metadata: {0}")]
    MetadataParse(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum CoverError {
    #[error("Failed to convert thumbnail: {0}")]
    Image(#[from] image::ImageError),
}

#[derive(Error, Debug)]
pub enum TranscodeError {
    #[error("Failed to launch ffmpeg: {0}")]
    Launch(std::io::Error),

    #[error("FFmpeg failed with exit code: {0:?}")]
    FfmpegFailed(Option<i32>),
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
