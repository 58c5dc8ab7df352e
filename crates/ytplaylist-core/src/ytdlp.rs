//! YouTube media source backed by yt-dlp and a plain HTTP client

use crate::error::SourceError;
use crate::source::{MediaSource, Playlist, Stream, VideoHandle};
use crate::url::PlaylistUrl;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};

#[derive(Debug)]
pub struct YtDlpSource {
    yt_dlp_path: PathBuf,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct PlaylistJson {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    entries: Vec<EntryJson>,
}

#[derive(Debug, Deserialize)]
struct EntryJson {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    channel: Option<String>,
    #[serde(default)]
    uploader: Option<String>,
    #[serde(default)]
    thumbnails: Vec<ThumbnailJson>,
}

#[derive(Debug, Deserialize)]
struct ThumbnailJson {
    url: String,
}

#[derive(Debug, Deserialize)]
struct VideoJson {
    #[serde(default)]
    formats: Vec<FormatJson>,
}

#[derive(Debug, Deserialize)]
struct FormatJson {
    format_id: String,
    #[serde(default)]
    ext: String,
    #[serde(default)]
    acodec: Option<String>,
    #[serde(default)]
    vcodec: Option<String>,
}

impl YtDlpSource {
    pub fn new(yt_dlp_path: PathBuf) -> Self {
        Self {
            yt_dlp_path,
            http: reqwest::Client::new(),
        }
    }

    async fn run_json(&self, args: &[&str]) -> Result<String, SourceError> {
        let output = Command::new(&self.yt_dlp_path)
            .args(["--no-warnings", "--dump-single-json"])
            .args(args)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            debug!("yt-dlp stderr: {}", stderr);
            return Err(SourceError::YtDlpFailed {
                code: output.status.code(),
                stderr,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl MediaSource for YtDlpSource {
    async fn playlist(&self, url: &PlaylistUrl) -> Result<Playlist, SourceError> {
        info!("Resolving playlist: {}", url);

        let json = self
            .run_json(&["--flat-playlist", url.as_str()])
            .await
            .map_err(|e| match e {
                SourceError::YtDlpFailed { ref stderr, .. }
                    if stderr.contains("does not exist") || stderr.contains("unavailable") =>
                {
                    SourceError::PlaylistUnavailable(url.to_string())
                }
                other => other,
            })?;

        parse_playlist(&json)
    }

    async fn streams(&self, video: &VideoHandle) -> Result<Vec<Stream>, SourceError> {
        debug!("Listing streams for {}", video.watch_url);

        let json = self
            .run_json(&["--no-playlist", video.watch_url.as_str()])
            .await
            .map_err(|e| match e {
                SourceError::YtDlpFailed { ref stderr, .. }
                    if stderr.contains("Video unavailable") || stderr.contains("Private video") =>
                {
                    SourceError::VideoUnavailable(video.watch_url.clone())
                }
                other => other,
            })?;

        parse_streams(&json)
    }

    async fn download(&self, video: &VideoHandle, stream: &Stream, dest: &Path) -> Result<(), SourceError> {
        info!("Downloading {} (format {})", video.title, stream.format_id);

        // yt-dlp treats `%` in -o as a template field
        let template = dest.to_string_lossy().replace('%', "%%");

        let output = Command::new(&self.yt_dlp_path)
            .args([
                "--no-warnings",
                "--no-playlist",
                "--no-part",
                "--force-overwrites",
                "-f",
                stream.format_id.as_str(),
                "-o",
                template.as_str(),
                video.watch_url.as_str(),
            ])
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            debug!("yt-dlp stderr: {}", stderr);
            return Err(SourceError::YtDlpFailed {
                code: output.status.code(),
                stderr,
            });
        }

        if !dest.exists() {
            return Err(SourceError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("yt-dlp did not produce {}", dest.display()),
            )));
        }

        debug!("Downloaded to: {}", dest.display());
        Ok(())
    }

    async fn thumbnail(&self, url: &str) -> Result<Vec<u8>, SourceError> {
        debug!("Fetching thumbnail: {}", url);
        let bytes = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(bytes.to_vec())
    }
}

pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

/// Fallback cover for entries that list no thumbnails
pub fn default_thumbnail_url(video_id: &str) -> String {
    format!("https://i.ytimg.com/vi/{}/hqdefault.jpg", video_id)
}

fn parse_playlist(json: &str) -> Result<Playlist, SourceError> {
    let parsed: PlaylistJson =
        serde_json::from_str(json).map_err(|e| SourceError::MetadataParse(e.to_string()))?;

    let title = parsed
        .title
        .ok_or_else(|| SourceError::MetadataParse("playlist has no title".to_string()))?;

    let videos = parsed
        .entries
        .into_iter()
        .filter_map(|entry| {
            let id = entry.id?;
            Some(VideoHandle {
                title: entry.title.unwrap_or_else(|| id.clone()),
                author: entry
                    .channel
                    .or(entry.uploader)
                    .unwrap_or_else(|| "Unknown".to_string()),
                watch_url: watch_url(&id),
                thumbnail_url: entry
                    .thumbnails
                    .into_iter()
                    .last()
                    .map(|t| t.url)
                    .unwrap_or_else(|| default_thumbnail_url(&id)),
                id,
            })
        })
        .collect();

    Ok(Playlist { title, videos })
}

fn parse_streams(json: &str) -> Result<Vec<Stream>, SourceError> {
    let parsed: VideoJson =
        serde_json::from_str(json).map_err(|e| SourceError::MetadataParse(e.to_string()))?;

    Ok(parsed
        .formats
        .into_iter()
        .map(|f| Stream {
            format_id: f.format_id,
            ext: f.ext,
            acodec: f.acodec,
            vcodec: f.vcodec,
        })
        .collect())
}
