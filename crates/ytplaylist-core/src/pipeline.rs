//! Playlist download orchestration

use crate::config::Config;
use crate::cover;
use crate::error::{SourceError, YtPlaylistError};
use crate::source::{playlist_dir_name, select_audio_stream, video_file_name, MediaSource, VideoHandle};
use crate::transcoder::{Tags, Transcoder};
use crate::url::PlaylistUrl;

use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Root under which the playlist folder is created
    pub output_dir: PathBuf,
    pub audio_dir: PathBuf,
    pub cover_dir: PathBuf,
    /// Container of the audio-only stream to download
    pub container: String,
}

impl PipelineConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            output_dir: config.output.directory.clone(),
            audio_dir: config.audio_scratch_dir(),
            cover_dir: config.cover_scratch_dir(),
            container: config.stream.container.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub completed: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Progress events, in emission order per video
#[derive(Debug, Clone)]
pub enum PlaylistEvent {
    Started { title: String, total: usize },
    VideoSkipped { index: usize, title: String },
    VideoCompleted { index: usize, output: PathBuf },
    VideoFailed {
        index: usize,
        title: String,
        watch_url: String,
        error: String,
    },
    Progress { done: usize, total: usize, percent: f64 },
    Finished(RunSummary),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoOutcome {
    Completed(PathBuf),
    /// Output already existed; nothing was touched
    Skipped(PathBuf),
}

/// Percentage of the playlist handled after `done` of `total` videos
pub fn progress_percent(done: usize, total: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    done as f64 / total as f64 * 100.0
}

pub struct Pipeline<S> {
    source: S,
    transcoder: Transcoder,
    config: PipelineConfig,
    progress_tx: mpsc::Sender<PlaylistEvent>,
}

impl<S: MediaSource> Pipeline<S> {
    pub fn new(
        source: S,
        transcoder: Transcoder,
        config: PipelineConfig,
        progress_tx: mpsc::Sender<PlaylistEvent>,
    ) -> Self {
        Self {
            source,
            transcoder,
            config,
            progress_tx,
        }
    }

    /// Download every video of the playlist. Per-video failures are logged
    /// and counted; only playlist resolution or directory setup errors are
    /// returned. Scratch directories are removed on every path.
    pub async fn run(&self, url: &PlaylistUrl) -> Result<RunSummary, YtPlaylistError> {
        let result = self.run_playlist(url).await;
        self.remove_scratch_dirs().await;
        result
    }

    async fn run_playlist(&self, url: &PlaylistUrl) -> Result<RunSummary, YtPlaylistError> {
        let playlist = self.source.playlist(url).await?;
        info!("Downloading playlist: {}", playlist.title);

        tokio::fs::create_dir_all(&self.config.audio_dir).await?;
        tokio::fs::create_dir_all(&self.config.cover_dir).await?;
        let playlist_dir = self.config.output_dir.join(playlist_dir_name(&playlist.title));
        tokio::fs::create_dir_all(&playlist_dir).await?;

        let total = playlist.videos.len();
        let mut summary = RunSummary {
            total,
            ..Default::default()
        };

        self.emit(PlaylistEvent::Started {
            title: playlist.title.clone(),
            total,
        })
        .await;

        for (index, video) in playlist.videos.iter().enumerate() {
            match self.process_video(&playlist_dir, video).await {
                Ok(VideoOutcome::Completed(output)) => {
                    summary.completed += 1;
                    self.emit(PlaylistEvent::VideoCompleted { index, output }).await;
                }
                Ok(VideoOutcome::Skipped(_)) => {
                    summary.skipped += 1;
                    self.emit(PlaylistEvent::VideoSkipped {
                        index,
                        title: video.title.clone(),
                    })
                    .await;
                }
                Err(e) => {
                    error!("{} ({})", e, video.watch_url);
                    summary.failed += 1;
                    self.emit(PlaylistEvent::VideoFailed {
                        index,
                        title: video.title.clone(),
                        watch_url: video.watch_url.clone(),
                        error: e.to_string(),
                    })
                    .await;
                }
            }

            self.emit(PlaylistEvent::Progress {
                done: index + 1,
                total,
                percent: progress_percent(index + 1, total),
            })
            .await;
        }

        info!(
            "Download completed: {} converted, {} skipped, {} failed",
            summary.completed, summary.skipped, summary.failed
        );
        self.emit(PlaylistEvent::Finished(summary)).await;

        Ok(summary)
    }

    /// Download, convert and tag one video into `playlist_dir`.
    pub async fn process_video(&self, playlist_dir: &Path, video: &VideoHandle) -> Result<VideoOutcome, YtPlaylistError> {
        let name = video_file_name(&video.title, &video.author);
        let output = playlist_dir.join(format!("{}.mp3", name));

        if output.exists() {
            debug!("Already downloaded: {}", output.display());
            return Ok(VideoOutcome::Skipped(output));
        }

        let streams = self.source.streams(video).await?;
        let stream = select_audio_stream(&streams, &self.config.container).ok_or_else(|| {
            SourceError::NoAudioStream {
                container: self.config.container.clone(),
            }
        })?;

        let audio_path = self.config.audio_dir.join(format!("{}.{}", name, stream.ext));
        self.source.download(video, stream, &audio_path).await?;

        let image_data = self.source.thumbnail(&video.thumbnail_url).await?;
        let cover_path = self.config.cover_dir.join(format!("{}.jpg", name));
        cover::write_jpeg(&image_data, &cover_path)?;

        let tags = Tags {
            title: &video.title,
            artist: &video.author,
        };
        let result = self.transcoder.mux(&audio_path, &cover_path, &output, &tags).await;

        remove_scratch_file(&audio_path).await;
        remove_scratch_file(&cover_path).await;

        result?;
        Ok(VideoOutcome::Completed(output))
    }

    async fn remove_scratch_dirs(&self) {
        for dir in [&self.config.audio_dir, &self.config.cover_dir] {
            match tokio::fs::remove_dir_all(dir).await {
                Ok(()) => debug!("Removed {}", dir.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => error!("Failed to remove {}: {}", dir.display(), e),
            }
        }
    }

    async fn emit(&self, event: PlaylistEvent) {
        let _ = self.progress_tx.send(event).await;
    }
}

async fn remove_scratch_file(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        warn!("Failed to remove {}: {}", path.display(), e);
    }
}
