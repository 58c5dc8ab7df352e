use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::{self, BufRead, Write};
use tokio::sync::mpsc;
use tracing::info;

use ytplaylist_core::{
    pipeline::{Pipeline, PipelineConfig, PlaylistEvent},
    transcoder::Transcoder,
    url::PlaylistUrl,
    ytdlp::YtDlpSource,
    Config,
};

/// Ask for the playlist URL on stdin
pub fn prompt_url() -> Result<String> {
    print!("Please enter your playlist url: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read playlist URL")?;
    Ok(line.trim().to_string())
}

pub async fn run(url: &str, config: &Config) -> Result<()> {
    // Validate before touching the network or the filesystem
    let url = PlaylistUrl::parse(url)?;

    let source = YtDlpSource::new(config.ytdlp_path()?);
    let transcoder = Transcoder::new(config.ffmpeg_path()?);

    let (tx, mut rx) = mpsc::channel(32);

    let style = ProgressStyle::with_template("{prefix} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")?
        .progress_chars("=>-");
    let mut view = ProgressView::new(style, ProgressDrawTarget::stderr);

    let progress_handle = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            if let Some(line) = view.handle(event) {
                info!("{}", line);
            }
        }
        view.close();
    });

    let pipeline = Pipeline::new(source, transcoder, PipelineConfig::from_config(config), tx);
    let result = pipeline.run(&url).await;

    // Closes the channel so the progress task can finish
    drop(pipeline);
    progress_handle.await?;

    let summary = result?;
    info!("Download completed! ({} of {} videos failed)", summary.failed, summary.total);
    Ok(())
}

/// Progress bar fed by pipeline events. When the bar cannot be drawn
/// (stderr is not a terminal) the percentage comes back as a log line.
struct ProgressView {
    style: ProgressStyle,
    draw_target: fn() -> ProgressDrawTarget,
    bar: Option<ProgressBar>,
}

impl ProgressView {
    fn new(style: ProgressStyle, draw_target: fn() -> ProgressDrawTarget) -> Self {
        Self {
            style,
            draw_target,
            bar: None,
        }
    }

    fn handle(&mut self, event: PlaylistEvent) -> Option<String> {
        match event {
            PlaylistEvent::Started { title, total } => {
                let bar = ProgressBar::with_draw_target(Some(total as u64), (self.draw_target)());
                bar.set_style(self.style.clone());
                bar.set_prefix(format!("{:>5.1}%", 0.0));
                bar.set_message(truncate(&title, 40));
                self.bar = Some(bar);
            }
            PlaylistEvent::VideoSkipped { title, .. } => {
                self.set_message(format!("Exists: {}", truncate(&title, 40)));
            }
            PlaylistEvent::VideoCompleted { output, .. } => {
                let name = output.file_name().unwrap_or_default().to_string_lossy().into_owned();
                self.set_message(format!("Done: {}", truncate(&name, 40)));
            }
            PlaylistEvent::VideoFailed { title, .. } => {
                self.set_message(format!("Failed: {}", truncate(&title, 40)));
            }
            PlaylistEvent::Progress { done, percent, .. } => {
                let bar = self.bar.as_ref()?;
                bar.set_position(done as u64);
                bar.set_prefix(format!("{:>5.1}%", percent));
                if bar.is_hidden() {
                    return Some(format!("Progress: {:.1}%", percent));
                }
            }
            PlaylistEvent::Finished(summary) => {
                if let Some(bar) = &self.bar {
                    bar.finish_with_message(format!(
                        "{} converted, {} already present, {} failed",
                        summary.completed, summary.skipped, summary.failed
                    ));
                }
            }
        }
        None
    }

    fn set_message(&self, msg: String) {
        if let Some(bar) = &self.bar {
            bar.set_message(msg);
        }
    }

    fn close(self) {
        if let Some(bar) = self.bar {
            if !bar.is_finished() {
                bar.abandon();
            }
        }
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars - 3).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a much longer title", 10), "a much ...");
        // multi-byte titles are cut on char boundaries
        assert_eq!(truncate("ääääääääääää", 6), "äää...");
    }

    #[test]
    fn test_hidden_bar_reports_percent_as_log_line() {
        let mut view = ProgressView::new(ProgressStyle::default_bar(), ProgressDrawTarget::hidden);

        assert_eq!(
            view.handle(PlaylistEvent::Started {
                title: "Mix".to_string(),
                total: 2,
            }),
            None
        );
        assert_eq!(
            view.handle(PlaylistEvent::Progress {
                done: 1,
                total: 2,
                percent: 50.0,
            }),
            Some("Progress: 50.0%".to_string())
        );
        assert_eq!(
            view.handle(PlaylistEvent::Progress {
                done: 2,
                total: 2,
                percent: 100.0,
            }),
            Some("Progress: 100.0%".to_string())
        );
        assert_eq!(view.bar.as_ref().map(|b| b.position()), Some(2));
        view.close();
    }

    #[test]
    fn test_progress_before_start_is_ignored() {
        let mut view = ProgressView::new(ProgressStyle::default_bar(), ProgressDrawTarget::hidden);
        let line = view.handle(PlaylistEvent::Progress {
            done: 1,
            total: 1,
            percent: 100.0,
        });
        assert_eq!(line, None);
    }

    #[tokio::test]
    async fn test_invalid_url_is_rejected_before_any_work() {
        let mut config = Config::default();
        config.paths.ytdlp = Some("/nonexistent/yt-dlp".into());
        config.paths.ffmpeg = Some("/nonexistent/ffmpeg".into());
        let dir = tempfile::tempdir().unwrap();
        config.output.directory = dir.path().to_path_buf();

        let err = run("https://example.com/playlist?list=PL1", &config).await.unwrap_err();
        assert!(err.to_string().contains("Invalid YouTube playlist URL"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
