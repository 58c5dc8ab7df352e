//! MP3 conversion and cover/tag embedding using FFmpeg

use crate::error::TranscodeError;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

/// Tags written into the output file
#[derive(Debug, Clone)]
pub struct Tags<'a> {
    pub title: &'a str,
    pub artist: &'a str,
}

#[derive(Debug)]
pub struct Transcoder {
    ffmpeg_path: PathBuf,
}

impl Transcoder {
    pub fn new(ffmpeg_path: PathBuf) -> Self {
        Self { ffmpeg_path }
    }

    /// Convert `audio` to MP3 with `cover` attached as front cover art.
    /// Never overwrites `output`.
    pub async fn mux(&self, audio: &Path, cover: &Path, output: &Path, tags: &Tags<'_>) -> Result<(), TranscodeError> {
        info!("Converting to MP3: {}", tags.title);

        let status = Command::new(&self.ffmpeg_path)
            .args(Self::mux_args(audio, cover, output, tags))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(TranscodeError::Launch)?;

        if !status.success() {
            return Err(TranscodeError::FfmpegFailed(status.code()));
        }

        debug!("Wrote: {}", output.display());
        Ok(())
    }

    fn mux_args(audio: &Path, cover: &Path, output: &Path, tags: &Tags<'_>) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-hide_banner".into(),
            "-loglevel".into(),
            "error".into(),
            "-i".into(),
            audio.into(),
            "-i".into(),
            cover.into(),
        ];

        for a in [
            "-map", "0:a",
            "-map", "1:v",
            "-c:a", "libmp3lame",
            "-q:a", "2",
            // JPEG goes in as-is as the ID3 APIC frame
            "-c:v", "copy",
            "-id3v2_version", "3",
            "-metadata:s:v", "title=Album cover",
            "-metadata:s:v", "comment=Cover (front)",
            "-disposition:v", "attached_pic",
        ] {
            args.push(a.into());
        }

        args.push("-metadata".into());
        args.push(format!("title={}", tags.title).into());
        args.push("-metadata".into());
        args.push(format!("artist={}", tags.artist).into());

        args.push("-n".into());
        args.push(output.into());
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags() -> Tags<'static> {
        Tags {
            title: "Song",
            artist: "Band",
        }
    }

    #[test]
    fn test_mux_args() {
        let args = Transcoder::mux_args(
            Path::new("audio/Song - Band.m4a"),
            Path::new("cover_images/Song - Band.jpg"),
            Path::new("Mix/Song - Band.mp3"),
            &tags(),
        );
        let args: Vec<String> = args.iter().map(|a| a.to_string_lossy().into_owned()).collect();

        let pos = |needle: &str| args.iter().position(|a| a == needle).unwrap();
        assert_eq!(args[pos("-i") + 1], "audio/Song - Band.m4a");
        assert!(args.contains(&"cover_images/Song - Band.jpg".to_string()));
        assert!(args.contains(&"title=Song".to_string()));
        assert!(args.contains(&"artist=Band".to_string()));
        assert!(args.contains(&"attached_pic".to_string()));
        assert!(!args.contains(&"-y".to_string()));
        assert_eq!(args[args.len() - 2], "-n");
        assert_eq!(args.last().unwrap(), "Mix/Song - Band.mp3");
    }

    #[tokio::test]
    async fn test_missing_ffmpeg_is_launch_error() {
        let transcoder = Transcoder::new(PathBuf::from("/nonexistent/bin/ffmpeg"));
        let err = transcoder
            .mux(Path::new("a.m4a"), Path::new("c.jpg"), Path::new("o.mp3"), &tags())
            .await
            .unwrap_err();
        assert!(matches!(err, TranscodeError::Launch(_)));
    }
}
