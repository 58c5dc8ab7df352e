//! Media source abstraction: playlist resolution, stream lookup and downloads
//!
//! The pipeline only talks to a [`MediaSource`]. [`crate::ytdlp::YtDlpSource`]
//! is the production backend; tests substitute their own.

use crate::error::SourceError;
use crate::url::PlaylistUrl;
use async_trait::async_trait;
use std::path::Path;

/// A resolved playlist, videos in playlist order
#[derive(Debug, Clone)]
pub struct Playlist {
    pub title: String,
    pub videos: Vec<VideoHandle>,
}

/// A playlist entry. Title and author are known up front so existing outputs
/// can be skipped without contacting the source again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoHandle {
    pub id: String,
    pub title: String,
    pub author: String,
    pub watch_url: String,
    pub thumbnail_url: String,
}

/// One encoded representation of a video
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stream {
    pub format_id: String,
    /// Container extension, e.g. `m4a`, `webm`
    pub ext: String,
    pub acodec: Option<String>,
    pub vcodec: Option<String>,
}

impl Stream {
    pub fn is_audio_only(&self) -> bool {
        let has = |codec: &Option<String>| matches!(codec.as_deref(), Some(c) if c != "none");
        has(&self.acodec) && !has(&self.vcodec)
    }
}

#[async_trait]
pub trait MediaSource: Send + Sync {
    /// Fetch the playlist title and its entries.
    async fn playlist(&self, url: &PlaylistUrl) -> Result<Playlist, SourceError>;

    /// List the encoded streams available for a video.
    async fn streams(&self, video: &VideoHandle) -> Result<Vec<Stream>, SourceError>;

    /// Download `stream` of `video` to `dest`.
    async fn download(&self, video: &VideoHandle, stream: &Stream, dest: &Path) -> Result<(), SourceError>;

    /// Fetch raw thumbnail bytes.
    async fn thumbnail(&self, url: &str) -> Result<Vec<u8>, SourceError>;
}

/// First audio-only stream in `container`. No quality ranking.
pub fn select_audio_stream<'a>(streams: &'a [Stream], container: &str) -> Option<&'a Stream> {
    streams
        .iter()
        .find(|s| s.is_audio_only() && s.ext.eq_ignore_ascii_case(container))
}

/// `"<title> - <author>"` with `/` replaced so the name stays a single path
/// component. Nothing else is rewritten.
pub fn video_file_name(title: &str, author: &str) -> String {
    format!("{} - {}", title, author).replace('/', "_")
}

/// Directory name for a playlist title. Always a single, real path
/// component below the output root.
pub fn playlist_dir_name(title: &str) -> String {
    match title {
        "" | "." | ".." => "_".to_string(),
        _ => title.replace('/', "_"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(id: &str, ext: &str, acodec: &str, vcodec: &str) -> Stream {
        Stream {
            format_id: id.to_string(),
            ext: ext.to_string(),
            acodec: Some(acodec.to_string()),
            vcodec: Some(vcodec.to_string()),
        }
    }

    #[test]
    fn test_audio_only() {
        assert!(stream("140", "m4a", "mp4a.40.2", "none").is_audio_only());
        assert!(!stream("18", "mp4", "mp4a.40.2", "avc1.42001E").is_audio_only());
        assert!(!stream("137", "mp4", "none", "avc1.640028").is_audio_only());

        let mut missing_vcodec = stream("251", "webm", "opus", "none");
        missing_vcodec.vcodec = None;
        assert!(missing_vcodec.is_audio_only());
    }

    #[test]
    fn test_select_first_match() {
        let streams = vec![
            stream("18", "mp4", "mp4a.40.2", "avc1.42001E"),
            stream("251", "webm", "opus", "none"),
            stream("139", "m4a", "mp4a.40.5", "none"),
            stream("140", "m4a", "mp4a.40.2", "none"),
        ];
        assert_eq!(select_audio_stream(&streams, "m4a").unwrap().format_id, "139");
        assert_eq!(select_audio_stream(&streams, "webm").unwrap().format_id, "251");
        assert!(select_audio_stream(&streams, "mp3").is_none());
        assert!(select_audio_stream(&[], "m4a").is_none());
    }

    #[test]
    fn test_video_file_name() {
        assert_eq!(video_file_name("Song", "Band"), "Song - Band");
        assert_eq!(video_file_name("AC/DC Live", "Fan/Club"), "AC_DC Live - Fan_Club");
        // other reserved characters pass through
        assert_eq!(video_file_name("What?", "A:B"), "What? - A:B");
        assert_eq!(Path::new(&video_file_name("a/b/c", "d")).components().count(), 1);
    }

    #[test]
    fn test_playlist_dir_name() {
        assert_eq!(playlist_dir_name("Mix 2024/25"), "Mix 2024_25");
        assert_eq!(playlist_dir_name("../up"), ".._up");
        for title in ["", ".", ".."] {
            assert_eq!(playlist_dir_name(title), "_");
            let root = Path::new("out");
            assert_eq!(root.join(playlist_dir_name(title)).parent(), Some(root));
        }
    }
}
