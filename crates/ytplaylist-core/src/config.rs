//! Configuration management for ytplaylist

use crate::error::ConfigError;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub paths: PathsConfig,
    pub output: OutputConfig,
    pub scratch: ScratchConfig,
    pub stream: StreamConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Path to yt-dlp binary (auto-detected if not set)
    pub ytdlp: Option<PathBuf>,
    /// Path to FFmpeg binary (auto-detected if not set)
    pub ffmpeg: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Root directory for playlist folders and scratch directories
    pub directory: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScratchConfig {
    /// Scratch directory for downloaded audio streams
    pub audio: PathBuf,
    /// Scratch directory for converted cover images
    pub covers: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Container of the audio-only stream to download
    pub container: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log file name, created in the working directory
    pub file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paths: PathsConfig::default(),
            output: OutputConfig {
                directory: PathBuf::from("."),
            },
            scratch: ScratchConfig {
                audio: PathBuf::from("audio"),
                covers: PathBuf::from("cover_images"),
            },
            stream: StreamConfig {
                container: "m4a".to_string(),
            },
            log: LogConfig {
                file: "ytplaylist.log".to_string(),
            },
        }
    }
}

impl Config {
    /// Load configuration from file and environment
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(default_config) = default_config_file() {
            if default_config.exists() {
                figment = figment.merge(Toml::file(&default_config));
            }
        }

        if let Some(path) = config_file {
            if !path.exists() {
                return Err(ConfigError::LoadError(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("YTPLAYLIST_").split("_"));

        figment.extract().map_err(|e| ConfigError::LoadError(e.to_string()))
    }

    /// Get yt-dlp path, auto-detecting if not configured
    pub fn ytdlp_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(ref path) = self.paths.ytdlp {
            Ok(path.clone())
        } else {
            which::which("yt-dlp")
                .map_err(|_| ConfigError::InvalidValue("yt-dlp not found in PATH".to_string()))
        }
    }

    /// Get FFmpeg path, auto-detecting if not configured
    pub fn ffmpeg_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(ref path) = self.paths.ffmpeg {
            Ok(path.clone())
        } else {
            which::which("ffmpeg")
                .map_err(|_| ConfigError::InvalidValue("ffmpeg not found in PATH".to_string()))
        }
    }

    pub fn audio_scratch_dir(&self) -> PathBuf {
        self.output.directory.join(&self.scratch.audio)
    }

    pub fn cover_scratch_dir(&self) -> PathBuf {
        self.output.directory.join(&self.scratch.covers)
    }
}

/// `<config dir>/ytplaylist/config.toml`, if the platform has a config dir
pub fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("ytplaylist/config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.output.directory, PathBuf::from("."));
        assert_eq!(config.audio_scratch_dir(), PathBuf::from("./audio"));
        assert_eq!(config.cover_scratch_dir(), PathBuf::from("./cover_images"));
        assert_eq!(config.stream.container, "m4a");
        assert_eq!(config.log.file, "ytplaylist.log");
    }

    #[test]
    fn test_load_overrides_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[paths]\nffmpeg = \"/opt/ffmpeg/bin/ffmpeg\"\n\n[stream]\ncontainer = \"webm\""
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.paths.ffmpeg, Some(PathBuf::from("/opt/ffmpeg/bin/ffmpeg")));
        assert_eq!(config.ffmpeg_path().unwrap(), PathBuf::from("/opt/ffmpeg/bin/ffmpeg"));
        assert_eq!(config.stream.container, "webm");
        assert_eq!(config.scratch.covers, PathBuf::from("cover_images"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Some(Path::new("/nonexistent/ytplaylist.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::LoadError(_)));
    }
}
