//! ytplaylist-core: download a YouTube playlist as tagged MP3 files with cover art

pub mod config;
pub mod cover;
pub mod error;
pub mod pipeline;
pub mod source;
pub mod transcoder;
pub mod url;
pub mod ytdlp;

pub use config::Config;
pub use error::{Result, YtPlaylistError};
