use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ytplaylist")]
#[command(author, version, about = "Download a YouTube playlist as MP3 files with cover art")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// YouTube playlist URL (prompted for if omitted)
    #[arg(value_name = "URL")]
    pub url: Option<String>,

    /// Output directory (playlist folder and scratch directories go here)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Verbose output (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Config file path
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check that yt-dlp and ffmpeg are installed
    Doctor,

    /// Show configuration
    Config,
}
