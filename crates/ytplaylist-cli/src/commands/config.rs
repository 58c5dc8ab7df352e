use anyhow::Result;
use std::path::Path;
use ytplaylist_core::config::{default_config_file, Config};

pub async fn run(config: &Config, config_path: Option<&Path>) -> Result<()> {
    println!("ytplaylist configuration\n");

    print!("{}", toml::to_string_pretty(config)?);

    println!("\n[resolved]");
    match config.ytdlp_path() {
        Ok(p) => println!("  yt-dlp = {:?}", p),
        Err(_) => println!("  yt-dlp = (not found)"),
    }
    match config.ffmpeg_path() {
        Ok(p) => println!("  ffmpeg = {:?}", p),
        Err(_) => println!("  ffmpeg = (not found)"),
    }
    println!("  audio scratch = {:?}", config.audio_scratch_dir());
    println!("  cover scratch = {:?}", config.cover_scratch_dir());

    println!("\nConfig sources (later entries override earlier ones):");
    if let Some(default) = default_config_file() {
        println!("  1. {}", default.display());
    }
    if let Some(p) = config_path {
        println!("  2. {} (specified)", p.display());
    }
    println!("  3. Environment variables (YTPLAYLIST_*)");

    Ok(())
}
