use anyhow::Result;
use std::path::Path;
use std::process::Command;
use ytplaylist_core::Config;

pub async fn run(config: &Config) -> Result<()> {
    println!("ytplaylist dependency check\n");

    let mut all_ok = true;

    print!("yt-dlp:     ");
    match config.ytdlp_path() {
        Ok(path) => match tool_output(&path, &["--version"]) {
            Some(out) => println!("OK ({}, {})", out.trim(), path.display()),
            None => {
                println!("FOUND at {} but failed to get version", path.display());
                all_ok = false;
            }
        },
        Err(_) => {
            println!("NOT FOUND");
            println!("            Install yt-dlp or set paths.ytdlp in the config file");
            all_ok = false;
        }
    }

    print!("ffmpeg:     ");
    match config.ffmpeg_path() {
        Ok(path) => {
            match tool_output(&path, &["-version"]) {
                Some(out) => {
                    // "ffmpeg version 6.1.1 Copyright ..."
                    let version = out
                        .lines()
                        .next()
                        .and_then(|l| l.split_whitespace().nth(2))
                        .unwrap_or("unknown");
                    println!("OK ({}, {})", version, path.display());
                }
                None => {
                    println!("FOUND at {} but failed to get version", path.display());
                    all_ok = false;
                }
            }

            print!("libmp3lame: ");
            match tool_output(&path, &["-hide_banner", "-encoders"]) {
                Some(out) if out.contains("libmp3lame") => println!("OK"),
                _ => {
                    println!("MISSING (ffmpeg was built without MP3 encoding)");
                    all_ok = false;
                }
            }
        }
        Err(_) => {
            println!("NOT FOUND");
            println!("            Install ffmpeg or set paths.ffmpeg in the config file");
            all_ok = false;
        }
    }

    println!();
    if all_ok {
        println!("All dependencies OK!");
    } else {
        println!("Some dependencies are missing. See above for installation instructions.");
    }

    Ok(())
}

fn tool_output(path: &Path, args: &[&str]) -> Option<String> {
    let out = Command::new(path).args(args).output().ok()?;
    if !out.status.success() {
        return None;
    }
    Some(String::from_utf8_lossy(&out.stdout).into_owned())
}
