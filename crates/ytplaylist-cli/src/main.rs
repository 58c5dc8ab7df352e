mod args;
mod commands;
mod logging;

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing::error;
use ytplaylist_core::{error::ConfigError, Config};

use args::{Cli, Commands};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = Config::load(cli.config.as_deref()).map(|mut config| {
        if let Some(output) = cli.output.clone() {
            config.output.directory = output;
        }
        config
    });

    // doctor and config print to the terminal and leave the log file alone
    let result = match cli.command {
        Some(Commands::Doctor) => match loaded {
            Ok(config) => commands::doctor::run(&config).await,
            Err(e) => Err(e.into()),
        },
        Some(Commands::Config) => match loaded {
            Ok(config) => commands::config::run(&config, cli.config.as_deref()).await,
            Err(e) => Err(e.into()),
        },
        None => {
            let log_dir = std::env::current_dir().unwrap_or_else(|_| ".".into());
            // Dropped at the end of main, after the last error line is queued
            let _log_guard = logging::init(cli.verbose, &log_dir, &log_file_name(&loaded));

            let result = match loaded {
                Ok(config) => download(cli.url, &config).await,
                Err(e) => Err(e.into()),
            };
            return match result {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    error!("Error: {:#}", e);
                    ExitCode::FAILURE
                }
            };
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn download(url: Option<String>, config: &Config) -> Result<()> {
    let url = match url {
        Some(url) => url,
        None => commands::download::prompt_url()?,
    };
    commands::download::run(&url, config).await
}

/// Log file for a download run. A config that failed to load still gets its
/// error into the default log file.
fn log_file_name(loaded: &std::result::Result<Config, ConfigError>) -> String {
    match loaded {
        Ok(config) => config.log.file.clone(),
        Err(_) => Config::default().log.file,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_name_from_config() {
        let mut config = Config::default();
        config.log.file = "runs.log".to_string();
        assert_eq!(log_file_name(&Ok(config)), "runs.log");
    }

    #[test]
    fn test_log_file_name_falls_back_when_config_fails() {
        let loaded = Err(ConfigError::LoadError("bad toml".to_string()));
        assert_eq!(log_file_name(&loaded), "ytplaylist.log");
    }
}
