//! Wordlens web server entry point.
//!
//! Reads the configuration file named by `WORDLENS_CONFIG`, falling back to
//! the user configuration directory and then to defaults.

use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::fmt;
use wordlens_core::WordlensConfig;
use wordlens_web::start_server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config()?;

    fmt()
        .with_max_level(config.logging.level.as_tracing())
        .with_target(config.logging.with_target)
        .init();

    info!("Starting Wordlens web server...");
    start_server(config).await?;
    Ok(())
}

fn load_config() -> anyhow::Result<WordlensConfig> {
    let path = match std::env::var_os("WORDLENS_CONFIG") {
        Some(path) => PathBuf::from(path),
        None => match WordlensConfig::default_path() {
            Ok(path) if path.exists() => path,
            _ => return Ok(WordlensConfig::default()),
        },
    };
    Ok(WordlensConfig::load(&path)?)
}
