//! Logging initialization and startup diagnostics
//!
//! This module provides:
//! - Logger initialization (console + file)
//! - A summary of the effective configuration at startup

use anyhow::Result;
use simplelog::*;
use std::fs::File;

use crate::core::config;

/// Initialize logger for both console and file output
///
/// # Arguments
/// * `log_file_path` - Path to the log file
/// * `level` - Minimum level written to both sinks
pub fn init_logger(log_file_path: &str, level: LevelFilter) -> Result<()> {
    let log_file = File::create(log_file_path).map_err(|e| anyhow::anyhow!("Failed to create log file: {}", e))?;

    CombinedLogger::init(vec![
        TermLogger::new(level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto),
        WriteLogger::new(level, Config::default(), log_file),
    ])
    .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}

/// Logs the effective configuration at application startup
pub fn log_startup_configuration() {
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("vidresolve {}", env!("CARGO_PKG_VERSION"));
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("YTDL_BIN: {}", config::YTDL_BIN.as_str());
    log::info!("WEB_PORT: {}", *config::WEB_PORT);
    log::info!("Extraction timeout: {}s", config::extraction::timeout().as_secs());

    match config::cache::ttl() {
        Some(ttl) => log::info!("Metadata cache: enabled, ttl {}s", ttl.as_secs()),
        None => log::warn!("Metadata cache: disabled (METADATA_CACHE_TTL_SECS=0)"),
    }

    if *config::cache::TTL_SECS > 3600 {
        log::warn!("Cached download links may expire before the cache entry does");
    }
}
