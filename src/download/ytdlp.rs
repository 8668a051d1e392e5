//! yt-dlp binary maintenance: version probe and self-update.
//!
//! The extractor binary is provisioned outside the service; at startup we
//! only check that it runs and, when asked, update it in place.

use crate::core::config;
use crate::core::error::{AppError, AppResult};
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

/// Runs `yt-dlp --version` and returns the reported version.
pub async fn check_extractor(ytdl_bin: &str) -> AppResult<String> {
    let limit = config::extraction::maintenance_timeout();
    let output = timeout(limit, Command::new(ytdl_bin).arg("--version").kill_on_drop(true).output())
        .await
        .map_err(|_| AppError::Timeout(limit))??;

    if !output.status.success() {
        return Err(AppError::Io(std::io::Error::other(format!(
            "{} --version exited with {:?}",
            ytdl_bin,
            output.status.code()
        ))));
    }

    let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
    log::info!("yt-dlp version: {}", version);
    Ok(version)
}

/// Updates yt-dlp via `yt-dlp -U`, falling back to pip for pip installs.
///
/// Failures are logged and swallowed; an outdated extractor still serves
/// most sites.
pub async fn update_extractor(ytdl_bin: &str) {
    log::info!("Checking for yt-dlp updates...");

    let update_result = timeout(
        config::extraction::maintenance_timeout(),
        Command::new(ytdl_bin).arg("-U").kill_on_drop(true).output(),
    )
    .await;

    match update_result {
        Ok(Ok(output)) if output.status.success() => {
            let stdout = String::from_utf8_lossy(&output.stdout);
            if stdout.contains("up to date") || stdout.contains("up-to-date") {
                log::info!("yt-dlp is already up to date");
            } else {
                log::info!("yt-dlp update check completed: {}", stdout.trim());
            }
        }
        // Exit code 100 means yt-dlp was installed via pip
        Ok(Ok(output)) if output.status.code() == Some(100) => {
            log::info!("yt-dlp is installed via pip. Attempting to update via pip...");
            update_via_pip().await;
        }
        Ok(Ok(output)) => {
            log::warn!(
                "yt-dlp update check failed (exit code: {:?}): {}",
                output.status.code(),
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(Err(e)) => log::warn!("Failed to run {} -U: {}", ytdl_bin, e),
        Err(_) => log::warn!("yt-dlp update timed out"),
    }
}

async fn update_via_pip() {
    let mut last_error: Option<String> = None;

    for pip_cmd in ["pip3", "pip"] {
        log::debug!("Trying to update yt-dlp via {}...", pip_cmd);

        let result = timeout(
            Duration::from_secs(60),
            Command::new(pip_cmd)
                .args(["install", "--upgrade", "yt-dlp"])
                .kill_on_drop(true)
                .output(),
        )
        .await;

        match result {
            Ok(Ok(output)) if output.status.success() => {
                log::info!("yt-dlp updated successfully via {}", pip_cmd);
                return;
            }
            Ok(Ok(output)) => {
                last_error = Some(format!(
                    "{} failed with exit code {:?}: {}",
                    pip_cmd,
                    output.status.code(),
                    String::from_utf8_lossy(&output.stderr).trim()
                ));
            }
            Ok(Err(e)) => last_error = Some(format!("{} could not be executed: {}", pip_cmd, e)),
            Err(_) => last_error = Some(format!("{} update timed out after 60 seconds", pip_cmd)),
        }
    }

    log::warn!(
        "Failed to update yt-dlp via pip/pip3. Last error: {}. Run 'pip install --upgrade yt-dlp' manually.",
        last_error.unwrap_or_default()
    );
}
