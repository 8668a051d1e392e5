//! Classification of yt-dlp failures.
//!
//! yt-dlp reports every problem as free text on stderr. This module is the
//! only place that reads that text; everything above it works with
//! [`ExtractError`] variants.

use crate::download::error::ExtractError;

/// yt-dlp error types
#[derive(Debug, Clone, PartialEq)]
pub enum YtDlpErrorType {
    /// Video is unavailable (private, removed, region restrictions)
    VideoUnavailable,
    /// URL carries no video id, or no extractor claims it
    NoIdentifier,
    /// Network problems (timeouts, connection resets)
    NetworkError,
    /// Unknown error
    Unknown,
}

/// Analyzes yt-dlp stderr and determines the error type
pub fn analyze_ytdlp_error(stderr: &str) -> YtDlpErrorType {
    let stderr_lower = stderr.to_lowercase();

    if stderr_lower.contains("private video")
        || stderr_lower.contains("video unavailable")
        || stderr_lower.contains("this video is not available")
        || stderr_lower.contains("video is private")
        || stderr_lower.contains("video has been removed")
        || stderr_lower.contains("this video does not exist")
        || stderr_lower.contains("video is not available")
    {
        return YtDlpErrorType::VideoUnavailable;
    }

    if stderr_lower.contains("no video id found")
        || stderr_lower.contains("unsupported url")
        || stderr_lower.contains("is not a valid url")
        || stderr_lower.contains("incomplete youtube id")
    {
        return YtDlpErrorType::NoIdentifier;
    }

    if stderr_lower.contains("timed out")
        || stderr_lower.contains("connection")
        || stderr_lower.contains("network")
        || stderr_lower.contains("failed to resolve")
        || stderr_lower.contains("temporary failure in name resolution")
    {
        return YtDlpErrorType::NetworkError;
    }

    YtDlpErrorType::Unknown
}

/// Returns the last `ERROR:` line of yt-dlp stderr, or the last non-empty line.
pub fn extract_error_line(stderr: &str) -> String {
    let lines: Vec<&str> = stderr.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    lines
        .iter()
        .rev()
        .find(|l| l.starts_with("ERROR:"))
        .or_else(|| lines.last())
        .map(|l| l.to_string())
        .unwrap_or_else(|| "yt-dlp exited without an error message".to_string())
}

/// Maps a failed yt-dlp run to a structured extractor error.
pub fn to_extract_error(stderr: &str) -> ExtractError {
    let line = extract_error_line(stderr);
    match analyze_ytdlp_error(stderr) {
        YtDlpErrorType::VideoUnavailable => ExtractError::VideoUnavailable(line),
        YtDlpErrorType::NoIdentifier => ExtractError::NoIdentifier(line),
        YtDlpErrorType::NetworkError => ExtractError::Process(format!("network error: {}", line)),
        YtDlpErrorType::Unknown => ExtractError::Other(line),
    }
}
