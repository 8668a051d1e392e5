use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

/// Configuration constants for the resolver service
/// Cached yt-dlp binary path
/// Read once at startup from YTDL_BIN environment variable or defaults to "yt-dlp"
pub static YTDL_BIN: Lazy<String> = Lazy::new(|| env::var("YTDL_BIN").unwrap_or_else(|_| "yt-dlp".to_string()));

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Default: vidresolve.log
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "vidresolve.log".to_string()));

/// Port of the public HTTP API
/// Read from WEB_PORT environment variable
/// Default: 3000
pub static WEB_PORT: Lazy<u16> = Lazy::new(|| {
    env::var("WEB_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000)
});

/// Extraction configuration
pub mod extraction {
    use super::{env, Duration, Lazy};

    /// Default upper bound for a single yt-dlp metadata call (in seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Timeout for one extraction call
    /// Read from EXTRACTION_TIMEOUT_SECS environment variable
    pub static TIMEOUT_SECS: Lazy<u64> = Lazy::new(|| {
        env::var("EXTRACTION_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|secs: &u64| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS)
    });

    /// Extraction timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(*TIMEOUT_SECS)
    }

    /// Timeout for `yt-dlp --version` and `yt-dlp -U` at startup
    pub const MAINTENANCE_TIMEOUT_SECS: u64 = 30;

    /// Maintenance command timeout duration
    pub fn maintenance_timeout() -> Duration {
        Duration::from_secs(MAINTENANCE_TIMEOUT_SECS)
    }
}

/// Metadata cache configuration
pub mod cache {
    use super::{env, Duration, Lazy};

    /// Direct media URLs handed out by most sites expire after a few hours,
    /// so extraction results are only kept for a short while.
    pub const DEFAULT_TTL_SECS: u64 = 300;

    /// Cache entry lifetime
    /// Read from METADATA_CACHE_TTL_SECS environment variable
    /// Set to 0 to disable caching
    pub static TTL_SECS: Lazy<u64> = Lazy::new(|| {
        env::var("METADATA_CACHE_TTL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TTL_SECS)
    });

    /// Cache TTL duration, `None` when caching is disabled
    pub fn ttl() -> Option<Duration> {
        match *TTL_SECS {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Interval between sweeps of expired entries (in seconds)
    pub const CLEANUP_INTERVAL_SECS: u64 = 60;

    /// Cleanup interval duration
    pub fn cleanup_interval() -> Duration {
        Duration::from_secs(CLEANUP_INTERVAL_SECS)
    }
}

/// Request defaults
pub mod request {
    /// Quality ceiling used when the client does not send one
    pub const DEFAULT_QUALITY: &str = "720";
}
