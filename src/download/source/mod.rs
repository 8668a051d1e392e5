//! Metadata source abstraction layer.
//!
//! Provides the `MediaSource` trait for pluggable metadata extractors. The
//! hosting process builds one source at startup and hands it to
//! [`ResolveService`](crate::download::service::ResolveService).
//!
//! Built-in backends:
//! - `YtDlpSource`: 1000+ sites via `yt-dlp -J`

pub mod ytdlp;

use crate::download::error::ExtractError;
use async_trait::async_trait;
use serde::Serialize;
use url::Url;

/// One encoded rendition of a video as reported by the extractor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawFormat {
    /// Vertical resolution in pixels, if known
    pub height: Option<u32>,
    /// Container / file extension (e.g. "mp4", "webm")
    pub container: String,
    /// Whether the rendition carries a video stream
    pub has_video: bool,
    /// Direct media URL; usually signed and time-limited
    pub url: String,
    /// Exact or approximate size in bytes
    pub size_bytes: Option<u64>,
}

/// Result of a single successful extraction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoMetadata {
    pub title: String,
    pub thumbnail_url: Option<String>,
    pub duration_seconds: Option<u64>,
    /// Formats in the order the extractor listed them
    pub formats: Vec<RawFormat>,
}

/// Trait for metadata extractor implementations.
#[async_trait]
pub trait MediaSource: Send + Sync {
    /// Human-readable name of this source (e.g., "yt-dlp")
    fn name(&self) -> &str;

    /// Fetch title, thumbnail, duration and the raw format list for the URL.
    async fn fetch_metadata(&self, url: &Url) -> Result<VideoMetadata, ExtractError>;
}
