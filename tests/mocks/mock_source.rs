//! Mock metadata source
//!
//! Returns canned extraction results, optionally after a delay, and counts
//! how often it was asked.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use url::Url;
use vidresolve::download::error::ExtractError;
use vidresolve::download::source::{MediaSource, RawFormat, VideoMetadata};

pub struct MockSource {
    result: Result<VideoMetadata, ExtractError>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockSource {
    /// Source that reports the given formats for every URL
    pub fn with_formats(formats: Vec<RawFormat>) -> Self {
        Self {
            result: Ok(VideoMetadata {
                title: "Big Buck Bunny".to_string(),
                thumbnail_url: Some("https://i.example.com/bbb.jpg".to_string()),
                duration_seconds: Some(596),
                formats,
            }),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Source that fails every call
    pub fn failing(err: ExtractError) -> Self {
        Self {
            result: Err(err),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Delay every answer
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaSource for MockSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_metadata(&self, _url: &Url) -> Result<VideoMetadata, ExtractError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.result.clone()
    }
}

/// Video-carrying mp4 format at the given height
pub fn mp4(height: u32) -> RawFormat {
    RawFormat {
        height: Some(height),
        container: "mp4".to_string(),
        has_video: true,
        url: format!("https://cdn.example.com/bbb-{}.mp4", height),
        size_bytes: Some(u64::from(height) * 100_000),
    }
}
