//! Resolve requests: validate, extract, pick a format, build the response.
//!
//! [`ResolveService`] owns no global state. The hosting process injects the
//! [`MediaSource`] and, optionally, a [`MetadataCache`].

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

use crate::cache::MetadataCache;
use crate::core::config;
use crate::core::error::{AppError, AppResult};
use crate::core::metrics;
use crate::core::validation::validate_media_url;
use crate::download::formats::{enumerate_qualities, parse_quality, select_format};
use crate::download::source::{MediaSource, VideoMetadata};

/// What the client wants back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Title, thumbnail, duration and the quality menu
    Metadata,
    /// Direct link of the best format under the quality ceiling
    #[default]
    Download,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Metadata => "metadata",
            Action::Download => "download",
        }
    }
}

/// Requested quality; clients send either `"720"` or `720`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum QualityInput {
    Text(String),
    Number(u32),
}

impl QualityInput {
    fn ceiling(&self) -> Option<u32> {
        match self {
            QualityInput::Text(text) => parse_quality(text),
            QualityInput::Number(n) => Some(*n),
        }
    }
}

/// Body of a resolve request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResolveRequest {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub quality: Option<QualityInput>,
    #[serde(default)]
    pub action: Option<Action>,
}

impl ResolveRequest {
    pub fn download(url: impl Into<String>, quality: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            quality: Some(QualityInput::Text(quality.into())),
            action: Some(Action::Download),
        }
    }

    pub fn metadata(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            quality: None,
            action: Some(Action::Metadata),
        }
    }
}

/// Response to a `metadata` request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataResponse {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    pub available_qualities: Vec<String>,
}

/// Selected format plus descriptive metadata, handed to the client.
///
/// `url` is the upstream media URL and may stop working after a while.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedDownload {
    #[serde(rename = "downloadUrl")]
    pub url: String,
    pub title: String,
    #[serde(rename = "thumbnail", skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(rename = "duration", skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u64>,
    #[serde(rename = "filesize", skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    #[serde(rename = "format")]
    pub container: String,
}

/// Successful resolve result
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResolveResponse {
    Metadata(MetadataResponse),
    Download(ResolvedDownload),
}

/// Request handler for resolve requests.
pub struct ResolveService {
    source: Arc<dyn MediaSource>,
    cache: Option<Arc<MetadataCache>>,
    extraction_timeout: Duration,
}

impl ResolveService {
    pub fn new(source: Arc<dyn MediaSource>) -> Self {
        Self {
            source,
            cache: None,
            extraction_timeout: Duration::from_secs(config::extraction::DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Upper bound for one extractor call
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.extraction_timeout = timeout;
        self
    }

    /// Reuse extraction results for repeated URLs
    pub fn with_cache(mut self, cache: Arc<MetadataCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    pub fn cache(&self) -> Option<&Arc<MetadataCache>> {
        self.cache.as_ref()
    }

    /// Runs one request through validation, extraction and format resolution.
    pub async fn handle(&self, request: ResolveRequest) -> AppResult<ResolveResponse> {
        let url = validate_media_url(request.url.as_deref())?;
        let action = request.action.unwrap_or_default();
        metrics::record_request(action.as_str());

        match action {
            Action::Metadata => self.metadata(&url).await.map(ResolveResponse::Metadata),
            Action::Download => {
                let ceiling = match &request.quality {
                    Some(quality) => quality
                        .ceiling()
                        .ok_or_else(|| AppError::InvalidInput("Invalid quality".to_string()))?,
                    None => parse_quality(config::request::DEFAULT_QUALITY).unwrap_or(720),
                };
                self.download(&url, ceiling).await.map(ResolveResponse::Download)
            }
        }
    }

    /// Title, thumbnail, duration and the quality menu for `url`.
    pub async fn metadata(&self, url: &Url) -> AppResult<MetadataResponse> {
        let metadata = self.extract(url).await?;
        Ok(MetadataResponse {
            title: metadata.title.clone(),
            thumbnail: metadata.thumbnail_url.clone(),
            duration: metadata.duration_seconds,
            available_qualities: enumerate_qualities(&metadata.formats),
        })
    }

    /// Best format of `url` whose height does not exceed `ceiling`.
    pub async fn download(&self, url: &Url, ceiling: u32) -> AppResult<ResolvedDownload> {
        let metadata = self.extract(url).await?;
        let format = select_format(&metadata.formats, ceiling).ok_or(AppError::NoMatchingFormat { ceiling })?;

        log::info!(
            "Resolved {} at <= {}p: {}p {} ({} formats listed)",
            url,
            ceiling,
            format.height.unwrap_or_default(),
            format.container,
            metadata.formats.len()
        );

        Ok(ResolvedDownload {
            url: format.url.clone(),
            title: metadata.title.clone(),
            thumbnail_url: metadata.thumbnail_url.clone(),
            duration_seconds: metadata.duration_seconds,
            size_bytes: format.size_bytes,
            container: format.container.clone(),
        })
    }

    async fn extract(&self, url: &Url) -> AppResult<Arc<VideoMetadata>> {
        if let Some(cache) = &self.cache {
            let cached = cache.get(url).await;
            metrics::record_cache_lookup(cached.is_some());
            if let Some(metadata) = cached {
                log::debug!("Metadata cache hit for {}", url);
                return Ok(metadata);
            }
        }

        let source = self.source.name();
        let started = Instant::now();
        let result = tokio::time::timeout(self.extraction_timeout, self.source.fetch_metadata(url)).await;
        let elapsed = started.elapsed().as_secs_f64();

        let metadata = match result {
            Ok(Ok(metadata)) => {
                metrics::record_extraction(source, "ok", elapsed);
                Arc::new(metadata)
            }
            Ok(Err(e)) => {
                metrics::record_extraction(source, "error", elapsed);
                log::warn!("{} failed for {} ({}): {}", source, url, e.subcategory(), e);
                return Err(e.into());
            }
            Err(_) => {
                metrics::record_extraction(source, "timeout", elapsed);
                log::warn!(
                    "{} timed out for {} after {}s",
                    source,
                    url,
                    self.extraction_timeout.as_secs()
                );
                return Err(AppError::Timeout(self.extraction_timeout));
            }
        };

        if let Some(cache) = &self.cache {
            cache.insert(url, Arc::clone(&metadata)).await;
        }
        Ok(metadata)
    }
}
