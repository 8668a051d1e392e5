//! YtDlpSource: metadata extraction powered by yt-dlp.
//!
//! Runs `yt-dlp -J` for a single URL and decodes the info JSON into
//! [`VideoMetadata`]. Failures are classified by
//! [`ytdlp_errors`](crate::download::ytdlp_errors).

use crate::download::error::ExtractError;
use crate::download::source::{MediaSource, RawFormat, VideoMetadata};
use crate::download::ytdlp_errors::to_extract_error;
use async_trait::async_trait;
use serde::Deserialize;
use std::process::Stdio;
use tokio::process::Command;
use url::Url;

/// Subset of the yt-dlp info JSON that the resolver needs.
#[derive(Debug, Deserialize)]
struct YtDlpInfo {
    title: Option<String>,
    thumbnail: Option<String>,
    duration: Option<f64>,
    #[serde(default)]
    formats: Vec<YtDlpFormat>,
}

#[derive(Debug, Deserialize)]
struct YtDlpFormat {
    url: Option<String>,
    ext: Option<String>,
    height: Option<f64>,
    vcodec: Option<String>,
    filesize: Option<f64>,
    filesize_approx: Option<f64>,
}

impl YtDlpFormat {
    fn into_raw(self) -> Option<RawFormat> {
        let url = self.url.filter(|u| !u.is_empty())?;
        let has_video = match self.vcodec.as_deref() {
            Some("none") => false,
            Some(_) => true,
            // Some extractors omit vcodec entirely; a height still implies video
            None => self.height.is_some(),
        };
        Some(RawFormat {
            height: self.height.and_then(non_negative).and_then(|h| u32::try_from(h).ok()),
            container: self.ext.unwrap_or_default(),
            has_video,
            url,
            size_bytes: self.filesize.or(self.filesize_approx).and_then(non_negative),
        })
    }
}

fn non_negative(value: f64) -> Option<u64> {
    if value.is_finite() && value >= 0.0 {
        Some(value.round() as u64)
    } else {
        None
    }
}

/// Decodes the stdout of `yt-dlp -J` into [`VideoMetadata`].
pub fn parse_info_json(json: &str) -> Result<VideoMetadata, ExtractError> {
    let info: YtDlpInfo = serde_json::from_str(json)?;
    Ok(VideoMetadata {
        title: info.title.unwrap_or_else(|| "Untitled".to_string()),
        thumbnail_url: info.thumbnail.filter(|t| !t.is_empty()),
        duration_seconds: info.duration.and_then(non_negative),
        formats: info.formats.into_iter().filter_map(YtDlpFormat::into_raw).collect(),
    })
}

/// Metadata source backed by the yt-dlp binary.
pub struct YtDlpSource {
    ytdl_bin: String,
}

impl Default for YtDlpSource {
    fn default() -> Self {
        Self::new(crate::core::config::YTDL_BIN.as_str())
    }
}

impl YtDlpSource {
    pub fn new(ytdl_bin: impl Into<String>) -> Self {
        Self {
            ytdl_bin: ytdl_bin.into(),
        }
    }

    /// Path of the binary this source invokes.
    pub fn binary(&self) -> &str {
        &self.ytdl_bin
    }

    fn build_command(&self, url: &Url) -> Command {
        let mut cmd = Command::new(&self.ytdl_bin);
        cmd.args(["-J", "--no-playlist", "--no-warnings", "--no-progress"])
            .arg(url.as_str())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // The caller enforces the timeout by dropping this future
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl MediaSource for YtDlpSource {
    fn name(&self) -> &str {
        "yt-dlp"
    }

    async fn fetch_metadata(&self, url: &Url) -> Result<VideoMetadata, ExtractError> {
        log::debug!("Running {} -J for {}", self.ytdl_bin, url);
        let output = self.build_command(url).output().await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            log::debug!(
                "yt-dlp exited with {:?} for {}: {}",
                output.status.code(),
                url,
                stderr.trim()
            );
            return Err(to_extract_error(&stderr));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_info_json(&stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "id": "abc",
        "title": "Sample clip",
        "thumbnail": "https://i.example.com/abc.jpg",
        "duration": 212.6,
        "formats": [
            {"format_id": "140", "ext": "m4a", "vcodec": "none", "acodec": "mp4a.40.2",
             "url": "https://cdn.example.com/a", "filesize": 3400000},
            {"format_id": "18", "ext": "mp4", "height": 360, "vcodec": "avc1.42001E",
             "url": "https://cdn.example.com/360", "filesize_approx": 9000000.4},
            {"format_id": "22", "ext": "mp4", "height": 720, "vcodec": "avc1.64001F",
             "url": "https://cdn.example.com/720"},
            {"format_id": "sb0", "ext": "mhtml", "vcodec": "none", "height": 90},
            {"format_id": "hls", "ext": "mp4", "height": 1080, "url": "https://cdn.example.com/1080"}
        ]
    }"#;

    #[test]
    fn test_parse_info_json_maps_fields() {
        let meta = parse_info_json(SAMPLE).unwrap();
        assert_eq!(meta.title, "Sample clip");
        assert_eq!(meta.thumbnail_url.as_deref(), Some("https://i.example.com/abc.jpg"));
        assert_eq!(meta.duration_seconds, Some(213));
        // storyboard without url is dropped
        assert_eq!(meta.formats.len(), 4);
    }

    #[test]
    fn test_parse_info_json_video_flags() {
        let meta = parse_info_json(SAMPLE).unwrap();
        let audio = &meta.formats[0];
        assert!(!audio.has_video);
        assert_eq!(audio.height, None);
        assert_eq!(audio.size_bytes, Some(3_400_000));

        let sd = &meta.formats[1];
        assert!(sd.has_video);
        assert_eq!(sd.height, Some(360));
        assert_eq!(sd.size_bytes, Some(9_000_000));

        // missing vcodec with a height counts as video
        let hls = &meta.formats[3];
        assert!(hls.has_video);
        assert_eq!(hls.height, Some(1080));
        assert_eq!(hls.size_bytes, None);
    }

    #[test]
    fn test_parse_info_json_minimal() {
        let meta = parse_info_json(r#"{"title": "x"}"#).unwrap();
        assert_eq!(meta.title, "x");
        assert!(meta.formats.is_empty());
        assert_eq!(meta.thumbnail_url, None);
        assert_eq!(meta.duration_seconds, None);
    }

    #[test]
    fn test_parse_info_json_invalid() {
        let err = parse_info_json("WARNING: not json").unwrap_err();
        assert!(matches!(err, ExtractError::Parse(_)));
    }

    #[tokio::test]
    async fn test_missing_binary_is_process_error() {
        let source = YtDlpSource::new("/nonexistent/yt-dlp-binary");
        let url = Url::parse("https://www.youtube.com/watch?v=abc").unwrap();
        let err = source.fetch_metadata(&url).await.unwrap_err();
        assert!(matches!(err, ExtractError::Process(_)));
    }
}
