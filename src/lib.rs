//! vidresolve - resolves video page URLs into metadata and direct download links
//!
//! Extraction is delegated to yt-dlp; this crate decides which of the
//! reported formats to hand out for a requested quality ceiling.
//!
//! # Module Structure
//!
//! - `core`: configuration, errors, logging, metrics and the HTTP API
//! - `download`: extractor adapters, format resolution and the request service
//! - `cache`: short-lived cache of extraction results

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod cache;
pub mod cli;
pub mod core;
pub mod download;

// Re-export commonly used types for convenience
pub use crate::core::{config, AppError, AppResult};
pub use cache::MetadataCache;
pub use download::{ResolveRequest, ResolveResponse, ResolveService};
