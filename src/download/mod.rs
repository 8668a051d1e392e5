//! Extraction and format resolution

pub mod error;
pub mod formats;
pub mod service;
pub mod source;
pub mod ytdlp;
pub mod ytdlp_errors;

pub use error::ExtractError;
pub use formats::{enumerate_qualities, select_format};
pub use service::{Action, ResolveRequest, ResolveResponse, ResolveService, ResolvedDownload};
pub use source::{MediaSource, RawFormat, VideoMetadata};
