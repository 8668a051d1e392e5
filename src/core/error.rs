use std::time::Duration;
use thiserror::Error;

use crate::core::validation::ValidationError;
use crate::download::error::ExtractError;

/// Centralized error types for the application
///
/// Every failure of a resolve request ends up as one of these variants, which
/// the HTTP boundary turns into a status code and a stable user message.
///
/// # Example
///
/// ```
/// use vidresolve::core::error::AppError;
///
/// let err = AppError::InvalidInput("URL is required".to_string());
/// assert_eq!(err.status_code(), 400);
/// assert_eq!(err.user_message(), "URL is required");
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// Missing or malformed request input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Video is private, removed or otherwise unavailable
    #[error("Video unavailable: {0}")]
    VideoUnavailable(String),

    /// No format at or below the requested quality ceiling
    #[error("No format with height <= {ceiling}")]
    NoMatchingFormat { ceiling: u32 },

    /// Extractor exceeded its time budget
    #[error("Extraction timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// Any other extractor failure
    #[error("Extraction failed: {0}")]
    ExtractionFailure(ExtractError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

impl From<ExtractError> for AppError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::VideoUnavailable(msg) => AppError::VideoUnavailable(msg),
            ExtractError::NoIdentifier(msg) => {
                log::debug!("Extractor found no video id: {}", msg);
                AppError::InvalidInput("Invalid video URL".to_string())
            }
            other => AppError::ExtractionFailure(other),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}

impl AppError {
    /// HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::InvalidInput(_) => 400,
            AppError::VideoUnavailable(_) | AppError::NoMatchingFormat { .. } => 404,
            AppError::Timeout(_) => 408,
            AppError::ExtractionFailure(_) | AppError::Io(_) => 500,
        }
    }

    /// Stable, user-readable message for the response body
    pub fn user_message(&self) -> String {
        match self {
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::VideoUnavailable(_) => "Video is unavailable or private".to_string(),
            AppError::NoMatchingFormat { .. } => "No suitable format found for the requested quality".to_string(),
            AppError::Timeout(_) => "Video extraction timed out. Please try again.".to_string(),
            AppError::ExtractionFailure(_) | AppError::Io(_) => {
                "Failed to process video. Please check the URL and try again.".to_string()
            }
        }
    }

    /// Short label for metrics
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "invalid_input",
            AppError::VideoUnavailable(_) => "video_unavailable",
            AppError::NoMatchingFormat { .. } => "no_matching_format",
            AppError::Timeout(_) => "timeout",
            AppError::ExtractionFailure(_) => "extraction_failure",
            AppError::Io(_) => "io",
        }
    }

    /// Whether the failure is caused by the request rather than the service
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}
