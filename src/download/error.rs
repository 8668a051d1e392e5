use std::fmt;

/// Structured error type returned by metadata extractors.
///
/// Callers branch on the variant, never on the message text.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractError {
    /// Video is private, removed or region-blocked
    VideoUnavailable(String),
    /// The extractor found no recognizable video identifier in the URL
    NoIdentifier(String),
    /// The extractor process could not be spawned or exited abnormally
    Process(String),
    /// The extractor produced output that could not be decoded
    Parse(String),
    /// Catch-all for uncategorized failures
    Other(String),
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ExtractError {}

impl ExtractError {
    /// Returns subcategory for metrics and logs
    pub fn subcategory(&self) -> &'static str {
        match self {
            ExtractError::VideoUnavailable(_) => "video_unavailable",
            ExtractError::NoIdentifier(_) => "no_identifier",
            ExtractError::Process(_) => "process",
            ExtractError::Parse(_) => "parse",
            ExtractError::Other(_) => "other",
        }
    }

    /// Returns the inner message
    pub fn message(&self) -> &str {
        match self {
            ExtractError::VideoUnavailable(msg)
            | ExtractError::NoIdentifier(msg)
            | ExtractError::Process(msg)
            | ExtractError::Parse(msg)
            | ExtractError::Other(msg) => msg,
        }
    }
}

impl From<serde_json::Error> for ExtractError {
    fn from(err: serde_json::Error) -> Self {
        ExtractError::Parse(format!("invalid extractor output: {}", err))
    }
}

impl From<std::io::Error> for ExtractError {
    fn from(err: std::io::Error) -> Self {
        ExtractError::Process(format!("failed to run extractor: {}", err))
    }
}
