use std::path::PathBuf;
use thiserror::Error;

/// The primary error type for the photo-locator crate.
///
/// Every variant is terminal for a single pipeline run; none of them is fatal to the
/// application, which returns to waiting for the next photo.
#[derive(Error, Debug)]
pub enum PhotoLocatorError {
    #[error("{} could not be read as an image", .path.display())]
    NotAnImage { path: PathBuf },

    #[error("Unsupported image format {mime} for {}, only JPEG photos are accepted", .path.display())]
    UnsupportedFormat { path: PathBuf, mime: String },

    #[error("Metadata tool {} was not found, is exiftool installed?", .tool.display())]
    ToolNotFound { tool: PathBuf },

    #[error("Metadata extraction failed: {reason}")]
    ExtractionFailed { reason: String },

    #[error("Metadata tool output is not valid UTF-8")]
    DecodeError(#[from] std::string::FromUtf8Error),

    #[error("No GPS coordinates found in the photo metadata")]
    NoGpsData,

    #[error("Coordinates out of range: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    #[error("Reverse geocoding request failed")]
    NetworkError(#[source] reqwest::Error),

    #[error("Reverse geocoding response could not be parsed")]
    ResponseParseError(#[source] serde_json::Error),

    // --- Construction Errors ---
    #[error("HTTP client could not be built")]
    HttpClient(#[source] reqwest::Error),
}

impl PhotoLocatorError {
    /// Stable machine-readable name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotAnImage { .. } => "NotAnImage",
            Self::UnsupportedFormat { .. } => "UnsupportedFormat",
            Self::ToolNotFound { .. } => "ToolNotFound",
            Self::ExtractionFailed { .. } => "ExtractionFailed",
            Self::DecodeError(_) => "DecodeError",
            Self::NoGpsData => "NoGpsData",
            Self::InvalidCoordinates { .. } => "InvalidCoordinates",
            Self::NetworkError(_) => "NetworkError",
            Self::ResponseParseError(_) => "ResponseParseError",
            Self::HttpClient(_) => "HttpClient",
        }
    }
}
