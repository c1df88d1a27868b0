use thiserror::Error;

/// Errors raised inside a single update's processing pipeline.
///
/// Every variant is caught at the dispatcher boundary, logged with full
/// detail, and mapped to one generic per-media-kind reply. None of them is
/// allowed to escape past the update that raised it.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Network failure, non-2xx response, or a remote file without a
    /// downloadable path.
    #[error("transport fetch failed: {0}")]
    TransportFetch(String),

    /// Malformed or unsupported audio/image payload.
    #[error("media decode failed: {0}")]
    Decode(String),

    /// Create/write/delete failure on the per-user partition.
    #[error("filesystem operation failed: {0}")]
    Filesystem(#[from] std::io::Error),

    /// The face detector model resource is missing or unreadable.
    #[error("face detector unavailable: {0}")]
    ClassifierUnavailable(String),
}

impl From<reqwest::Error> for PipelineError {
    fn from(e: reqwest::Error) -> Self {
        PipelineError::TransportFetch(e.to_string())
    }
}

impl From<image::ImageError> for PipelineError {
    fn from(e: image::ImageError) -> Self {
        PipelineError::Decode(e.to_string())
    }
}

impl From<symphonia::core::errors::Error> for PipelineError {
    fn from(e: symphonia::core::errors::Error) -> Self {
        PipelineError::Decode(e.to_string())
    }
}

impl From<hound::Error> for PipelineError {
    fn from(e: hound::Error) -> Self {
        match e {
            hound::Error::IoError(io) => PipelineError::Filesystem(io),
            other => PipelineError::Decode(other.to_string()),
        }
    }
}
