//! Error types surfaced by the magnifier.
//!
//! Load failures never escape the session: they are turned into the error
//! notification. The variants here are what binding and configuration return.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use crate::geometry::GeometryError;

/// Error returned by binding, configuration, and load handling.
#[derive(Debug, thiserror::Error)]
pub enum ZoomError {
    /// The high-resolution image could not be fetched or decoded.
    #[error("failed to load high resolution image: {reference}")]
    ResourceLoadFailure { reference: String },
    /// The loaded image could not be related to the preview (zero-sized preview).
    #[error("invalid scale ratio: {0}")]
    InvalidScaleRatio(#[from] GeometryError),
    /// Neither an explicit reference nor the source attribute was provided.
    #[error("no high resolution image reference given and `{attribute}` is not set")]
    MissingSourceReference { attribute: String },
    /// The bound target has no `<img>` to act as the preview.
    #[error("target contains no preview image")]
    MissingPreviewImage,
    /// The configuration object could not be parsed.
    #[error("invalid zoom configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),
    /// The widget was torn down and can no longer be re-initialized.
    #[error("zoom widget has been torn down")]
    TornDown,
    /// A browser call failed.
    #[error("dom error: {0}")]
    Dom(String),
}
