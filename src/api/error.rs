//! Error types for the analysis backend client.
//!
//! [`ApiError`] covers the three failure scenarios the client distinguishes:
//! an unknown job id, any other HTTP error status, and a network-layer
//! failure. `thiserror` derives `Display` and `Error` from the
//! `#[error(...)]` attributes.

use thiserror::Error;

/// Errors returned by [`AnalysisClient`](super::AnalysisClient) calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend reported HTTP 404 for the requested job.
    /// Carries the server's detail message when one was supplied.
    #[error("not found: {0}")]
    NotFound(String),

    /// Any other HTTP error status (e.g. 422 bad payload, 500 engine crash).
    /// Contains the status code and the error message from the response body.
    #[error("API error (status {status}): {message}")]
    Status { status: u16, message: String },

    /// Underlying network failure (DNS, connection refused, timeout) or a
    /// body that could not be decoded. Wraps the original `reqwest` error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl ApiError {
    /// The server-supplied detail for this error, when one exists.
    pub fn server_detail(&self) -> Option<&str> {
        match self {
            ApiError::NotFound(detail) | ApiError::Status { message: detail, .. }
                if !detail.is_empty() =>
            {
                Some(detail)
            }
            _ => None,
        }
    }
}
