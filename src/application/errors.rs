//! Application error types

use thiserror::Error;

/// Errors surfaced by the CRPT API client
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("CRPT API returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Invalid endpoint URL: {url}")]
    InvalidEndpoint { url: String },
}
