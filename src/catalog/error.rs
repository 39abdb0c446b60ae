//! Failure reasons for catalog and community-metadata requests.
//!
//! These never leave the [`CatalogClient`](super::CatalogClient) facade; they
//! exist so the reason behind an absent result can be logged and asserted.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed payload: {0}")]
    Decode(String),

    #[error("Provider error {code}: {message}")]
    Api { code: i64, message: String },

    #[error("Token request failed: {0}")]
    Token(String),
}

impl FetchError {
    /// Whether the provider reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound(_))
    }
}

pub type FetchResult<T> = Result<T, FetchError>;
