//! Error types for fetching and rendering a news page.
//!
//! Only two of these ever reach the page: [`FrontError::Network`] and
//! [`FrontError::InvalidPayload`]. Both are caught by the page controller and
//! shown inline as "Error loading data.". The rest surface from the
//! command-line entry point (bad template, unwritable output, bad config).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrontError {
    /// The request failed, the server answered non-2xx, or the body was not JSON.
    #[error("Network response was not ok: {0}")]
    Network(String),

    /// The response decoded but its shape was not a list or a page payload.
    #[error("{0}")]
    InvalidPayload(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl From<reqwest::Error> for FrontError {
    fn from(e: reqwest::Error) -> Self {
        FrontError::Network(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FrontError>;
