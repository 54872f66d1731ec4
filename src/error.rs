//! Error types shared across the crate.

use thiserror::Error;

/// Why a single prediction request did not produce a displayable body.
///
/// Every variant collapses to the same user-visible "Error" text; the
/// variants only exist so the diagnostic log says what went wrong.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Backend answered HTTP {status}")]
    Status { status: u16 },

    #[error("Invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),
}

#[derive(Debug, Error)]
pub enum UiError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Page error: {0}")]
    Page(String),

    #[error("No predict trigger bound for row {0}")]
    UnknownRow(String),

    #[error("Request failed: {0}")]
    Request(#[from] RequestError),

    #[error("Prediction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type UiResult<T> = Result<T, UiError>;
