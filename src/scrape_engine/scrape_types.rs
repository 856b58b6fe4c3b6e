//! Error type for scrape operations

use thiserror::Error;

/// Failure of a scrape step.
///
/// `Navigation` and `Browser` are transient and worth retrying. `Interaction`
/// means the expected element is not there, which retrying does not fix.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScrapeError {
    /// Page failed to load, timed out, or a click did not open a new page
    #[error("Navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    /// Expected element missing or not clickable
    #[error("Interaction failed: {0}")]
    Interaction(String),

    /// Browser process or CDP failure
    #[error("Browser error: {0}")]
    Browser(String),

    /// Another session holds the gate
    #[error("A scrape is already in progress")]
    Busy,

    #[error("Configuration error: {0}")]
    Config(String),

    /// Writing the persisted layout failed
    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Scrape error: {0}")]
    Other(String),
}

impl ScrapeError {
    pub fn navigation(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Navigation {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Whether another attempt of the same step may succeed
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Navigation { .. } | Self::Browser(_) | Self::Other(_))
    }
}

impl From<anyhow::Error> for ScrapeError {
    fn from(err: anyhow::Error) -> Self {
        // {:#} keeps the whole context chain
        Self::Other(format!("{err:#}"))
    }
}

impl From<std::io::Error> for ScrapeError {
    fn from(err: std::io::Error) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Convenience alias for Result with `ScrapeError`
pub type ScrapeResult<T> = Result<T, ScrapeError>;
