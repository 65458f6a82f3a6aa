use thiserror::Error;

/// Errors produced while extracting navigation markup or talking to the host shell
#[derive(Debug, Error)]
pub enum NavError {
    #[error("Failed to parse page: {0}")]
    DomParseFailed(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Element is no longer attached: {0}")]
    StaleElement(String),

    #[error("Invalid navigation type: {0}")]
    InvalidNavigation(String),

    /// Failure payload reported by the native host, passed through verbatim
    #[error("{0}")]
    Host(String),

    #[error("Bridge transport failed: {0}")]
    Transport(String),

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    #[error("Failed to connect to browser: {0}")]
    ConnectionFailed(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),
}

pub type Result<T> = std::result::Result<T, NavError>;
