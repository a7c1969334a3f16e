use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Errors raised while scraping and extracting quotes
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Invalid or missing configuration (API key, chunk size, config file)
    #[error("Configuration error: {0}")]
    Config(String),

    /// WebDriver session could not be created or a browser command failed
    #[error("WebDriver error: {0}")]
    WebDriver(String),

    /// Plain HTTP fetch failed
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Model endpoint could not be reached
    #[error("Model network error: {0}")]
    ModelNetwork(String),

    /// Model endpoint answered with an error or an empty completion
    #[error("Model API error: {0}")]
    ModelApi(String),

    /// Model output did not match the expected schema
    #[error("Failed to parse model output: {0}")]
    Parse(String),

    /// A render or navigation call exceeded its time budget
    #[error("Timed out after {0} seconds")]
    Timeout(u64),
}

impl From<fantoccini::error::CmdError> for ScrapeError {
    fn from(e: fantoccini::error::CmdError) -> Self {
        ScrapeError::WebDriver(e.to_string())
    }
}

impl From<fantoccini::error::NewSessionError> for ScrapeError {
    fn from(e: fantoccini::error::NewSessionError) -> Self {
        ScrapeError::WebDriver(e.to_string())
    }
}
