//! Extracts quotes from paginated websites.
//!
//! Pages are rendered in a WebDriver-controlled browser, reduced to text
//! chunks and handed to a language model for structured extraction. The same
//! model picks the page's pagination control, which is then clicked to reach
//! the next page.

pub mod browser;
pub mod config;
pub mod error;
pub mod extraction;
pub mod llm;
pub mod orchestrator;
pub mod pagination;
pub mod parsers;
pub mod pipeline;
pub mod results;
pub mod server;
pub mod utils;

#[cfg(test)]
mod testing;

// Re-export commonly used types for convenience
pub use config::{LlmConfig, ScraperConfig};
pub use error::{Result, ScrapeError};
pub use orchestrator::QuoteExtractor;
pub use results::{Quote, QuoteBatch, QuotesResponse};
