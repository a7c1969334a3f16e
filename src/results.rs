use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One quote extracted from a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Quote {
    /// Name of the quoted author, as printed on the page
    pub author_name: String,

    /// Verbatim quote text
    pub quote: String,

    /// Tag labels attached to the quote, in page order
    pub tags: Vec<String>,
}

impl Quote {
    /// Create a new quote
    pub fn new(author_name: impl Into<String>, quote: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            author_name: author_name.into(),
            quote: quote.into(),
            tags,
        }
    }
}

/// Quotes found in a single chunk of page text, in discovery order.
///
/// This is also the structured-output shape requested from the model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct QuoteBatch {
    pub quotes: Vec<Quote>,
}

/// All quotes of one page, chunk batches concatenated in chunk order
pub type PageResult = Vec<Quote>;

/// Payload of a successful extraction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotesData {
    pub reviews_count: usize,
    pub reviews: Vec<Quote>,
}

/// Envelope returned by the HTTP endpoint and the `scrape` command.
///
/// Failures are reported in the body, never through the HTTP status.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuotesResponse {
    Success { success: bool, data: QuotesData },
    Failure { success: bool, error: String },
}

impl QuotesResponse {
    pub fn success(quotes: Vec<Quote>) -> Self {
        QuotesResponse::Success {
            success: true,
            data: QuotesData {
                reviews_count: quotes.len(),
                reviews: quotes,
            },
        }
    }

    pub fn failure(error: impl ToString) -> Self {
        QuotesResponse::Failure {
            success: false,
            error: error.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, QuotesResponse::Success { .. })
    }
}
