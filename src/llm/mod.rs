pub mod openai;
pub mod prompts;
pub mod schema;

use crate::error::Result;
use async_trait::async_trait;

pub use openai::OpenAiModel;
pub use schema::StructuredSchema;

/// A text model reachable through two call shapes: free text and
/// schema-constrained JSON
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Complete `prompt` and return the answer text
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Complete `prompt`, constraining the answer to JSON matching `schema`.
    /// Returns the raw JSON text; parsing is left to the caller.
    async fn complete_structured(&self, prompt: &str, schema: &StructuredSchema) -> Result<String>;
}
