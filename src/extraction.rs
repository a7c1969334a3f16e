use crate::error::{Result, ScrapeError};
use crate::llm::{LanguageModel, StructuredSchema, prompts};
use crate::results::{PageResult, QuoteBatch};
use crate::utils::strip_code_fence;
use futures::StreamExt;
use std::sync::Arc;

/// Extracts quotes from text chunks through schema-constrained model calls
#[derive(Clone)]
pub struct StructuredExtractor {
    model: Arc<dyn LanguageModel>,
    schema: StructuredSchema,
    concurrency: usize,
    skip_failed_chunks: bool,
}

impl StructuredExtractor {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self {
            model,
            schema: StructuredSchema::for_type::<QuoteBatch>(),
            concurrency: 1,
            skip_failed_chunks: false,
        }
    }

    /// Maximum number of chunk calls in flight; results keep chunk order
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Log and drop chunks whose extraction fails instead of failing the page
    pub fn with_skip_failed_chunks(mut self, skip: bool) -> Self {
        self.skip_failed_chunks = skip;
        self
    }

    /// Extracts the quotes of every chunk, concatenated in chunk order
    pub async fn extract(&self, chunks: &[String]) -> Result<PageResult> {
        // Indices rather than borrowed items keep the future `Send` for axum
        let mut batches = futures::stream::iter(0..chunks.len())
            .map(|index| async move { (index, self.extract_chunk(&chunks[index]).await) })
            .buffered(self.concurrency);

        let mut quotes = PageResult::new();
        while let Some((index, result)) = batches.next().await {
            match result {
                Ok(batch) => {
                    ::log::debug!("Chunk {} yielded {} quotes", index, batch.quotes.len());
                    quotes.extend(batch.quotes);
                }
                Err(e) if self.skip_failed_chunks => {
                    ::log::warn!("Skipping chunk {} after extraction failure: {}", index, e);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(quotes)
    }

    async fn extract_chunk(&self, chunk: &str) -> Result<QuoteBatch> {
        let prompt = prompts::quote_extraction(&self.schema.to_pretty_string(), chunk);
        let raw = self.model.complete_structured(&prompt, &self.schema).await?;
        parse_batch(&raw)
    }
}

/// Parses a model answer into a batch, tolerating a surrounding code fence
pub fn parse_batch(raw: &str) -> Result<QuoteBatch> {
    serde_json::from_str(strip_code_fence(raw)).map_err(|e| ScrapeError::Parse(e.to_string()))
}
