use crate::browser::{HttpFetcher, PageFetcher, Renderer, WebDriverRenderer};
use crate::config::ScraperConfig;
use crate::error::Result;
use crate::extraction::StructuredExtractor;
use crate::llm::{LanguageModel, OpenAiModel};
use crate::pagination::PaginationResolver;
use crate::pipeline::ContentPipeline;
use crate::results::Quote;
use crate::utils::normalize_url;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

/// Extracts quotes from a page and the pages that follow it
#[derive(Clone)]
pub struct QuoteExtractor {
    pipeline: ContentPipeline,
    extractor: StructuredExtractor,
    resolver: PaginationResolver,
    stop_on_revisit: bool,
}

impl QuoteExtractor {
    /// Wires the extractor from its three capabilities
    pub fn new(
        renderer: Arc<dyn Renderer>,
        fetcher: Arc<dyn PageFetcher>,
        model: Arc<dyn LanguageModel>,
        config: &ScraperConfig,
    ) -> Self {
        Self {
            pipeline: ContentPipeline::new(renderer.clone(), config.chunk_size),
            extractor: StructuredExtractor::new(model.clone())
                .with_concurrency(config.extraction_concurrency)
                .with_skip_failed_chunks(config.skip_failed_chunks),
            resolver: PaginationResolver::new(fetcher, renderer, model),
            stop_on_revisit: config.stop_on_revisit,
        }
    }

    /// Builds the WebDriver renderer, the HTTP fetcher and the model client
    /// described by `config`
    pub fn from_config(config: &ScraperConfig) -> Result<Self> {
        config.validate()?;

        let renderer = Arc::new(WebDriverRenderer::from_config(config));
        let fetcher = Arc::new(HttpFetcher::new(Duration::from_secs(config.page_timeout_secs))?);
        let model = Arc::new(OpenAiModel::from_config(&config.llm)?);

        Ok(Self::new(renderer, fetcher, model, config))
    }

    /// Extracts quotes from `url` and up to `max_pages - 1` following pages.
    ///
    /// Quotes are returned in page order. Pagination is only resolved when
    /// another page will be visited.
    pub async fn extract_quotes(&self, url: &str, max_pages: usize) -> Result<Vec<Quote>> {
        let mut quotes = Vec::new();
        let mut visited = HashSet::new();
        let mut current = url.to_string();
        let mut remaining = max_pages;

        while remaining > 0 {
            visited.insert(normalize_url(&current));

            ::log::info!("Starting to scrape url: {}", current);
            let chunks = self.pipeline.fetch_and_prepare(&current).await;

            ::log::info!("Passing content of {} to the model", current);
            let page = self.extractor.extract(&chunks).await?;
            ::log::info!("Found {} quotes on {}", page.len(), current);
            quotes.extend(page);

            remaining -= 1;
            if remaining == 0 {
                break;
            }

            let Some(next) = self.resolver.resolve_next(&current).await else {
                break;
            };

            if self.stop_on_revisit && visited.contains(&normalize_url(&next)) {
                ::log::info!("Pagination returned to {}, stopping", next);
                break;
            }
            current = next;
        }

        ::log::info!("Extracted {} quotes starting from {}", quotes.len(), url);
        Ok(quotes)
    }
}
