use crate::browser::Renderer;
use crate::parsers::Parser;
use std::sync::Arc;

/// Prefix of the chunk returned in place of page content when rendering fails
pub const RENDER_ERROR_PREFIX: &str = "Connection error";

/// Renders a page and reduces it to model-sized text chunks
#[derive(Clone)]
pub struct ContentPipeline {
    renderer: Arc<dyn Renderer>,
    chunk_size: usize,
}

impl ContentPipeline {
    pub fn new(renderer: Arc<dyn Renderer>, chunk_size: usize) -> Self {
        Self {
            renderer,
            chunk_size,
        }
    }

    /// Renders `url` and returns its visible body text in chunks.
    ///
    /// A render failure does not raise: the result is a single diagnostic
    /// chunk describing the error.
    pub async fn fetch_and_prepare(&self, url: &str) -> Vec<String> {
        match self.renderer.render(url).await {
            Ok(html) => {
                let chunks = Parser::page_chunks(&html, self.chunk_size);
                ::log::info!("Prepared {} chunks from {}", chunks.len(), url);
                chunks
            }
            Err(e) => {
                ::log::warn!("Failed to render {}: {}", url, e);
                vec![format!("{}: {}", RENDER_ERROR_PREFIX, e)]
            }
        }
    }
}
