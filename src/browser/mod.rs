pub mod fetch;
pub mod webdriver;

use crate::error::Result;
use async_trait::async_trait;

pub use fetch::HttpFetcher;
pub use webdriver::WebDriverRenderer;

/// A browser able to load pages with scripts executed
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Load `url` and return the final HTML
    async fn render(&self, url: &str) -> Result<String>;

    /// Load `url`, click the first element matching the CSS `selector` and
    /// return the URL the browser ends up on
    async fn navigate(&self, url: &str, selector: &str) -> Result<String>;
}

/// Plain HTTP GET without script execution
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Return the raw body of `url`
    async fn fetch(&self, url: &str) -> Result<String>;
}
