use crate::error::{Result, ScrapeError};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Configuration for the model endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible API
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,

    /// Model name sent with every request
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// API key; usually supplied through `OPENAI_API_KEY`
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// Sampling temperature
    #[serde(default)]
    pub temperature: f32,

    /// Per-request timeout in seconds
    #[serde(default = "default_llm_timeout_secs")]
    pub timeout_secs: u64,
}

/// Configuration for the quote scraper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Ask the browser to run without a window
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Size of a text chunk, in characters
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Number of pages visited per request
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    /// Maximum number of chunk extraction calls in flight
    #[serde(default = "default_extraction_concurrency")]
    pub extraction_concurrency: usize,

    /// Log and skip chunks whose extraction fails instead of failing the request
    #[serde(default)]
    pub skip_failed_chunks: bool,

    /// Stop paginating when a page is reached a second time
    #[serde(default)]
    pub stop_on_revisit: bool,

    /// Time budget for each render or navigation, in seconds
    #[serde(default = "default_page_timeout_secs")]
    pub page_timeout_secs: u64,

    /// Address the HTTP server binds to
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Model endpoint settings
    #[serde(default)]
    pub llm: LlmConfig,
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_headless() -> bool {
    true
}

fn default_chunk_size() -> usize {
    800
}

fn default_max_pages() -> usize {
    2
}

fn default_extraction_concurrency() -> usize {
    1
}

fn default_page_timeout_secs() -> u64 {
    45
}

fn default_bind_addr() -> String {
    "127.0.0.1:5049".to_string()
}

fn default_llm_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_llm_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_llm_timeout_secs() -> u64 {
    120
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_llm_base_url(),
            model: default_llm_model(),
            api_key: None,
            temperature: 0.0,
            timeout_secs: default_llm_timeout_secs(),
        }
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            headless: default_headless(),
            chunk_size: default_chunk_size(),
            max_pages: default_max_pages(),
            extraction_concurrency: default_extraction_concurrency(),
            skip_failed_chunks: false,
            stop_on_revisit: false,
            page_timeout_secs: default_page_timeout_secs(),
            bind_addr: default_bind_addr(),
            llm: LlmConfig::default(),
        }
    }
}

impl ScraperConfig {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut file = File::open(path)
            .map_err(|e| ScrapeError::Config(format!("{}: {}", path.display(), e)))?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| ScrapeError::Config(format!("{}: {}", path.display(), e)))?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string.
    ///
    /// Values are not validated here, since environment and command-line
    /// overrides may still replace them; call [`ScraperConfig::validate`] once
    /// every layer is applied.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ScrapeError::Config(e.to_string()))
    }

    /// Apply overrides from the process environment
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup; empty values are ignored
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(url) = get("WEBDRIVER_URL") {
            self.webdriver_url = url;
        }
        if let Some(key) = get("OPENAI_API_KEY") {
            self.llm.api_key = Some(key);
        }
        if let Some(url) = get("LLM_BASE_URL") {
            self.llm.base_url = url;
        }
        if let Some(model) = get("LLM_MODEL") {
            self.llm.model = model;
        }
        if let Some(addr) = get("QUOTES_BIND_ADDR") {
            self.bind_addr = addr;
        }
        self
    }

    /// Reject settings the pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(ScrapeError::Config("chunk_size must be greater than zero".into()));
        }
        if self.extraction_concurrency == 0 {
            return Err(ScrapeError::Config(
                "extraction_concurrency must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
