//! In-memory stand-ins for the browser, the fetcher and the model

use crate::browser::{PageFetcher, Renderer};
use crate::error::{Result, ScrapeError};
use crate::llm::{LanguageModel, StructuredSchema, prompts};
use crate::results::{Quote, QuoteBatch};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Quotes the fake model knows how to recognise: (text, author, tags)
const CATALOG: [(&str, &str, &[&str]); 4] = [
    (
        "“The world as we have created it is a process of our thinking.”",
        "Albert Einstein",
        &["change", "thinking"],
    ),
    (
        "“It is our choices, Harry, that show what we truly are.”",
        "J.K. Rowling",
        &["abilities", "choices"],
    ),
    (
        "“A day without sunshine is like, you know, night.”",
        "Steve Martin",
        &["humor"],
    ),
    (
        "“Try not to become a man of success. Rather become a man of value.”",
        "Albert Einstein",
        &["adulthood", "success", "value"],
    ),
];

pub fn catalog_quote(index: usize) -> Quote {
    let (text, author, tags) = CATALOG[index];
    Quote::new(author, text, tags.iter().map(|t| t.to_string()).collect())
}

/// Builds a quotes page holding the given catalog entries and, optionally, a
/// "Next" control pointing at `next_href`
pub fn page_html(quotes: &[usize], next_href: Option<&str>) -> String {
    let mut html = String::from(
        "<html><head><title>Quotes</title><script>window.x = 1;</script></head><body>\n\
         <div class=\"header\"><a href=\"/\">Quotes to Scrape</a> <a href=\"/login\">Login</a></div>\n",
    );

    for &index in quotes {
        let (text, author, tags) = CATALOG[index];
        html.push_str(&format!(
            "<div class=\"quote\"><span class=\"text\">{}</span>\n<span>by <small class=\"author\">{}</small></span>\n<div class=\"tags\">Tags:",
            text, author
        ));
        for tag in tags {
            html.push_str(&format!(" <a class=\"tag\" href=\"/tag/{0}/\">{0}</a>", tag));
        }
        html.push_str("</div></div>\n");
    }

    if let Some(href) = next_href {
        html.push_str(&format!(
            "<nav><ul class=\"pager\"><li class=\"next\"><a href=\"{}\">Next <span aria-hidden=\"true\">→</span></a></li></ul></nav>\n",
            href
        ));
    }

    html.push_str("</body></html>");
    html
}

#[derive(Default)]
pub struct FakeRenderer {
    pages: HashMap<String, String>,
    navigations: HashMap<(String, String), String>,
    render_calls: AtomicUsize,
    navigate_calls: AtomicUsize,
}

impl FakeRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    pub fn with_navigation(mut self, url: &str, selector: &str, next: &str) -> Self {
        self.navigations
            .insert((url.to_string(), selector.to_string()), next.to_string());
        self
    }

    pub fn render_calls(&self) -> usize {
        self.render_calls.load(Ordering::SeqCst)
    }

    pub fn navigate_calls(&self) -> usize {
        self.navigate_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Renderer for FakeRenderer {
    async fn render(&self, url: &str) -> Result<String> {
        self.render_calls.fetch_add(1, Ordering::SeqCst);
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| ScrapeError::WebDriver(format!("connection refused: {}", url)))
    }

    async fn navigate(&self, url: &str, selector: &str) -> Result<String> {
        self.navigate_calls.fetch_add(1, Ordering::SeqCst);
        self.navigations
            .get(&(url.to_string(), selector.to_string()))
            .cloned()
            .ok_or_else(|| ScrapeError::WebDriver(format!("no such element: {}", selector)))
    }
}

#[derive(Default)]
pub struct FakeFetcher {
    pages: HashMap<String, String>,
    calls: AtomicUsize,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageFetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| ScrapeError::Fetch(format!("{} returned 404 Not Found", url)))
    }
}

/// A model that answers like a well-behaved LLM on the catalog site: it
/// extracts catalog quotes found verbatim in the prompt, picks the "Next"
/// tag, and answers with a fixed selector
pub struct QuoteSiteModel {
    selector: String,
    calls: AtomicUsize,
}

impl QuoteSiteModel {
    pub fn new() -> Self {
        Self {
            selector: "li.next > a".to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_selector(mut self, selector: &str) -> Self {
        self.selector = selector.to_string();
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LanguageModel for QuoteSiteModel {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if prompt.contains(prompts::SELECTOR_TASK) {
            return Ok(self.selector.clone());
        }

        let next_tag = prompt
            .lines()
            .find(|line| line.starts_with("<a") && line.contains("Next"));
        Ok(next_tag
            .unwrap_or(prompts::NO_PAGINATION_ANSWER)
            .to_string())
    }

    async fn complete_structured(&self, prompt: &str, _schema: &StructuredSchema) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let mut found: Vec<(usize, Quote)> = (0..CATALOG.len())
            .filter_map(|i| prompt.find(CATALOG[i].0).map(|pos| (pos, catalog_quote(i))))
            .collect();
        found.sort_by_key(|(pos, _)| *pos);

        let batch = QuoteBatch {
            quotes: found.into_iter().map(|(_, q)| q).collect(),
        };
        serde_json::to_string(&batch).map_err(|e| ScrapeError::Parse(e.to_string()))
    }
}

type Handler = Box<dyn Fn(&str) -> Result<String> + Send + Sync>;

/// A model driven by closures, for failure cases
pub struct ScriptedModel {
    text: Handler,
    structured: Handler,
    calls: AtomicUsize,
}

impl ScriptedModel {
    pub fn text<F>(handler: F) -> Self
    where
        F: Fn(&str) -> Result<String> + Send + Sync + 'static,
    {
        Self {
            text: Box::new(handler),
            structured: Box::new(|_| Ok("{\"quotes\":[]}".to_string())),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn structured<F>(handler: F) -> Self
    where
        F: Fn(&str) -> Result<String> + Send + Sync + 'static,
    {
        Self {
            text: Box::new(|_| Ok(prompts::NO_PAGINATION_ANSWER.to_string())),
            structured: Box::new(handler),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.text)(prompt)
    }

    async fn complete_structured(&self, prompt: &str, _schema: &StructuredSchema) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.structured)(prompt)
    }
}
