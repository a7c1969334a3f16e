use crate::browser::Renderer;
use crate::config::ScraperConfig;
use crate::error::{Result, ScrapeError};
use async_trait::async_trait;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{Map, Value, json};
use std::future::Future;
use std::time::Duration;
use tokio::time::{Instant, sleep, timeout, timeout_at};

/// Polls of `document.readyState` before giving up on a page settling
const SETTLE_POLLS: usize = 20;
const SETTLE_POLL_INTERVAL: Duration = Duration::from_millis(250);
/// Extra wait after the document is complete, for late XHR traffic
const SETTLE_GRACE: Duration = Duration::from_millis(500);
/// Upper bound on closing a session once the page budget is spent
const CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

/// Renders pages through a WebDriver server (ChromeDriver, geckodriver, ...).
///
/// Every call opens a fresh session and closes it before returning.
#[derive(Debug, Clone)]
pub struct WebDriverRenderer {
    webdriver_url: String,
    headless: bool,
    page_timeout: Duration,
}

impl WebDriverRenderer {
    pub fn new(webdriver_url: impl Into<String>) -> Self {
        Self {
            webdriver_url: webdriver_url.into(),
            headless: true,
            page_timeout: Duration::from_secs(45),
        }
    }

    pub fn from_config(config: &ScraperConfig) -> Self {
        Self {
            webdriver_url: config.webdriver_url.clone(),
            headless: config.headless,
            page_timeout: Duration::from_secs(config.page_timeout_secs),
        }
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn with_page_timeout(mut self, page_timeout: Duration) -> Self {
        self.page_timeout = page_timeout;
        self
    }

    fn capabilities(&self) -> Map<String, Value> {
        let mut caps = Map::new();
        if self.headless {
            caps.insert(
                "goog:chromeOptions".to_string(),
                json!({ "args": ["--headless=new", "--disable-gpu", "--no-sandbox"] }),
            );
            caps.insert(
                "moz:firefoxOptions".to_string(),
                json!({ "args": ["-headless"] }),
            );
        }
        caps
    }

    /// Connects to the configured WebDriver, then to the usual local ports
    async fn connect(&self) -> Result<Client> {
        match self.connect_to(&self.webdriver_url).await {
            Ok(client) => {
                ::log::debug!("Connected to WebDriver at {}", self.webdriver_url);
                return Ok(client);
            }
            Err(e) => {
                ::log::error!(
                    "Failed to connect to WebDriver at {}: {}",
                    self.webdriver_url,
                    e
                );
            }
        }

        let fallback_urls = [
            "http://localhost:9515", // ChromeDriver default
            "http://localhost:4444", // geckodriver / Selenium default
            "http://127.0.0.1:4444", // Try with IP instead of localhost
        ];

        for url in fallback_urls.iter() {
            if *url == self.webdriver_url {
                continue;
            }

            ::log::info!("Trying fallback WebDriver URL: {}", url);
            if let Ok(client) = self.connect_to(url).await {
                ::log::debug!("Connected to fallback WebDriver at {}", url);
                return Ok(client);
            }
        }

        ::log::error!(
            "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
        );
        Err(ScrapeError::WebDriver(format!(
            "no WebDriver server reachable at {}",
            self.webdriver_url
        )))
    }

    async fn connect_to(&self, url: &str) -> Result<Client> {
        let mut builder = ClientBuilder::native();
        builder.capabilities(self.capabilities());
        Ok(builder.connect(url).await?)
    }

    /// Deadline shared by the connection attempts and the commands of one call
    fn deadline(&self) -> Instant {
        Instant::now() + self.page_timeout
    }

    async fn bounded<T, F>(&self, deadline: Instant, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match timeout_at(deadline, fut).await {
            Ok(result) => result,
            Err(_) => Err(ScrapeError::Timeout(self.page_timeout.as_secs())),
        }
    }
}

#[async_trait]
impl Renderer for WebDriverRenderer {
    async fn render(&self, url: &str) -> Result<String> {
        ::log::debug!("RENDER: {}", url);
        let deadline = self.deadline();
        let client = self.bounded(deadline, self.connect()).await?;

        let result = self
            .bounded(deadline, async {
                client.goto(url).await?;
                let html = client.source().await?;
                Ok::<_, ScrapeError>(html)
            })
            .await;

        close_session(client).await;
        result
    }

    async fn navigate(&self, url: &str, selector: &str) -> Result<String> {
        ::log::debug!("NAVIGATE: {} via {:?}", url, selector);
        let deadline = self.deadline();
        let client = match self.bounded(deadline, self.connect()).await {
            Ok(client) => client,
            Err(e) => {
                handle_navigation_error(&e, url);
                return Err(e);
            }
        };

        let result = self
            .bounded(deadline, async {
                client.goto(url).await?;
                wait_for_settle(&client).await?;

                let element = client.find(Locator::Css(selector)).await?;
                element.click().await?;
                wait_for_settle(&client).await?;

                let current = client.current_url().await?;
                Ok::<_, ScrapeError>(current.to_string())
            })
            .await;

        if let Err(e) = &result {
            handle_navigation_error(e, url);
        }

        close_session(client).await;
        result
    }
}

/// Waits until the document reports `complete`, then a short grace period
async fn wait_for_settle(client: &Client) -> Result<()> {
    for _ in 0..SETTLE_POLLS {
        let state = client.execute("return document.readyState", vec![]).await?;
        if state.as_str() == Some("complete") {
            break;
        }
        sleep(SETTLE_POLL_INTERVAL).await;
    }

    sleep(SETTLE_GRACE).await;
    Ok(())
}

async fn close_session(client: Client) {
    match timeout(CLOSE_TIMEOUT, client.close()).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => ::log::warn!("Failed to close WebDriver session: {}", e),
        Err(_) => ::log::warn!("Timed out closing WebDriver session"),
    }
}

fn handle_navigation_error(error: &ScrapeError, url: &str) {
    if error.to_string().contains("Unable to find session") {
        ::log::warn!("Lost WebDriver session while navigating from {}", url);
    } else {
        ::log::warn!("Failed to navigate from {}: {}", url, error);
    }
}
