use clap::{Parser, Subcommand};
use quote_harvest::ScraperConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "quote-harvest")]
#[command(about = "Extracts quotes from paginated websites with a language model")]
#[command(version)]
pub struct Args {
    /// JSON configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// WebDriver server URL (overrides config and WEBDRIVER_URL)
    #[arg(long, global = true)]
    pub webdriver_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the HTTP endpoint
    Serve {
        /// Address to bind, e.g. 127.0.0.1:5049
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Extract quotes from a URL and print them as JSON
    Scrape {
        /// URL of the first page
        url: String,

        /// Number of pages to visit
        #[arg(short, long)]
        max_pages: Option<usize>,

        /// Size of a text chunk sent to the model, in characters
        #[arg(long)]
        chunk_size: Option<usize>,
    },
}

impl Args {
    /// Apply command-line overrides on top of a loaded configuration
    pub fn apply(&self, mut config: ScraperConfig) -> ScraperConfig {
        if let Some(url) = &self.webdriver_url {
            config.webdriver_url = url.clone();
        }

        match &self.command {
            Command::Serve { bind } => {
                if let Some(bind) = bind {
                    config.bind_addr = bind.clone();
                }
            }
            Command::Scrape {
                max_pages,
                chunk_size,
                ..
            } => {
                if let Some(max_pages) = max_pages {
                    config.max_pages = *max_pages;
                }
                if let Some(chunk_size) = chunk_size {
                    config.chunk_size = *chunk_size;
                }
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrape_overrides() {
        let args = Args::parse_from([
            "quote-harvest",
            "scrape",
            "http://quotes.toscrape.com/",
            "--max-pages",
            "5",
            "--chunk-size",
            "1500",
        ]);
        let config = args.apply(ScraperConfig::default());

        assert_eq!(config.max_pages, 5);
        assert_eq!(config.chunk_size, 1500);
        assert!(matches!(args.command, Command::Scrape { ref url, .. } if url == "http://quotes.toscrape.com/"));
    }

    #[test]
    fn test_serve_overrides() {
        let args = Args::parse_from([
            "quote-harvest",
            "serve",
            "--bind",
            "0.0.0.0:8080",
            "--webdriver-url",
            "http://localhost:9515",
        ]);
        let config = args.apply(ScraperConfig::default());

        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.webdriver_url, "http://localhost:9515");
        assert_eq!(config.max_pages, 2);
    }
}
