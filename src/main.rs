use clap::Parser;
use quote_harvest::{QuoteExtractor, QuotesResponse, ScraperConfig, server};

mod args;
use args::{Args, Command};

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            ::log::error!("Invalid configuration: {}", e);
            if let Command::Scrape { .. } = args.command {
                print_response(&QuotesResponse::failure(e));
            }
            std::process::exit(1);
        }
    };

    match &args.command {
        Command::Serve { .. } => {
            println!("Note: rendering pages requires a WebDriver server (e.g., ChromeDriver).");
            println!("Set WEBDRIVER_URL if not using the default {}", config.webdriver_url);

            if let Err(e) = server::serve(&config).await {
                ::log::error!("Server stopped: {}", e);
                std::process::exit(1);
            }
        }
        Command::Scrape { url, .. } => {
            let start_time = std::time::Instant::now();
            let response = scrape(&config, url).await;
            print_response(&response);

            ::log::info!(
                "Scraping complete in {:.2} seconds",
                start_time.elapsed().as_secs_f64()
            );
            if !response.is_success() {
                std::process::exit(1);
            }
        }
    }
}

/// File (or defaults), then environment, then command line; validated last
fn load_config(args: &Args) -> quote_harvest::Result<ScraperConfig> {
    let config = match &args.config {
        Some(path) => ScraperConfig::from_file(path)?,
        None => ScraperConfig::default(),
    };

    let config = args.apply(config.with_env_overrides());
    config.validate()?;
    Ok(config)
}

fn print_response(response: &QuotesResponse) {
    match serde_json::to_string_pretty(response) {
        Ok(json) => println!("{}", json),
        Err(e) => ::log::error!("Failed to serialize response: {}", e),
    }
}

async fn scrape(config: &ScraperConfig, url: &str) -> QuotesResponse {
    let extractor = match QuoteExtractor::from_config(config) {
        Ok(extractor) => extractor,
        Err(e) => return QuotesResponse::failure(e),
    };

    match extractor.extract_quotes(url, config.max_pages).await {
        Ok(quotes) => QuotesResponse::success(quotes),
        Err(e) => {
            ::log::error!("Failed to extract quotes from {}: {}", url, e);
            QuotesResponse::failure(e)
        }
    }
}
