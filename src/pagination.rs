//! Finds the "next page" of a listing.
//!
//! Resolution runs through four stages, any of which may end pagination:
//! collect the page's `<a>` tags, have the model pick the pagination tag,
//! have the model write a CSS selector for it, then click it in a browser and
//! read back the URL. Model answers are checked against the fetched markup
//! before anything is clicked.

use crate::browser::{PageFetcher, Renderer};
use crate::llm::{LanguageModel, prompts};
use crate::parsers::html;
use crate::utils::{collapse_whitespace, normalize_url, strip_code_fence, truncate_for_log};
use std::fmt;
use std::sync::Arc;

/// Stage reached when resolution stops
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    TagsExtracted,
    TagIdentified,
    SelectorResolved,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Start => "start",
            Stage::TagsExtracted => "tags extracted",
            Stage::TagIdentified => "tag identified",
            Stage::SelectorResolved => "selector resolved",
        };
        f.write_str(name)
    }
}

#[derive(Clone)]
pub struct PaginationResolver {
    fetcher: Arc<dyn PageFetcher>,
    renderer: Arc<dyn Renderer>,
    model: Arc<dyn LanguageModel>,
}

impl PaginationResolver {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        renderer: Arc<dyn Renderer>,
        model: Arc<dyn LanguageModel>,
    ) -> Self {
        Self {
            fetcher,
            renderer,
            model,
        }
    }

    /// Returns the URL of the page after `url`, or `None` when pagination ends
    /// or cannot be resolved. Failures never propagate.
    pub async fn resolve_next(&self, url: &str) -> Option<String> {
        match self.try_resolve(url).await {
            Ok(next) => {
                ::log::info!("New url after pagination: {}", next);
                Some(next)
            }
            Err(stop) => {
                ::log::info!(
                    "No further pagination (stopped after {}): {}",
                    stop.stage,
                    stop.reason
                );
                None
            }
        }
    }

    async fn try_resolve(&self, url: &str) -> Result<String, Stop> {
        let markup = self
            .fetcher
            .fetch(url)
            .await
            .map_err(|e| Stop::new(Stage::Start, e))?;

        let tags = html::extract_anchor_tags(&markup);
        if tags.is_empty() {
            return Err(Stop::new(Stage::TagsExtracted, "page has no <a> tags"));
        }

        let tag = self.identify_tag(&tags).await?;
        ::log::info!("Pagination tag found: {}", truncate_for_log(&tag, 200));

        let selector = self.resolve_selector(&tag, &markup).await?;
        ::log::info!("Query selector for tag: {}", selector);

        let next = self
            .renderer
            .navigate(url, &selector)
            .await
            .map_err(|e| Stop::new(Stage::SelectorResolved, e))?;

        if normalize_url(&next) == normalize_url(url) {
            return Err(Stop::new(Stage::SelectorResolved, "click did not leave the page"));
        }
        Ok(next)
    }

    async fn identify_tag(&self, tags: &[String]) -> Result<String, Stop> {
        let prompt = prompts::pagination_tag(&tags.join("\n"));
        let answer = self
            .model
            .complete(&prompt)
            .await
            .map_err(|e| Stop::new(Stage::TagsExtracted, e))?;

        match match_tag(&answer, tags) {
            Some(tag) => Ok(tag.to_string()),
            None => Err(Stop::new(
                Stage::TagsExtracted,
                format!("answer is not one of the page's tags: {}", truncate_for_log(&answer, 200)),
            )),
        }
    }

    async fn resolve_selector(&self, tag: &str, markup: &str) -> Result<String, Stop> {
        let answer = self
            .model
            .complete(&prompts::css_selector(tag))
            .await
            .map_err(|e| Stop::new(Stage::TagIdentified, e))?;

        let selector = clean_selector(&answer);
        if selector.is_empty() || !html::selector_matches(markup, selector) {
            return Err(Stop::new(
                Stage::TagIdentified,
                format!("selector matches nothing: {}", truncate_for_log(selector, 200)),
            ));
        }

        Ok(selector.to_string())
    }
}

/// Why resolution ended, and the last stage it completed
#[derive(Debug)]
struct Stop {
    stage: Stage,
    reason: String,
}

impl Stop {
    fn new(stage: Stage, reason: impl ToString) -> Self {
        Self {
            stage,
            reason: reason.to_string(),
        }
    }
}

/// Finds the tag the model answered with. Whitespace differences are
/// tolerated; anything else must match exactly.
pub fn match_tag<'a>(answer: &str, tags: &'a [String]) -> Option<&'a str> {
    let answer = strip_code_fence(answer);
    if answer.is_empty() || answer.eq_ignore_ascii_case(prompts::NO_PAGINATION_ANSWER) {
        return None;
    }

    if let Some(tag) = tags.iter().find(|t| t.trim() == answer) {
        return Some(tag.as_str());
    }

    let collapsed = collapse_whitespace(answer);
    tags.iter()
        .find(|t| collapse_whitespace(t) == collapsed)
        .map(String::as_str)
}

/// Strips fences, backticks and quotes from a selector answer
pub fn clean_selector(answer: &str) -> &str {
    strip_code_fence(answer)
        .trim()
        .trim_matches(|c| c == '`' || c == '"' || c == '\'')
        .trim()
}
