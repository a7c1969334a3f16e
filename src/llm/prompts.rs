//! Prompt templates for the three model calls

/// Task line of the selector prompt
pub(crate) const SELECTOR_TASK: &str = "Write the CSS selector that uniquely targets this HTML tag.";

/// Task line of the pagination prompt
pub(crate) const PAGINATION_TASK: &str =
    "Pick the single tag below that paginates the list of quotes.";

/// Answer the pagination prompt expects when no tag paginates
pub const NO_PAGINATION_ANSWER: &str = "NONE";

pub fn quote_extraction(schema: &str, body_content: &str) -> String {
    format!(
        r#"The text below was taken from the <body> of a quotes website. Besides quotes it may contain headers, navigation, sidebars and advertisements.

Extract every quote shown in the text, using this schema for each quote:

{schema}

Rules:
- Only extract quotes that actually appear in the text. Never invent data.
- Fill only the fields in the schema, each with text taken from the page.
- Copy the quote text verbatim. Do not reword or paraphrase it.
- Ignore navigation, sidebars, banners, advertisements and scripts.
- List each quote once.
- If the text contains no quotes, return an empty list.

Text:
{body_content}"#
    )
}

pub fn pagination_tag(tags: &str) -> String {
    format!(
        r#"You are given the <a> tags of a page listing quotes, one per line.
{PAGINATION_TASK}
It is the control that moves to the next page of quotes (a "Next" link, a page number, an arrow).

Answer with that tag copied exactly as given, with no explanation and no extra text.
Ignore social media links, links to quote or author details, tag links and site navigation.
If no tag paginates the quotes, answer {NO_PAGINATION_ANSWER}.

Tags:
{tags}"#
    )
}

pub fn css_selector(tag: &str) -> String {
    format!(
        r#"{SELECTOR_TASK}
Answer with the selector only, no explanation, no quotes and no code fences.

Tag: {tag}"#
    )
}
