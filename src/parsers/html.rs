use crate::parsers::text;
use scraper::{Html, Selector};

/// Elements whose text never reaches the model
const NON_CONTENT_ELEMENTS: [&str; 2] = ["script", "style"];

fn static_selector(selector: &str) -> Selector {
    Selector::parse(selector).expect("static selector is valid")
}

/// Returns the markup of the `<body>` element, or an empty string when the
/// document has none
pub fn extract_body(html: &str) -> String {
    let doc = Html::parse_document(html);
    let body_selector = static_selector("body");

    match doc.select(&body_selector).next() {
        Some(body) => body.html(),
        None => {
            ::log::debug!("No <body> found, falling back to empty content");
            String::new()
        }
    }
}

/// Collapses body markup into visible text.
///
/// Script and style contents are dropped, text nodes are joined with
/// newlines, every line is trimmed and blank lines are removed.
pub fn clean_body(body_html: &str) -> String {
    if body_html.trim().is_empty() {
        return String::new();
    }

    let fragment = Html::parse_fragment(body_html);
    let mut raw = String::new();

    for node in fragment.root_element().descendants() {
        let Some(text_node) = node.value().as_text() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|e| NON_CONTENT_ELEMENTS.contains(&e.name()))
        });
        if hidden {
            continue;
        }

        raw.push_str(&text_node.text);
        raw.push('\n');
    }

    text::clean_lines(&raw)
}

/// Returns the outer markup of every `<a>` element, in document order
pub fn extract_anchor_tags(html: &str) -> Vec<String> {
    let doc = Html::parse_document(html);
    let link_selector = static_selector("a");

    let tags = doc
        .select(&link_selector)
        .map(|e| e.html())
        .collect::<Vec<String>>();

    ::log::debug!("HTML parser found {} anchor tags", tags.len());
    tags
}

/// Checks that `selector` is valid CSS and matches at least one element of `html`
pub fn selector_matches(html: &str, selector: &str) -> bool {
    let parsed = match Selector::parse(selector) {
        Ok(parsed) => parsed,
        Err(e) => {
            ::log::debug!("Rejecting invalid selector {:?}: {:?}", selector, e);
            return false;
        }
    };

    let doc = Html::parse_document(html);
    doc.select(&parsed).next().is_some()
}
