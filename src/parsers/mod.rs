pub mod html;
pub mod text;


/// Reduces a rendered page to the chunks that are sent to the model
pub struct Parser;

impl Parser {
    /// Extracts the visible body text of an HTML document
    pub fn page_text(html: &str) -> String {
        let body = html::extract_body(html);
        html::clean_body(&body)
    }

    /// Extracts the visible body text and splits it into chunks
    pub fn page_chunks(html: &str, chunk_size: usize) -> Vec<String> {
        let text = Self::page_text(html);
        ::log::debug!("Page text is {} characters", text.chars().count());
        text::chunk_content(&text, chunk_size)
    }
}
