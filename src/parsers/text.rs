/// Trims every line and drops the blank ones
pub fn clean_lines(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Splits text into contiguous windows of at most `chunk_size` characters.
///
/// Windows are counted in characters, not bytes, so a multi-byte character is
/// never cut in half. Empty text yields no chunks; a zero `chunk_size` yields
/// the whole text as a single chunk.
pub fn chunk_content(content: &str, chunk_size: usize) -> Vec<String> {
    if content.is_empty() {
        return Vec::new();
    }
    if chunk_size == 0 {
        return vec![content.to_string()];
    }

    let chars: Vec<char> = content.chars().collect();
    chars
        .chunks(chunk_size)
        .map(|window| window.iter().collect())
        .collect()
}
