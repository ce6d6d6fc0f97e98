/// Maximum number of characters kept from a title line.
pub const MAX_TITLE_CHARS: usize = 80;

/// Line prefixes that mark list items or recipe labels rather than headings.
const SKIPPED_PREFIXES: &[&str] = &["o ", "Ingredients:", "Instructions:"];

/// Extract a short section title from a raw text block.
///
/// Picks the first line that is longer than three characters and is not a
/// bullet (`o `) or an `Ingredients:`/`Instructions:` label, strips a leading
/// `3. `-style numbering and caps the result at [`MAX_TITLE_CHARS`].
///
/// Returns `None` when no line qualifies; such blocks are not usable as
/// titled sections.
pub fn extract_section_title(text: &str) -> Option<String> {
    for line in text.trim().lines() {
        let line = line.trim();
        if line.chars().count() <= 3 {
            continue;
        }
        if SKIPPED_PREFIXES.iter().any(|prefix| line.starts_with(prefix)) {
            continue;
        }

        let title: String =
            strip_numbering(line).chars().take(MAX_TITLE_CHARS).collect();
        if !title.is_empty() {
            return Some(title);
        }
    }

    None
}

/// Remove a leading `12.` marker and the whitespace after it.
fn strip_numbering(line: &str) -> &str {
    let rest = line.trim_start_matches(|c: char| c.is_ascii_digit());
    if rest.len() == line.len() {
        return line;
    }
    match rest.strip_prefix('.') {
        Some(after_dot) => after_dot.trim_start(),
        None => line,
    }
}
