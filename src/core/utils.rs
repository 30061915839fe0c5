/// Escapes characters that are problematic in file names.
///
/// Replaced characters:
/// - `/`, `\` (path separators)
/// - `:`, `*`, `?`, `<`, `>`, `|` (reserved on Windows)
/// - `"` becomes `'`
/// - control characters (0x00-0x1F)
///
/// Leading/trailing whitespace and dots are trimmed; an empty result falls
/// back to `"unnamed"`.
///
/// # Example
///
/// ```
/// use serenata::core::utils::escape_filename;
///
/// assert_eq!(escape_filename("song/name*.mp3"), "song_name_.mp3");
/// ```
pub fn escape_filename(filename: &str) -> String {
    let mut result = String::with_capacity(filename.len());

    for c in filename.chars() {
        match c {
            '/' | '\\' => result.push('_'),
            ':' | '*' | '?' | '<' | '>' | '|' => result.push('_'),
            '"' => result.push('\''),
            c if c.is_control() => result.push('_'),
            _ => result.push(c),
        }
    }

    let result = result.trim_matches(|c: char| c.is_whitespace() || c == '.');

    if result.is_empty() {
        "unnamed".to_string()
    } else {
        result.to_string()
    }
}

/// Truncates a title to `max_chars` characters for inline keyboard labels.
///
/// Works on character boundaries, not bytes, so multi-byte titles don't
/// panic the slice.
pub fn truncate_label(title: &str, max_chars: usize) -> String {
    if title.chars().count() <= max_chars {
        title.to_string()
    } else {
        title.chars().take(max_chars).collect()
    }
}
