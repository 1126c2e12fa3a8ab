//! Shared utility functions.

/// One-line preview of `text` for log messages.
///
/// Line breaks become spaces and the result is cut to at most `max_chars`
/// characters, with `...` appended when something was dropped.
pub fn preview(text: &str, max_chars: usize) -> String {
    let flat: String = text
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();

    match flat.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &flat[..cut]),
        None => flat,
    }
}
