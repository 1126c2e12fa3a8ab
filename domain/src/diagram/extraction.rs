//! Diagram extraction from model replies.
//!
//! Extraction honors only the first diagram block; stripping removes all of
//! them so the conversational text never shows raw diagram code.

use super::fence::find_diagram_fences;

/// Extract the first diagram block's interior, trimmed.
///
/// Returns an empty string when the text holds no complete diagram block.
pub fn extract_diagram(text: &str) -> String {
    find_diagram_fences(text)
        .first()
        .map(|fence| fence.body(text).trim().to_string())
        .unwrap_or_default()
}

/// Number of complete diagram blocks in `text`.
pub fn count_diagram_blocks(text: &str) -> usize {
    find_diagram_fences(text).len()
}

/// Remove every diagram block from `text`.
///
/// Whitespace around each removed block is collapsed to a single paragraph
/// break and the result is trimmed. Text without blocks is only trimmed.
pub fn strip_diagram_blocks(text: &str) -> String {
    let fences = find_diagram_fences(text);
    if fences.is_empty() {
        return text.trim().to_string();
    }

    let mut segments = Vec::with_capacity(fences.len() + 1);
    let mut cursor = 0;
    for fence in &fences {
        segments.push(&text[cursor..fence.start]);
        cursor = fence.end;
    }
    segments.push(&text[cursor..]);

    segments
        .into_iter()
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}
