//! Fenced diagram block scanning.
//!
//! A diagram block opens with a line consisting of ```` ```mermaid ```` and
//! closes at the next line starting with ```` ``` ````. An opening fence
//! without a closing line is not a block.

/// Language tag that marks a fence as carrying diagram code.
pub const MERMAID_FENCE_TAG: &str = "mermaid";

const FENCE_MARKER: &str = "```";

/// Byte span of one fenced diagram block inside a larger text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagramFence {
    /// Start of the opening fence line.
    pub start: usize,
    /// End of the closing backticks.
    pub end: usize,
    body_start: usize,
    body_end: usize,
}

impl DiagramFence {
    /// Raw interior of the block (untrimmed).
    pub fn body<'a>(&self, text: &'a str) -> &'a str {
        &text[self.body_start..self.body_end]
    }
}

fn is_opening_line(line: &str) -> bool {
    line.trim_start()
        .strip_prefix(FENCE_MARKER)
        .and_then(|rest| rest.strip_prefix(MERMAID_FENCE_TAG))
        .is_some_and(|rest| rest.trim().is_empty())
}

/// Find every diagram block in `text`, in order of appearance.
pub fn find_diagram_fences(text: &str) -> Vec<DiagramFence> {
    let mut fences = Vec::new();
    // (start of opening line, start of body)
    let mut open: Option<(usize, usize)> = None;
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();
        let content = line.trim_end_matches(['\n', '\r']);

        match open {
            None => {
                if is_opening_line(content) {
                    open = Some((line_start, offset));
                }
            }
            Some((start, body_start)) => {
                let trimmed = content.trim_start();
                if trimmed.starts_with(FENCE_MARKER) {
                    let indent = content.len() - trimmed.len();
                    fences.push(DiagramFence {
                        start,
                        end: line_start + indent + FENCE_MARKER.len(),
                        body_start,
                        body_end: line_start,
                    });
                    open = None;
                }
            }
        }
    }

    fences
}
