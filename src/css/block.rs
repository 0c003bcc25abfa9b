//! Top-level CSS block splitting.

/// A maximal top-level span of CSS text: brace nesting starts and ends at
/// depth 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssBlock {
    /// Raw block text (lines joined, no trailing newline).
    pub text: String,
    /// 1-based line the block starts on.
    pub line: usize,
}

impl CssBlock {
    /// The at-rule condition when this is a `@media` block: the text before
    /// the first `{`, trimmed.
    pub fn media_condition(&self) -> Option<&str> {
        self.text
            .trim_start()
            .starts_with("@media")
            .then(|| self.text.split('{').next().unwrap_or("").trim())
    }

    /// Inner body of a braced block: text between the first `{` and the
    /// last `}`, trimmed.
    pub fn body(&self) -> &str {
        match (self.text.find('{'), self.text.rfind('}')) {
            (Some(open), Some(close)) if close > open => self.text[open + 1..close].trim(),
            _ => "",
        }
    }
}

/// Split CSS text into maximal top-level blocks.
///
/// Tracks cumulative brace depth per line; a line ends the current block
/// when the depth returns to exactly 0. A trailing unbalanced block is
/// preserved as-is rather than dropped, so splitting always reconstructs
/// its input.
pub fn split_blocks(css: &str) -> Vec<CssBlock> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut start_line = 1;
    let mut depth: i64 = 0;

    for (idx, line) in css.lines().enumerate() {
        if current.is_empty() {
            start_line = idx + 1;
        }
        depth += line.matches('{').count() as i64 - line.matches('}').count() as i64;
        current.push(line);

        if depth == 0 {
            blocks.push(CssBlock {
                text: current.join("\n"),
                line: start_line,
            });
            current.clear();
        }
    }

    if !current.is_empty() {
        blocks.push(CssBlock {
            text: current.join("\n"),
            line: start_line,
        });
    }

    blocks
}

// ============================================================================
// Tests
// ============================================================================
