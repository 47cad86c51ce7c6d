//! Label wrapping by character budget

use serde::Serialize;

/// Character budget used by the orbit diagram.
pub const DEFAULT_LABEL_LIMIT: usize = 16;

/// Wrapped lines of one node label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelBlock {
    lines: Vec<String>,
}

impl LabelBlock {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    pub fn is_multiline(&self) -> bool {
        self.lines.len() > 1
    }

    /// Vertical offset of each line in em, relative to the previous line.
    ///
    /// A multi-line block starts slightly above the anchor so it stays
    /// centred; a single line sits on the usual baseline shift.
    pub fn tspan_offsets(&self) -> Vec<f64> {
        (0..self.lines.len())
            .map(|i| match (i, self.is_multiline()) {
                (0, true) => -0.3,
                (0, false) => 0.31,
                _ => 1.1,
            })
            .collect()
    }
}

/// Wrap a node label; hub labels are never wrapped.
pub fn wrap_label(text: &str, limit: usize, is_hub: bool) -> LabelBlock {
    let lines = if is_hub {
        vec![text.to_string()]
    } else {
        wrap(text, limit)
    };
    LabelBlock { lines }
}

/// Greedy word wrap: words are appended to the current line while the line,
/// a space and the next word fit in `limit` characters.
///
/// Words longer than `limit` are kept whole on their own line. Text that
/// already fits is returned as a single unchanged line.
pub fn wrap(text: &str, limit: usize) -> Vec<String> {
    if text.chars().count() <= limit {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.chars().count() + 1 + word.chars().count() <= limit {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    if lines.is_empty() {
        // whitespace only
        lines.push(text.to_string());
    }
    lines
}
