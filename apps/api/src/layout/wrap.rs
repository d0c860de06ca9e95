//! Greedy word wrap used for both row-height measurement and drawing.
//!
//! One algorithm serves both purposes so a row is drawn with exactly the line
//! breaks its height was computed from.

use serde::{Deserialize, Serialize};

use crate::layout::font_metrics::FontSpec;

/// The wrapped lines of one text field at one width and font.
///
/// Always holds at least one line (possibly empty).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WrappedCell {
    pub lines: Vec<String>,
}

impl WrappedCell {
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

/// Wraps `text` into lines no wider than `max_width` points.
///
/// - Words are appended while `width(line + " " + word) <= max_width`.
/// - A word wider than `max_width` on its own is cut one character at a time until
///   it fits and emitted as its own line; the cut-off tail is dropped.
/// - Empty or whitespace-only text yields a single empty line.
pub fn wrap_text(text: &str, font: FontSpec, max_width: f32) -> WrappedCell {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() {
            let candidate = format!("{current} {word}");
            if font.width_of(&candidate) <= max_width {
                current = candidate;
                continue;
            }
            lines.push(std::mem::take(&mut current));
        }

        // `current` is empty here: the word starts a fresh line.
        if font.width_of(word) <= max_width {
            current.push_str(word);
        } else {
            lines.push(truncate_to_width(word, font, max_width));
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }

    WrappedCell { lines }
}

/// Drops trailing characters until `word` fits in `max_width`.
fn truncate_to_width(word: &str, font: FontSpec, max_width: f32) -> String {
    let mut truncated = word.to_string();
    while !truncated.is_empty() && font.width_of(&truncated) > max_width {
        truncated.pop();
    }
    truncated
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
