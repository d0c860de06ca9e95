//! Display list: the laid-out, render-ready content of each page.
//!
//! Layout produces these; the PDF writer only translates them into content-stream
//! operators.

use serde::{Deserialize, Serialize};

use crate::layout::font_metrics::FontSpec;

/// Axis-aligned rectangle, `y` is the bottom edge.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }
}

/// One drawing instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawOp {
    /// Single-line text with its baseline origin at (`x`, `y`).
    Text {
        x: f32,
        y: f32,
        font: FontSpec,
        text: String,
    },
    /// Filled rectangle; `gray` is 0.0 (black) to 1.0 (white).
    FillRect { rect: Rect, gray: f32 },
    /// Stroked black rectangle outline.
    StrokeRect { rect: Rect, line_width: f32 },
    /// Open stroked path through `points`.
    Polyline {
        points: Vec<(f32, f32)>,
        line_width: f32,
    },
}

/// Display list for a single page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayPage {
    /// 1-based page number.
    pub page_number: u32,
    pub items: Vec<DrawOp>,
}

impl DisplayPage {
    pub fn new(page_number: u32) -> Self {
        Self {
            page_number,
            items: Vec::new(),
        }
    }

    /// All text strings on the page, in draw order.
    #[cfg(test)]
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|item| match item {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    #[cfg(test)]
    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t == needle)
    }
}

/// Ordered pages of a document under construction.
///
/// The last page is always the one being drawn on.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayList {
    pages: Vec<DisplayPage>,
}

impl DisplayList {
    /// Starts with page 1 open.
    pub fn new() -> Self {
        Self {
            pages: vec![DisplayPage::new(1)],
        }
    }

    pub fn push(&mut self, op: DrawOp) {
        if let Some(page) = self.pages.last_mut() {
            page.items.push(op);
        }
    }

    pub fn extend(&mut self, ops: impl IntoIterator<Item = DrawOp>) {
        if let Some(page) = self.pages.last_mut() {
            page.items.extend(ops);
        }
    }

    pub fn open_page(&mut self, page_number: u32) {
        self.pages.push(DisplayPage::new(page_number));
    }

    pub fn into_pages(self) -> Vec<DisplayPage> {
        self.pages
    }
}

impl Default for DisplayList {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::font_metrics::FontFace;

    #[test]
    fn test_ops_go_to_last_opened_page() {
        let mut list = DisplayList::new();
        list.push(DrawOp::FillRect {
            rect: Rect::new(0.0, 0.0, 1.0, 1.0),
            gray: 0.5,
        });
        list.open_page(2);
        list.push(DrawOp::Text {
            x: 0.0,
            y: 0.0,
            font: FontSpec::new(FontFace::TimesRoman, 10.0),
            text: "Halaman 2".to_string(),
        });

        let pages = list.into_pages();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].items.len(), 1);
        assert!(pages[1].contains_text("Halaman 2"));
        assert!(!pages[0].contains_text("Halaman 2"));
    }

    #[test]
    fn test_rect_helpers() {
        let rect = Rect::new(50.0, 100.0, 40.0, 20.0);
        assert_eq!(rect.center_x(), 70.0);
        assert_eq!(rect.center_y(), 110.0);
    }
}
