//! Page geometry and the per-render layout cursor.
//!
//! Coordinates are PDF user space: origin at the bottom-left corner, y grows upward.
//! The cursor therefore counts *down* from the top of the content area toward the
//! bottom margin.

use serde::{Deserialize, Serialize};

/// US Letter width in points.
pub const PAGE_WIDTH: f32 = 612.0;
/// US Letter height in points.
pub const PAGE_HEIGHT: f32 = 792.0;
/// Margin on all four sides.
pub const PAGE_MARGIN: f32 = 50.0;
/// Band at the top of each page reserved for the title lines.
pub const HEADER_HEIGHT: f32 = 100.0;
/// Vertical gap after each fixed block.
pub const BLOCK_SPACING: f32 = 30.0;
/// Nominal row height used for the per-page row budget.
pub const ROW_HEIGHT: f32 = 25.0;
/// Height of one wrapped text line inside a business row.
pub const BASE_LINE_HEIGHT: f32 = ROW_HEIGHT - 6.0;

/// Tolerance for fit checks so cumulative float sums that land exactly on the
/// bottom margin still count as fitting.
const FIT_EPSILON: f32 = 1e-3;

/// Fixed dimensions of one page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    pub header_height: f32,
}

impl PageGeometry {
    pub const fn letter() -> Self {
        Self {
            page_width: PAGE_WIDTH,
            page_height: PAGE_HEIGHT,
            margin: PAGE_MARGIN,
            header_height: HEADER_HEIGHT,
        }
    }

    /// y of the first drawable line below the page header band.
    pub fn content_top(&self) -> f32 {
        self.page_height - self.header_height
    }

    pub fn bottom(&self) -> f32 {
        self.margin
    }

    /// Vertical space between the header band and the bottom margin.
    pub fn content_height(&self) -> f32 {
        self.content_top() - self.bottom()
    }

    #[cfg(test)]
    pub fn usable_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::letter()
    }
}

/// Mutable cursor owned by exactly one render call.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayoutState {
    pub geometry: PageGeometry,
    /// Current vertical offset (top edge of the next thing to draw).
    pub cursor_y: f32,
    /// 1-based, only ever increases.
    pub page_number: u32,
}

impl PageLayoutState {
    /// Fresh state: page 1, cursor at the top of the content area.
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            cursor_y: geometry.content_top(),
            page_number: 1,
        }
    }

    /// Whether `height` more points fit above the bottom margin.
    pub fn fits(&self, height: f32) -> bool {
        self.cursor_y - height >= self.geometry.bottom() - FIT_EPSILON
    }

    /// Space left before the bottom margin.
    pub fn remaining(&self) -> f32 {
        self.cursor_y - self.geometry.bottom()
    }

    pub fn advance(&mut self, height: f32) {
        self.cursor_y -= height;
    }

    /// Starts a new page and resets the cursor; returns the new page number.
    pub fn break_page(&mut self) -> u32 {
        self.page_number += 1;
        self.cursor_y = self.geometry.content_top();
        self.page_number
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
