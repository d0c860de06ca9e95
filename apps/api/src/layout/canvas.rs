//! The drawing surface of one render: layout cursor + display list + page header.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::layout::display::{DisplayList, DisplayPage, DrawOp};
use crate::layout::font_metrics::{FontFace, FontSpec};
use crate::layout::geometry::{PageGeometry, PageLayoutState};

pub const TITLE_FONT: FontSpec = FontSpec::new(FontFace::TimesBold, 14.0);
pub const PAGE_NUMBER_FONT: FontSpec = FontSpec::new(FontFace::TimesRoman, 10.0);

/// The two centred lines printed at the top of every page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportTitles {
    pub title: String,
    pub subtitle: String,
}

impl Default for ReportTitles {
    fn default() -> Self {
        Self {
            title: "PENDATAAN INDUSTRI PENGOLAHAN DI KELURAHAN KEJAMBON".to_string(),
            subtitle: "KELURAHAN CINTA STATISTIK 2025".to_string(),
        }
    }
}

/// Owns the [`PageLayoutState`] for exactly one render.
pub struct ReportCanvas {
    pub state: PageLayoutState,
    list: DisplayList,
    titles: ReportTitles,
}

impl ReportCanvas {
    /// Opens page 1 and draws its header.
    pub fn new(geometry: PageGeometry, titles: ReportTitles) -> Self {
        let mut canvas = Self {
            state: PageLayoutState::new(geometry),
            list: DisplayList::new(),
            titles,
        };
        canvas.draw_page_header();
        canvas
    }

    pub fn geometry(&self) -> PageGeometry {
        self.state.geometry
    }

    pub fn page_number(&self) -> u32 {
        self.state.page_number
    }

    pub fn extend(&mut self, ops: impl IntoIterator<Item = DrawOp>) {
        self.list.extend(ops);
    }

    /// Finishes the current page, opens the next one and redraws the page header.
    pub fn break_page(&mut self, reason: &str) -> u32 {
        self.state.break_page();
        self.sync_page(reason)
    }

    /// Opens a display page for a break the layout state has already taken.
    pub fn sync_page(&mut self, reason: &str) -> u32 {
        let page_number = self.state.page_number;
        self.list.open_page(page_number);
        self.draw_page_header();
        debug!(page = page_number, reason, "page break");
        page_number
    }

    pub fn finish(self) -> Vec<DisplayPage> {
        self.list.into_pages()
    }

    /// Title and subtitle centred; page number top-right from page 2 on.
    fn draw_page_header(&mut self) {
        let geometry = self.state.geometry;
        let width = geometry.page_width;
        let height = geometry.page_height;

        for (text, drop) in [(&self.titles.title, 50.0), (&self.titles.subtitle, 80.0)] {
            let text_width = TITLE_FONT.width_of(text);
            self.list.push(DrawOp::Text {
                x: (width - text_width) / 2.0,
                y: height - drop,
                font: TITLE_FONT,
                text: text.clone(),
            });
        }

        let page_number = self.state.page_number;
        if page_number > 1 {
            self.list.push(DrawOp::Text {
                x: width - 80.0,
                y: height - 30.0,
                font: PAGE_NUMBER_FONT,
                text: format!("Halaman {page_number}"),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_page_has_titles_without_page_number() {
        let canvas = ReportCanvas::new(PageGeometry::letter(), ReportTitles::default());
        let pages = canvas.finish();
        assert_eq!(pages.len(), 1);
        assert!(pages[0].contains_text("KELURAHAN CINTA STATISTIK 2025"));
        assert!(!pages[0].texts().any(|t| t.starts_with("Halaman")));
    }

    #[test]
    fn test_break_page_redraws_header_with_number() {
        let mut canvas = ReportCanvas::new(PageGeometry::letter(), ReportTitles::default());
        canvas.state.advance(500.0);
        assert_eq!(canvas.break_page("test"), 2);
        assert_eq!(canvas.state.cursor_y, 692.0);

        let pages = canvas.finish();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1].page_number, 2);
        assert!(pages[1].contains_text("Halaman 2"));
        assert!(pages[1].contains_text("PENDATAAN INDUSTRI PENGOLAHAN DI KELURAHAN KEJAMBON"));
    }

    #[test]
    fn test_titles_are_centred() {
        let titles = ReportTitles {
            title: "A".to_string(),
            subtitle: "B".to_string(),
        };
        let pages = ReportCanvas::new(PageGeometry::letter(), titles).finish();
        let x = pages[0]
            .items
            .iter()
            .find_map(|op| match op {
                DrawOp::Text { x, text, .. } if text == "A" => Some(*x),
                _ => None,
            })
            .unwrap();
        let expected = (612.0 - TITLE_FONT.width_of("A")) / 2.0;
        assert!((x - expected).abs() < 1e-3);
    }
}
