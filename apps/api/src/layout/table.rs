//! Bordered tables with column and row spans.
//!
//! A [`Table`] is a grid of fixed column widths and explicit row heights. Each row
//! lists its slots left to right: a [`Slot::Cell`] occupies `col_span` columns, a
//! [`Slot::Covered`] marks one column taken by a cell spanning down from above.

use crate::layout::display::{DrawOp, Rect};
use crate::layout::font_metrics::FontSpec;

/// Grid line width for every table in the report.
pub const GRID_LINE_WIDTH: f32 = 0.5;
/// Light grey used behind title and header rows.
pub const HEADER_GRAY: f32 = 0.83;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CellContent {
    Text(Vec<String>),
    CheckMark,
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub content: CellContent,
    pub font: FontSpec,
    pub align: Align,
    pub col_span: usize,
    pub row_span: usize,
    pub background: Option<f32>,
}

impl Cell {
    pub fn text(text: impl Into<String>, font: FontSpec) -> Self {
        let text = text.into();
        // Explicit newlines are honoured; no wrapping happens here.
        Self::lines(text.split('\n').map(str::to_string).collect(), font)
    }

    pub fn lines(lines: Vec<String>, font: FontSpec) -> Self {
        Self {
            content: CellContent::Text(lines),
            font,
            align: Align::Left,
            col_span: 1,
            row_span: 1,
            background: None,
        }
    }

    pub fn check(font: FontSpec) -> Self {
        Self {
            content: CellContent::CheckMark,
            ..Self::empty(font)
        }
    }

    pub fn empty(font: FontSpec) -> Self {
        Self {
            content: CellContent::Empty,
            ..Self::lines(Vec::new(), font)
        }
    }

    pub fn centered(mut self) -> Self {
        self.align = Align::Center;
        self
    }

    pub fn span(mut self, cols: usize) -> Self {
        self.col_span = cols.max(1);
        self
    }

    pub fn row_span(mut self, rows: usize) -> Self {
        self.row_span = rows.max(1);
        self
    }

    pub fn background(mut self, gray: f32) -> Self {
        self.background = Some(gray);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    Cell(Cell),
    Covered,
}

impl From<Cell> for Slot {
    fn from(cell: Cell) -> Self {
        Slot::Cell(cell)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub height: f32,
    pub slots: Vec<Slot>,
}

impl TableRow {
    pub fn new(height: f32, slots: Vec<Slot>) -> Self {
        Self { height, slots }
    }

    /// Row made only of cells, no covered slots.
    pub fn cells(height: f32, cells: Vec<Cell>) -> Self {
        Self::new(height, cells.into_iter().map(Slot::Cell).collect())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub col_widths: Vec<f32>,
    pub rows: Vec<TableRow>,
    /// Horizontal inset for left-aligned text.
    pub padding: f32,
}

impl Table {
    pub fn new(col_widths: Vec<f32>, padding: f32) -> Self {
        Self {
            col_widths,
            rows: Vec::new(),
            padding,
        }
    }

    pub fn push_row(&mut self, row: TableRow) {
        self.rows.push(row);
    }

    #[cfg(test)]
    pub fn width(&self) -> f32 {
        self.col_widths.iter().sum()
    }

    pub fn height(&self) -> f32 {
        self.rows.iter().map(|r| r.height).sum()
    }

    /// Draws the table with its top-left corner at (`x`, `top`).
    ///
    /// Backgrounds first, then content, then the grid on top.
    pub fn draw(&self, x: f32, top: f32) -> Vec<DrawOp> {
        let placed = self.place_cells(x, top);

        let mut ops = Vec::new();
        for (rect, cell) in &placed {
            if let Some(gray) = cell.background {
                ops.push(DrawOp::FillRect { rect: *rect, gray });
            }
        }
        for (rect, cell) in &placed {
            ops.extend(self.draw_content(rect, cell));
        }
        for (rect, _) in &placed {
            ops.push(DrawOp::StrokeRect {
                rect: *rect,
                line_width: GRID_LINE_WIDTH,
            });
        }
        ops
    }

    /// Resolves each cell to its on-page rectangle, honouring spans.
    fn place_cells(&self, x: f32, top: f32) -> Vec<(Rect, &Cell)> {
        let mut placed = Vec::new();
        let mut row_top = top;

        for (r, row) in self.rows.iter().enumerate() {
            let mut col = 0usize;
            for slot in &row.slots {
                match slot {
                    Slot::Covered => col += 1,
                    Slot::Cell(cell) => {
                        let end_col = (col + cell.col_span).min(self.col_widths.len());
                        let left = x + self.col_widths[..col.min(end_col)].iter().sum::<f32>();
                        let width: f32 = self.col_widths[col.min(end_col)..end_col].iter().sum();
                        let end_row = (r + cell.row_span).min(self.rows.len());
                        let height: f32 = self.rows[r..end_row].iter().map(|row| row.height).sum();
                        placed.push((Rect::new(left, row_top - height, width, height), cell));
                        col = end_col;
                    }
                }
            }
            row_top -= row.height;
        }
        placed
    }

    fn draw_content(&self, rect: &Rect, cell: &Cell) -> Vec<DrawOp> {
        match &cell.content {
            CellContent::Empty => Vec::new(),
            CellContent::CheckMark => vec![check_mark(rect)],
            CellContent::Text(lines) => {
                let leading = cell.font.size * 1.2;
                let block_top = rect.center_y() + leading * lines.len() as f32 / 2.0;
                lines
                    .iter()
                    .enumerate()
                    .filter(|(_, line)| !line.is_empty())
                    .map(|(i, line)| {
                        // Baseline sits just under one em below the top of its line box.
                        let baseline = block_top - leading * i as f32 - cell.font.size * 0.95;
                        let x = match cell.align {
                            Align::Left => rect.x + self.padding,
                            Align::Center => rect.center_x() - cell.font.width_of(line) / 2.0,
                        };
                        DrawOp::Text {
                            x,
                            y: baseline,
                            font: cell.font,
                            text: line.clone(),
                        }
                    })
                    .collect()
            }
        }
    }
}

/// A small tick centred in `rect`.
fn check_mark(rect: &Rect) -> DrawOp {
    let (cx, cy) = (rect.center_x(), rect.center_y());
    DrawOp::Polyline {
        points: vec![(cx - 4.0, cy), (cx - 1.0, cy - 3.5), (cx + 4.5, cy + 4.0)],
        line_width: 1.0,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::font_metrics::FontFace;

    fn font() -> FontSpec {
        FontSpec::new(FontFace::TimesRoman, 10.0)
    }

    fn stroked(ops: &[DrawOp]) -> Vec<Rect> {
        ops.iter()
            .filter_map(|op| match op {
                DrawOp::StrokeRect { rect, .. } => Some(*rect),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_height_and_width_are_sums() {
        let mut table = Table::new(vec![40.0, 150.0, 300.0], 6.0);
        table.push_row(TableRow::cells(20.0, vec![Cell::text("a", font()).span(3)]));
        table.push_row(TableRow::cells(
            25.0,
            vec![Cell::text("1.1", font()), Cell::text("x", font()), Cell::text("y", font())],
        ));
        assert_eq!(table.width(), 490.0);
        assert_eq!(table.height(), 45.0);
    }

    #[test]
    fn test_column_span_covers_full_width() {
        let mut table = Table::new(vec![40.0, 150.0, 300.0], 6.0);
        table.push_row(TableRow::cells(
            20.0,
            vec![Cell::text("BLOK I", font()).span(3)],
        ));
        let rects = stroked(&table.draw(50.0, 692.0));
        assert_eq!(rects, vec![Rect::new(50.0, 672.0, 490.0, 20.0)]);
    }

    #[test]
    fn test_row_span_with_covered_slots() {
        let mut table = Table::new(vec![30.0, 100.0], 3.0);
        table.push_row(TableRow::cells(
            30.0,
            vec![Cell::text("No", font()).row_span(2), Cell::text("A", font())],
        ));
        table.push_row(TableRow::new(
            30.0,
            vec![Slot::Covered, Cell::text("B", font()).into()],
        ));
        let rects = stroked(&table.draw(0.0, 100.0));
        assert_eq!(rects.len(), 3);
        assert_eq!(rects[0], Rect::new(0.0, 40.0, 30.0, 60.0));
        assert_eq!(rects[2], Rect::new(30.0, 40.0, 100.0, 30.0));
    }

    #[test]
    fn test_centered_text_is_centered() {
        let mut table = Table::new(vec![100.0], 3.0);
        table.push_row(TableRow::cells(20.0, vec![Cell::text("12", font()).centered()]));
        let ops = table.draw(0.0, 20.0);
        let x = ops
            .iter()
            .find_map(|op| match op {
                DrawOp::Text { x, .. } => Some(*x),
                _ => None,
            })
            .unwrap();
        // "12" is 10pt wide at 10pt.
        assert!((x - 45.0).abs() < 1e-3);
    }

    #[test]
    fn test_multiline_text_stays_inside_cell() {
        let mut table = Table::new(vec![100.0], 3.0);
        let lines = vec!["satu".to_string(), "dua".to_string(), "tiga".to_string()];
        table.push_row(TableRow::cells(57.0, vec![Cell::lines(lines, font())]));
        let ops = table.draw(0.0, 57.0);
        let baselines: Vec<f32> = ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { y, .. } => Some(*y),
                _ => None,
            })
            .collect();
        assert_eq!(baselines.len(), 3);
        assert!(baselines.windows(2).all(|w| w[0] > w[1]));
        assert!(baselines.iter().all(|&y| y > 0.0 && y < 57.0));
    }

    #[test]
    fn test_background_drawn_before_grid() {
        let mut table = Table::new(vec![50.0], 3.0);
        table.push_row(TableRow::cells(
            20.0,
            vec![Cell::text("Jumlah", font()).background(HEADER_GRAY)],
        ));
        let ops = table.draw(0.0, 20.0);
        assert!(matches!(ops.first(), Some(DrawOp::FillRect { .. })));
        assert!(matches!(ops.last(), Some(DrawOp::StrokeRect { .. })));
    }

    #[test]
    fn test_check_mark_and_empty_cells() {
        let mut table = Table::new(vec![30.0, 30.0], 3.0);
        table.push_row(TableRow::cells(19.0, vec![Cell::check(font()), Cell::empty(font())]));
        let ops = table.draw(0.0, 19.0);
        let polylines = ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Polyline { .. }))
            .count();
        assert_eq!(polylines, 1);
        assert!(!ops.iter().any(|op| matches!(op, DrawOp::Text { .. })));
    }
}
