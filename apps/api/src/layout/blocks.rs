//! Fixed-shape summary blocks (I: location, II: enumeration, III: recap).
//!
//! Each block has a known height. A block that does not fit above the bottom
//! margin moves to a fresh page as a whole; blocks are never split.

use crate::layout::canvas::ReportCanvas;
use crate::layout::font_metrics::{FontFace, FontSpec};
use crate::layout::geometry::BLOCK_SPACING;
use crate::layout::table::{Cell, Table, TableRow, HEADER_GRAY};
use crate::models::census::{IndustryCategory, LocationRecord, SummaryCounts};

pub const BODY_FONT: FontSpec = FontSpec::new(FontFace::TimesRoman, 10.0);
pub const BOLD_FONT: FontSpec = FontSpec::new(FontFace::TimesBold, 10.0);

const BLOCK_PADDING: f32 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixedBlock {
    Location,
    Enumeration,
    Recap,
}

impl FixedBlock {
    pub fn title(self) -> &'static str {
        match self {
            FixedBlock::Location => "BLOK I. KETERANGAN TEMPAT",
            FixedBlock::Enumeration => "BLOK II. KETERANGAN PENDATAAN",
            FixedBlock::Recap => "BLOK III. REKAPITULASI",
        }
    }

    pub fn height(self) -> f32 {
        match self {
            FixedBlock::Location => 120.0,
            FixedBlock::Enumeration => 90.0,
            FixedBlock::Recap => 180.0,
        }
    }
}

/// Where a block ended up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockOutcome {
    /// Cursor after the block and its trailing spacing.
    pub cursor_y: f32,
    /// True if a page break was needed before drawing.
    pub page_broken: bool,
}

/// Draws `block` at the canvas cursor, breaking the page first if it does not fit.
pub fn draw_block(
    canvas: &mut ReportCanvas,
    block: FixedBlock,
    location: &LocationRecord,
    summary: &SummaryCounts,
) -> BlockOutcome {
    let table = build_table(block, location, summary);
    debug_assert!((table.height() - block.height()).abs() < 1e-3);

    let mut page_broken = false;
    if !canvas.state.fits(block.height()) {
        canvas.break_page(block.title());
        page_broken = true;
    }

    let x = canvas.geometry().margin;
    let top = canvas.state.cursor_y;
    canvas.extend(table.draw(x, top));
    canvas.state.advance(block.height() + BLOCK_SPACING);

    BlockOutcome {
        cursor_y: canvas.state.cursor_y,
        page_broken,
    }
}

fn build_table(block: FixedBlock, location: &LocationRecord, summary: &SummaryCounts) -> Table {
    match block {
        FixedBlock::Location => location_table(location),
        FixedBlock::Enumeration => enumeration_table(location),
        FixedBlock::Recap => recap_table(summary),
    }
}

fn title_row(block: FixedBlock, columns: usize, height: f32) -> TableRow {
    TableRow::cells(
        height,
        vec![Cell::text(block.title(), BOLD_FONT)
            .span(columns)
            .centered()
            .background(HEADER_GRAY)],
    )
}

fn header_cell(text: &str) -> Cell {
    Cell::text(text, BODY_FONT).centered().background(HEADER_GRAY)
}

fn location_table(location: &LocationRecord) -> Table {
    const ROW: f32 = 20.0;
    let mut table = Table::new(vec![40.0, 150.0, 300.0], BLOCK_PADDING);
    table.push_row(title_row(FixedBlock::Location, 3, ROW));

    let entries = [
        ("1.1", "Provinsi", location.province.clone()),
        ("1.2", "Kabupaten/Kota", location.regency.clone()),
        ("1.3", "Kecamatan", location.district.clone()),
        ("1.4", "Desa/Kelurahan", location.village.clone()),
        ("1.5", "SLS (RT/RW)", location.rt_rw()),
    ];
    for (index, label, value) in entries {
        table.push_row(TableRow::cells(
            ROW,
            vec![
                Cell::text(index, BODY_FONT).centered(),
                Cell::text(label, BODY_FONT),
                Cell::text(value, BODY_FONT).centered(),
            ],
        ));
    }
    table
}

fn enumeration_table(location: &LocationRecord) -> Table {
    const ROW: f32 = 22.5;
    let mut table = Table::new(vec![40.0, 100.0, 150.0, 100.0, 100.0], BLOCK_PADDING);
    table.push_row(title_row(FixedBlock::Enumeration, 5, ROW));
    table.push_row(TableRow::cells(
        ROW,
        vec![
            Cell::empty(BODY_FONT).background(HEADER_GRAY),
            header_cell("Uraian"),
            header_cell("Nama"),
            header_cell("Tanggal"),
            header_cell("Tanda Tangan"),
        ],
    ));

    let date = location.date_str();
    for (index, role, name) in [
        ("2.1", "Pendata", &location.enumerator_name),
        ("2.2", "Pemeriksa", &location.checker_name),
    ] {
        table.push_row(TableRow::cells(
            ROW,
            vec![
                Cell::text(index, BODY_FONT).centered(),
                Cell::text(role, BODY_FONT),
                Cell::text(name.as_str(), BODY_FONT),
                Cell::text(date.as_str(), BODY_FONT).centered(),
                Cell::empty(BODY_FONT),
            ],
        ));
    }
    table
}

fn recap_table(summary: &SummaryCounts) -> Table {
    const ROW: f32 = 20.0;
    let mut table = Table::new(vec![40.0, 250.0, 200.0], BLOCK_PADDING);
    table.push_row(title_row(FixedBlock::Recap, 3, ROW));
    table.push_row(TableRow::cells(
        ROW,
        vec![
            Cell::empty(BODY_FONT).background(HEADER_GRAY),
            header_cell("Industri Mikro Kecil dan Menengah"),
            header_cell("Jumlah (diisi oleh Pemeriksa)"),
        ],
    ));

    for category in IndustryCategory::ALL {
        table.push_row(TableRow::cells(
            ROW,
            vec![
                Cell::text(category.code(), BODY_FONT).centered(),
                Cell::text(category.label(), BODY_FONT),
                Cell::text(summary.get(category).to_string(), BODY_FONT).centered(),
            ],
        ));
    }
    table
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
